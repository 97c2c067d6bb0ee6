//! # Resource Errors
//!
//! Errors surfaced by the request layer (actor, client, container). Attribute
//! store operations never fail: a lookup miss is `None`, and a failed native
//! push is not reported to the writer.

/// Errors that can occur while constructing, driving or tearing down a resource.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("Resource request channel closed")]
    Closed,
    #[error("Resource dropped response channel")]
    Dropped,
    #[error("Resource deactivated")]
    Deactivated,
    #[error("Resource construction failed: {0}")]
    Construction(Box<dyn std::error::Error + Send + Sync>),
    #[error("Adapter error: {0}")]
    Adapter(Box<dyn std::error::Error + Send + Sync>),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Resource already registered: {0}")]
    AlreadyRegistered(String),
    #[error("Resource has no URI")]
    MissingUri,
    #[error("Resource task failed: {0}")]
    TaskFailed(String),
}

impl ResourceError {
    pub(crate) fn construction(e: impl std::error::Error + Send + Sync + 'static) -> Self {
        ResourceError::Construction(Box::new(e))
    }

    pub(crate) fn adapter(e: impl std::error::Error + Send + Sync + 'static) -> Self {
        ResourceError::Adapter(Box::new(e))
    }

    /// True for the errors a caller sees once the resource has been torn down.
    pub fn is_terminated(&self) -> bool {
        matches!(self, ResourceError::Closed | ResourceError::Deactivated)
    }
}
