//! # Resource Requests
//!
//! The messages the native runtime sends to a resource. These are the only
//! inbound entry points; each one maps onto a [`BundleResource`](crate::resource::BundleResource) hook.

use crate::attributes::ResourceAttributes;
use crate::error::ResourceError;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by resources.
pub type Response<T> = oneshot::Sender<Result<T, ResourceError>>;

/// Inbound request for a single resource.
///
/// - **SetAttributes**: an external actor wants to write attributes.
/// - **GetAttributes**: an external actor wants the current attributes.
/// - **Deactivate**: teardown. Terminal; nothing is processed afterwards.
#[derive(Debug)]
pub enum ResourceRequest {
    SetAttributes {
        attributes: ResourceAttributes,
        respond_to: Response<()>,
    },
    GetAttributes {
        respond_to: Response<ResourceAttributes>,
    },
    Deactivate {
        respond_to: Response<()>,
    },
}

impl ResourceRequest {
    pub fn kind(&self) -> &'static str {
        match self {
            ResourceRequest::SetAttributes { .. } => "SetAttributes",
            ResourceRequest::GetAttributes { .. } => "GetAttributes",
            ResourceRequest::Deactivate { .. } => "Deactivate",
        }
    }

    /// Answers the request with `error` without running any hook.
    pub fn reject(self, error: ResourceError) {
        match self {
            ResourceRequest::SetAttributes { respond_to, .. } => {
                let _ = respond_to.send(Err(error));
            }
            ResourceRequest::GetAttributes { respond_to } => {
                let _ = respond_to.send(Err(error));
            }
            ResourceRequest::Deactivate { respond_to } => {
                let _ = respond_to.send(Err(error));
            }
        }
    }
}
