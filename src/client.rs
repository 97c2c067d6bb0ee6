//! # Resource Client
//!
//! The native runtime's side of a resource: a cloneable sender that turns
//! set/get/deactivate calls into [`ResourceRequest`] messages.

use crate::attributes::ResourceAttributes;
use crate::error::ResourceError;
use crate::message::ResourceRequest;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

/// A handle for sending requests to one [`ResourceActor`](crate::actor::ResourceActor).
///
/// * **Cloneable**: holds only a sender and the URI the resource had when it was spawned.
/// * **Untyped**: works the same for every adapter, so containers can keep
///   clients for different adapter types side by side.
#[derive(Debug, Clone)]
pub struct ResourceClient {
    sender: mpsc::Sender<ResourceRequest>,
    uri: Option<String>,
}

impl ResourceClient {
    pub fn new(sender: mpsc::Sender<ResourceRequest>, uri: Option<String>) -> Self {
        Self { sender, uri }
    }

    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    /// True once the resource has stopped accepting requests.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    #[instrument(skip(self, attributes), fields(uri = ?self.uri))]
    pub async fn set_attributes(&self, attributes: ResourceAttributes) -> Result<(), ResourceError> {
        debug!(keys = ?attributes.keys(), "Sending request");
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::SetAttributes {
                attributes,
                respond_to,
            })
            .await
            .map_err(|_| ResourceError::Closed)?;
        response.await.map_err(|_| ResourceError::Dropped)?
    }

    #[instrument(skip(self), fields(uri = ?self.uri))]
    pub async fn get_attributes(&self) -> Result<ResourceAttributes, ResourceError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::GetAttributes { respond_to })
            .await
            .map_err(|_| ResourceError::Closed)?;
        response.await.map_err(|_| ResourceError::Dropped)?
    }

    #[instrument(skip(self), fields(uri = ?self.uri))]
    pub async fn deactivate(&self) -> Result<(), ResourceError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::Deactivate { respond_to })
            .await
            .map_err(|_| ResourceError::Closed)?;
        response.await.map_err(|_| ResourceError::Dropped)?
    }
}
