//! # Resource Actor
//!
//! The `ResourceActor` owns one adapter and processes the native runtime's
//! requests for it sequentially. Hooks therefore get exclusive `&mut` access to
//! the adapter, and two native calls into the same resource never interleave.

use crate::client::ResourceClient;
use crate::error::ResourceError;
use crate::message::ResourceRequest;
use crate::resource::{BundleResource, ResourceBase};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The server half of a resource.
///
/// # Usage Pattern
///
/// 1. **Create**: build the adapter with [`BundleResource::create`], then call
///    `ResourceActor::new()` to get the actor and its [`ResourceClient`].
/// 2. **Run**: spawn [`run`](Self::run) in a background task.
/// 3. **Tear down**: call [`ResourceClient::deactivate`], or drop every client.
///
/// # Operations
///
/// * **SetAttributes**: calls `handle_set_attributes_request`, returns its result.
/// * **GetAttributes**: calls `handle_get_attributes_request`, returns the attributes.
/// * **Deactivate**: calls `deactivate_resource`, marks the base deactivated,
///   stops the loop and answers everything still queued with
///   [`ResourceError::Deactivated`].
///
/// If the channel closes without an explicit `Deactivate`, the hook still runs
/// once so the adapter can release its protocol handles.
pub struct ResourceActor<R: BundleResource> {
    resource: R,
    receiver: mpsc::Receiver<ResourceRequest>,
}

impl<R: BundleResource> ResourceActor<R> {
    /// Creates the actor and its client.
    ///
    /// `buffer_size` bounds the request queue; senders wait when it is full.
    /// A size of zero is raised to one.
    pub fn new(resource: R, buffer_size: usize) -> (Self, ResourceClient) {
        let (sender, receiver) = mpsc::channel(buffer_size.max(1));
        let client = ResourceClient::new(sender, resource.base().uri());
        (Self { resource, receiver }, client)
    }

    pub fn base(&self) -> &ResourceBase {
        self.resource.base()
    }

    /// Runs the request loop until the resource is deactivated or every client is gone.
    pub async fn run(mut self) {
        // Just the type name, e.g. "BinarySwitchResource"
        let adapter = std::any::type_name::<R>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        let handle = self.resource.base().handle();
        let uri = self.resource.base().uri().unwrap_or_default();
        info!(adapter, %uri, %handle, "Resource active");

        let mut deactivated = false;
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::SetAttributes {
                    attributes,
                    respond_to,
                } => {
                    debug!(adapter, %uri, keys = ?attributes.keys(), "SetAttributes");
                    let result = self
                        .resource
                        .handle_set_attributes_request(attributes)
                        .await
                        .map_err(ResourceError::adapter);
                    match &result {
                        Ok(()) => debug!(adapter, %uri, "SetAttributes ok"),
                        Err(e) => warn!(adapter, %uri, error = %e, "SetAttributes failed"),
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::GetAttributes { respond_to } => {
                    let result = self
                        .resource
                        .handle_get_attributes_request()
                        .await
                        .map_err(ResourceError::adapter);
                    match &result {
                        Ok(attributes) => {
                            debug!(adapter, %uri, keys = attributes.len(), "GetAttributes")
                        }
                        Err(e) => warn!(adapter, %uri, error = %e, "GetAttributes failed"),
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Deactivate { respond_to } => {
                    let result = self.deactivate(adapter, &uri).await;
                    deactivated = true;
                    let _ = respond_to.send(result);
                    break;
                }
            }
        }

        if !deactivated {
            debug!(adapter, %uri, "All clients dropped");
            let _ = self.deactivate(adapter, &uri).await;
        }

        self.receiver.close();
        let mut rejected = 0usize;
        while let Some(msg) = self.receiver.recv().await {
            debug!(adapter, %uri, request = msg.kind(), "Rejected after deactivation");
            msg.reject(ResourceError::Deactivated);
            rejected += 1;
        }

        info!(adapter, %uri, rejected, "Shutdown");
    }

    async fn deactivate(&mut self, adapter: &str, uri: &str) -> Result<(), ResourceError> {
        let result = self
            .resource
            .deactivate_resource()
            .await
            .map_err(ResourceError::adapter);
        self.resource.base().mark_deactivated();
        match &result {
            Ok(()) => info!(adapter, %uri, "Deactivated"),
            Err(e) => warn!(adapter, %uri, error = %e, "Deactivation failed"),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{AttributeValue, ResourceAttributes};
    use crate::bridge::{NativeHandle, Notify};
    use crate::mock::RecordingBridge;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug, thiserror::Error)]
    enum DimmerError {
        #[error("level out of range: {0}")]
        OutOfRange(i64),
        #[error("missing level")]
        MissingLevel,
    }

    struct Dimmer {
        base: ResourceBase,
        teardowns: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl BundleResource for Dimmer {
        type Params = Arc<AtomicUsize>;
        type Error = DimmerError;

        fn from_params(base: ResourceBase, teardowns: Arc<AtomicUsize>) -> Result<Self, DimmerError> {
            Ok(Self { base, teardowns })
        }

        fn base(&self) -> &ResourceBase {
            &self.base
        }

        fn initialize_attributes(&self, attributes: &mut ResourceAttributes) -> Result<(), DimmerError> {
            attributes.set("level", 0);
            Ok(())
        }

        // Write-through: validate, then update the store and notify.
        async fn handle_set_attributes_request(&mut self, attributes: ResourceAttributes) -> Result<(), DimmerError> {
            let level = attributes
                .get("level")
                .and_then(AttributeValue::as_int)
                .ok_or(DimmerError::MissingLevel)?;
            if !(0..=100).contains(&level) {
                return Err(DimmerError::OutOfRange(level));
            }
            self.base.set_attribute("level", level, Notify::Sync);
            Ok(())
        }

        async fn handle_get_attributes_request(&mut self) -> Result<ResourceAttributes, DimmerError> {
            Ok(self.base.get_attributes())
        }

        async fn deactivate_resource(&mut self) -> Result<(), DimmerError> {
            self.teardowns.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn dimmer() -> (ResourceActor<Dimmer>, ResourceClient, RecordingBridge, Arc<AtomicUsize>) {
        let bridge = RecordingBridge::new();
        let base = ResourceBase::new(NativeHandle(5), Arc::new(bridge.clone()));
        base.set_uri("/dimmer/1");
        let teardowns = Arc::new(AtomicUsize::new(0));
        let resource = Dimmer::create(base, teardowns.clone()).unwrap();
        let (actor, client) = ResourceActor::new(resource, 10);
        (actor, client, bridge, teardowns)
    }

    #[tokio::test]
    async fn set_request_runs_hook_and_syncs() {
        let (actor, client, bridge, _) = dimmer();
        assert_eq!(client.uri(), Some("/dimmer/1"));
        tokio::spawn(actor.run());

        client
            .set_attributes([("level", 70)].into_iter().collect())
            .await
            .unwrap();

        let attributes = client.get_attributes().await.unwrap();
        assert_eq!(attributes.get("level"), Some(&AttributeValue::Int(70)));
        bridge.verify_calls(1);
        assert_eq!(bridge.last().unwrap().handle, NativeHandle(5));
    }

    #[tokio::test]
    async fn hook_errors_reach_the_caller() {
        let (actor, client, bridge, _) = dimmer();
        tokio::spawn(actor.run());

        let result = client.set_attributes([("level", 140)].into_iter().collect()).await;

        assert!(matches!(result, Err(ResourceError::Adapter(_))));
        assert_eq!(bridge.call_count(), 0);
    }

    #[tokio::test]
    async fn deactivate_is_terminal() {
        let (actor, client, _, teardowns) = dimmer();
        let task = tokio::spawn(actor.run());

        client.deactivate().await.unwrap();
        task.await.unwrap();

        assert_eq!(teardowns.load(Ordering::SeqCst), 1);
        assert!(client.is_closed());
        let err = client.get_attributes().await.unwrap_err();
        assert!(err.is_terminated());
    }

    #[tokio::test]
    async fn queued_requests_are_rejected_after_deactivate() {
        let (actor, client, _, teardowns) = dimmer();

        let (deactivated, late_get, ()) =
            tokio::join!(client.deactivate(), client.get_attributes(), actor.run());

        assert!(deactivated.is_ok());
        assert!(matches!(late_get, Err(ResourceError::Deactivated)));
        assert_eq!(teardowns.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn dropping_all_clients_still_tears_down() {
        let (actor, client, _, teardowns) = dimmer();
        let base = actor.base().clone();
        let task = tokio::spawn(actor.run());

        drop(client);
        task.await.unwrap();

        assert_eq!(teardowns.load(Ordering::SeqCst), 1);
        assert!(base.is_deactivated());
    }
}
