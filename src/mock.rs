//! # Mock Framework
//!
//! Utilities for testing adapters and the code that drives them.
//!
//! | Tool | Stands in for | Use it to |
//! |------|---------------|-----------|
//! | [`RecordingBridge`] | the native peer | assert what was pushed and how often |
//! | [`create_mock_client`] | a running resource actor | test code that sends requests, without spawning an adapter |
//!
//! ## Asserting native pushes
//!
//! ```rust
//! use bundle_resource::mock::RecordingBridge;
//! use bundle_resource::{NativeHandle, Notify, ResourceBase};
//! use std::sync::Arc;
//!
//! let bridge = RecordingBridge::new();
//! let base = ResourceBase::new(NativeHandle(1), Arc::new(bridge.clone()));
//!
//! base.set_attribute("x", 1, Notify::Silent);
//! base.set_attribute("y", 2, Notify::Sync);
//!
//! bridge.verify_calls(1);
//! assert_eq!(bridge.last().unwrap().attributes.len(), 2);
//! ```
//!
//! ## Answering requests by hand
//!
//! ```rust
//! use bundle_resource::mock::{create_mock_client, expect_get_attributes};
//! use bundle_resource::ResourceAttributes;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (client, mut receiver) = create_mock_client(Some("/mock/1"), 4);
//!
//!     let request = tokio::spawn(async move { client.get_attributes().await });
//!
//!     let responder = expect_get_attributes(&mut receiver).await.expect("Expected GetAttributes");
//!     let attributes: ResourceAttributes = [("power", "on")].into_iter().collect();
//!     responder.send(Ok(attributes.clone())).unwrap();
//!
//!     assert_eq!(request.await.unwrap().unwrap(), attributes);
//! }
//! ```

use crate::attributes::ResourceAttributes;
use crate::bridge::{NativeBridge, NativeHandle};
use crate::client::ResourceClient;
use crate::message::{ResourceRequest, Response};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::mpsc;

// =============================================================================
// RECORDING BRIDGE
// =============================================================================

/// One recorded [`NativeBridge::sync_to_native`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncCall {
    pub handle: NativeHandle,
    pub attributes: ResourceAttributes,
}

/// A [`NativeBridge`] that records every push. Clones share the same history.
#[derive(Debug, Clone, Default)]
pub struct RecordingBridge {
    calls: Arc<Mutex<Vec<SyncCall>>>,
}

impl RecordingBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every push so far, oldest first.
    pub fn calls(&self) -> Vec<SyncCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn last(&self) -> Option<SyncCall> {
        self.calls.lock().last().cloned()
    }

    /// Pushes that went to `handle`.
    pub fn calls_for(&self, handle: NativeHandle) -> Vec<SyncCall> {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.handle == handle)
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }

    /// Panics unless exactly `expected` pushes were recorded.
    pub fn verify_calls(&self, expected: usize) {
        let actual = self.call_count();
        if actual != expected {
            panic!("Expected {} native sync call(s), recorded {}", expected, actual);
        }
    }
}

impl NativeBridge for RecordingBridge {
    fn sync_to_native(&self, handle: NativeHandle, attributes: ResourceAttributes) {
        self.calls.lock().push(SyncCall { handle, attributes });
    }
}

// =============================================================================
// MOCK CLIENT HELPERS
// =============================================================================

/// Creates a client whose requests land on a receiver the test controls.
///
/// No adapter and no actor are involved. The test pulls requests off the
/// receiver with the `expect_*` helpers and answers them itself, which makes
/// failures such as a dropped responder or an adapter error easy to simulate.
pub fn create_mock_client(
    uri: Option<&str>,
    buffer_size: usize,
) -> (ResourceClient, mpsc::Receiver<ResourceRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (
        ResourceClient::new(sender, uri.map(str::to_string)),
        receiver,
    )
}

/// Helper to verify that the next message is a SetAttributes request
pub async fn expect_set_attributes(
    receiver: &mut mpsc::Receiver<ResourceRequest>,
) -> Option<(ResourceAttributes, Response<()>)> {
    match receiver.recv().await {
        Some(ResourceRequest::SetAttributes {
            attributes,
            respond_to,
        }) => Some((attributes, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a GetAttributes request
pub async fn expect_get_attributes(
    receiver: &mut mpsc::Receiver<ResourceRequest>,
) -> Option<Response<ResourceAttributes>> {
    match receiver.recv().await {
        Some(ResourceRequest::GetAttributes { respond_to }) => Some(respond_to),
        _ => None,
    }
}

/// Helper to verify that the next message is a Deactivate request
pub async fn expect_deactivate(
    receiver: &mut mpsc::Receiver<ResourceRequest>,
) -> Option<Response<()>> {
    match receiver.recv().await {
        Some(ResourceRequest::Deactivate { respond_to }) => Some(respond_to),
        _ => None,
    }
}
