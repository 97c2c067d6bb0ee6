//! # Bundle Resource
//!
//! This crate provides the building blocks for exposing an external device or
//! service (a sensor, an actuator, ...) as a named, typed attribute set, and for
//! keeping that attribute set in sync with a native resource runtime that holds
//! its own copy.
//!
//! Concrete protocol adapters (ZigBee, BLE, EnOcean, ...) implement
//! [`BundleResource`]. This crate owns everything that is the same for all of
//! them: attribute storage, identity metadata, the native sync protocol and
//! the request/teardown contract.
//!
//! ## Architecture Overview
//!
//! 1. **State** ([`ResourceBase`]) - attribute store, identity, native handle. Embedded by every adapter.
//! 2. **Contract** ([`BundleResource`]) - initialization, set/get request hooks, teardown.
//! 3. **Outbound** ([`NativeBridge`]) - the single call that pushes a snapshot to the native peer.
//! 4. **Inbound** ([`ResourceActor`], [`ResourceClient`]) - native requests, processed sequentially per resource.
//! 5. **Container** ([`lifecycle::ResourceContainer`]) - activation, routing by URI, shutdown.
//!
//! ## Two directions of traffic
//!
//! - **Device to peer**: adapter code reacts to protocol events by writing into
//!   the store. [`Notify::Silent`] writes stay local; a [`Notify::Sync`] write
//!   pushes the whole store, so several silent writes followed by one
//!   notifying write reach the peer as a single consistent snapshot.
//! - **Peer to device**: the native runtime sends requests through a
//!   [`ResourceClient`]; the actor calls the matching hook on the adapter.
//!
//! ## Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use bundle_resource::mock::RecordingBridge;
//! use bundle_resource::{
//!     BundleResource, NativeHandle, Notify, ResourceActor, ResourceAttributes, ResourceBase,
//! };
//! use std::sync::Arc;
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("plug error")]
//! struct PlugError;
//!
//! struct Plug {
//!     base: ResourceBase,
//! }
//!
//! #[async_trait]
//! impl BundleResource for Plug {
//!     type Params = ();
//!     type Error = PlugError;
//!
//!     fn from_params(base: ResourceBase, _: ()) -> Result<Self, PlugError> {
//!         Ok(Self { base })
//!     }
//!
//!     fn base(&self) -> &ResourceBase {
//!         &self.base
//!     }
//!
//!     fn initialize_attributes(&self, attributes: &mut ResourceAttributes) -> Result<(), PlugError> {
//!         attributes.set("power", "off");
//!         Ok(())
//!     }
//!
//!     // Write-through: accept the request as-is and notify the peer.
//!     async fn handle_set_attributes_request(&mut self, attributes: ResourceAttributes) -> Result<(), PlugError> {
//!         self.base.set_attributes(attributes, Notify::Sync);
//!         Ok(())
//!     }
//!
//!     async fn handle_get_attributes_request(&mut self) -> Result<ResourceAttributes, PlugError> {
//!         Ok(self.base.get_attributes())
//!     }
//!
//!     async fn deactivate_resource(&mut self) -> Result<(), PlugError> {
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let bridge = RecordingBridge::new();
//!     let base = ResourceBase::new(NativeHandle(1), Arc::new(bridge.clone()));
//!     base.set_uri("/plug/1");
//!
//!     let plug = Plug::create(base, ()).unwrap();
//!     let (actor, client) = ResourceActor::new(plug, 8);
//!     tokio::spawn(actor.run());
//!
//!     client.set_attributes([("power", "on")].into_iter().collect()).await.unwrap();
//!     let attributes = client.get_attributes().await.unwrap();
//!     assert_eq!(attributes.get("power").and_then(|v| v.as_str()), Some("on"));
//!     bridge.verify_calls(1);
//!
//!     client.deactivate().await.unwrap();
//! }
//! ```
//!
//! ## Concurrency Model
//!
//! - One lock per resource guards its store; nothing is shared across resources.
//! - Native pushes happen outside the store lock, one resource's pushes in store order.
//! - Native requests for one resource are processed one at a time by its actor.
//! - Adapter event code may write into the store from any thread through a
//!   cloned [`ResourceBase`].
//!
//! ## Testing
//!
//! See the [`mock`] module for [`RecordingBridge`](mock::RecordingBridge) and
//! the mock client helpers.

pub mod actor;
pub mod attributes;
pub mod bridge;
pub mod client;
pub mod config;
pub mod error;
pub mod identity;
pub mod lifecycle;
pub mod message;
pub mod mock;
pub mod resource;

// Re-export core types for convenience
pub use actor::ResourceActor;
pub use attributes::{AttributeValue, ResourceAttributes};
pub use bridge::{ChannelBridge, DetachedBridge, NativeBridge, NativeHandle, NativeUpdate, Notify};
pub use client::ResourceClient;
pub use config::ContainerConfig;
pub use error::ResourceError;
pub use identity::ResourceIdentity;
pub use message::{ResourceRequest, Response};
pub use resource::{BundleResource, ResourceBase};
