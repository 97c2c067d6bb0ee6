//! # Native Synchronization Bridge
//!
//! The native runtime keeps its own copy of every resource's attributes. This
//! module defines the one outbound call the core makes into it:
//! [`NativeBridge::sync_to_native`], keyed by a [`NativeHandle`].
//!
//! The call is fire-and-forget. It returns nothing, is never retried, and is
//! always handed a detached [`ResourceAttributes`] snapshot because the peer may
//! read it later, on another thread.

use crate::attributes::ResourceAttributes;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use tokio::sync::mpsc;
use tracing::{trace, warn};

/// Non-owning identifier of the native peer object. The native runtime owns
/// the object and decides how long the handle stays valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct NativeHandle(pub u64);

impl From<u64> for NativeHandle {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl Display for NativeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "native#{}", self.0)
    }
}

/// Whether an attribute write is pushed to the native peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Notify {
    /// Update the local store only. The peer sees the change with the next `Sync` write.
    #[default]
    Silent,
    /// Update the local store, then push a full snapshot to the peer.
    Sync,
}

impl Notify {
    pub fn is_sync(self) -> bool {
        matches!(self, Notify::Sync)
    }
}

/// Outbound path to the native runtime.
pub trait NativeBridge: Send + Sync {
    /// Hands a snapshot of the full attribute set to the peer behind `handle`.
    fn sync_to_native(&self, handle: NativeHandle, attributes: ResourceAttributes);
}

/// Bridge for resources without a native peer. Pushes are traced and dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedBridge;

impl NativeBridge for DetachedBridge {
    fn sync_to_native(&self, handle: NativeHandle, attributes: ResourceAttributes) {
        trace!(%handle, keys = attributes.len(), "No native peer, dropping update");
    }
}

/// One snapshot delivered by [`ChannelBridge`].
#[derive(Debug, Clone, PartialEq)]
pub struct NativeUpdate {
    pub handle: NativeHandle,
    pub attributes: ResourceAttributes,
}

/// Bridge that forwards every snapshot over an unbounded channel to whatever
/// task plays the native runtime.
#[derive(Debug, Clone)]
pub struct ChannelBridge {
    sender: mpsc::UnboundedSender<NativeUpdate>,
}

impl ChannelBridge {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<NativeUpdate>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl NativeBridge for ChannelBridge {
    fn sync_to_native(&self, handle: NativeHandle, attributes: ResourceAttributes) {
        trace!(%handle, keys = attributes.len(), "Pushing update");
        if self.sender.send(NativeUpdate { handle, attributes }).is_err() {
            warn!(%handle, "Native peer gone, update dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::AttributeValue;
    use crate::resource::ResourceBase;
    use std::sync::Arc;

    #[test]
    fn notify_defaults_to_silent() {
        assert_eq!(Notify::default(), Notify::Silent);
        assert!(Notify::Sync.is_sync());
        assert!(!Notify::Silent.is_sync());
    }

    #[test]
    fn channel_bridge_delivers_snapshots_in_order() {
        let (bridge, mut receiver) = ChannelBridge::new();
        let first: ResourceAttributes = [("power", "off")].into_iter().collect();
        let second: ResourceAttributes = [("power", "on")].into_iter().collect();

        bridge.sync_to_native(NativeHandle(7), first.clone());
        bridge.sync_to_native(NativeHandle(7), second.clone());

        assert_eq!(
            receiver.try_recv().unwrap(),
            NativeUpdate { handle: NativeHandle(7), attributes: first }
        );
        assert_eq!(receiver.try_recv().unwrap().attributes, second);
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn channel_bridge_survives_a_closed_peer() {
        let (bridge, receiver) = ChannelBridge::new();
        drop(receiver);
        bridge.sync_to_native(NativeHandle(1), ResourceAttributes::new());
    }

    #[test]
    fn detached_bridge_leaves_store_authoritative() {
        let base = ResourceBase::new(NativeHandle(2), Arc::new(DetachedBridge));

        base.set_attribute("power", "on", Notify::Sync);
        base.notify_native();

        assert_eq!(base.get_attribute("power"), Some(AttributeValue::from("on")));
    }

    #[test]
    fn handle_displays_with_prefix() {
        assert_eq!(NativeHandle::from(42).to_string(), "native#42");
    }
}
