//! # Resource Base & BundleResource Trait
//!
//! [`BundleResource`] is the contract every protocol adapter (ZigBee, BLE,
//! EnOcean, ...) implements. [`ResourceBase`] is the state every adapter embeds:
//! the attribute store, the identity fields, and the native handle plus the
//! bridge used to push snapshots to the native peer.
//!
//! # Composition, not inheritance
//! Adapters do not extend a base type. They hold a `ResourceBase` and return it
//! from [`BundleResource::base`]. `ResourceBase` is a cheap handle (`Clone`
//! shares the same state), so an adapter can pass a clone to whatever task
//! receives device events while the resource itself is owned by its
//! [`ResourceActor`](crate::actor::ResourceActor).
//!
//! # Locking
//! The store and the identity fields each sit behind their own lock, one pair
//! per resource. Native pushes happen after the store lock is released, so a
//! bridge that calls straight back into the resource cannot deadlock.
//!
//! A third, re-entrant lock orders pushes. A notifying write holds it from the
//! moment it takes its snapshot until the bridge returns, so the peer receives
//! snapshots in the order the store produced them and the last push always
//! matches the store. Deactivation takes the same lock, so no push is still in
//! flight once a resource reports itself deactivated.

use crate::attributes::{AttributeValue, ResourceAttributes};
use crate::bridge::{NativeBridge, NativeHandle, Notify};
use crate::error::ResourceError;
use crate::identity::ResourceIdentity;
use async_trait::async_trait;
use parking_lot::{Mutex, ReentrantMutex, RwLock};
use std::fmt::{self, Debug};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Trait that any concrete resource (protocol adapter) must implement.
///
/// # Lifecycle
/// 1. [`create`](BundleResource::create) builds the adapter with
///    [`from_params`](BundleResource::from_params), then runs
///    [`initialize_attributes`](BundleResource::initialize_attributes) exactly once.
///    If either step fails the adapter is dropped and never reaches the caller.
/// 2. While active, the native runtime drives the request hooks through a
///    [`ResourceClient`](crate::client::ResourceClient).
/// 3. [`deactivate_resource`](BundleResource::deactivate_resource) is the
///    terminal call. The resource accepts no further requests afterwards.
///
/// # Write policy
/// Whether [`handle_set_attributes_request`](BundleResource::handle_set_attributes_request)
/// updates the local store before, after, or instead of issuing protocol
/// commands is the adapter's decision. Document it on the implementation.
#[async_trait]
pub trait BundleResource: Sized + Send + 'static {
    /// Adapter specific construction input (link handles, tuning, ...).
    type Params: Send + Debug;

    /// The adapter's error type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Builds the adapter around an already identified `base`.
    ///
    /// [`create`](BundleResource::create) may still drop the adapter afterwards,
    /// so this must not acquire anything that needs releasing (device
    /// subscriptions, sockets). Acquire those once `create` has returned.
    fn from_params(base: ResourceBase, params: Self::Params) -> Result<Self, Self::Error>;

    /// The embedded shared state.
    fn base(&self) -> &ResourceBase;

    /// Writes the baseline attribute set (the resource's declared schema) into
    /// `attributes`. Leaving it empty is valid.
    fn initialize_attributes(&self, attributes: &mut ResourceAttributes) -> Result<(), Self::Error>;

    /// An external actor asks to write `attributes`.
    async fn handle_set_attributes_request(
        &mut self,
        attributes: ResourceAttributes,
    ) -> Result<(), Self::Error>;

    /// An external actor asks for the current attributes. Usually
    /// `Ok(self.base().get_attributes())`, possibly after a live protocol read.
    async fn handle_get_attributes_request(&mut self) -> Result<ResourceAttributes, Self::Error>;

    /// Releases protocol level subscriptions and handles.
    async fn deactivate_resource(&mut self) -> Result<(), Self::Error>;

    /// Constructs the adapter and initializes its attributes.
    ///
    /// The baseline set is merged silently; the peer learns about it with the
    /// first notifying write.
    fn create(base: ResourceBase, params: Self::Params) -> Result<Self, ResourceError> {
        debug!(handle = %base.handle(), ?params, "Create");
        let resource = Self::from_params(base, params).map_err(|e| {
            warn!(error = %e, "Adapter construction failed");
            ResourceError::construction(e)
        })?;

        let mut baseline = ResourceAttributes::new();
        if let Err(e) = resource.initialize_attributes(&mut baseline) {
            warn!(handle = %resource.base().handle(), error = %e, "initialize_attributes failed");
            return Err(ResourceError::construction(e));
        }
        debug!(handle = %resource.base().handle(), keys = ?baseline.keys(), "Attributes initialized");
        resource.base().set_attributes(baseline, Notify::Silent);
        Ok(resource)
    }
}

struct Shared {
    handle: NativeHandle,
    bridge: Arc<dyn NativeBridge>,
    attributes: Mutex<ResourceAttributes>,
    push_order: ReentrantMutex<()>,
    identity: RwLock<ResourceIdentity>,
    deactivated: AtomicBool,
}

/// Shared state of one resource: attribute store, identity and native handle.
///
/// Every read returns an owned copy. Nothing outside this type ever holds a
/// reference into the live store.
#[derive(Clone)]
pub struct ResourceBase {
    shared: Arc<Shared>,
}

impl ResourceBase {
    /// Creates a base with an empty store and no identity.
    pub fn new(handle: NativeHandle, bridge: Arc<dyn NativeBridge>) -> Self {
        Self {
            shared: Arc::new(Shared {
                handle,
                bridge,
                attributes: Mutex::new(ResourceAttributes::new()),
                push_order: ReentrantMutex::new(()),
                identity: RwLock::new(ResourceIdentity::default()),
                deactivated: AtomicBool::new(false),
            }),
        }
    }

    /// Same as [`new`](Self::new), with all four identity fields set up front.
    pub fn with_identity(
        handle: NativeHandle,
        bridge: Arc<dyn NativeBridge>,
        identity: ResourceIdentity,
    ) -> Self {
        let base = Self::new(handle, bridge);
        base.set_identity(identity);
        base
    }

    pub fn handle(&self) -> NativeHandle {
        self.shared.handle
    }

    // --- Attributes ---

    /// Writes one attribute. With [`Notify::Sync`] the whole store is pushed
    /// to the native peer once the write is done.
    pub fn set_attribute(
        &self,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
        notify: Notify,
    ) {
        let key = key.into();
        let value = value.into();
        debug!(handle = %self.handle(), %key, ?notify, "Set attribute");
        if !self.write(notify, |store| {
            store.set(key.as_str(), value);
        }) {
            warn!(handle = %self.handle(), %key, "Write after deactivation ignored");
        }
    }

    /// Merges `attributes` into the store under a single lock acquisition, so
    /// no reader observes a half-merged set. Pushes at most one snapshot.
    pub fn set_attributes(&self, attributes: ResourceAttributes, notify: Notify) {
        let keys = attributes.keys();
        debug!(handle = %self.handle(), ?keys, ?notify, "Set attributes");
        if !self.write(notify, |store| store.set_all(attributes)) {
            warn!(handle = %self.handle(), ?keys, "Write after deactivation ignored");
        }
    }

    /// Pushes the current store to the native peer without changing it, e.g.
    /// after the peer was recreated and lost its copy.
    pub fn notify_native(&self) {
        if !self.write(Notify::Sync, |_| {}) {
            warn!(handle = %self.handle(), "Push after deactivation ignored");
        }
    }

    /// Applies `update` to the store unless the resource is deactivated, then
    /// pushes for `Notify::Sync`. Returns false when the write was dropped.
    fn write(&self, notify: Notify, update: impl FnOnce(&mut ResourceAttributes)) -> bool {
        // Held through the push; lock order is push_order, then attributes.
        let _order = notify.is_sync().then(|| self.shared.push_order.lock());
        let snapshot = {
            let mut store = self.shared.attributes.lock();
            if self.is_deactivated() {
                return false;
            }
            update(&mut *store);
            notify.is_sync().then(|| store.snapshot())
        };
        if let Some(snapshot) = snapshot {
            self.sync_to_native(snapshot);
        }
        true
    }

    pub fn get_attribute(&self, key: &str) -> Option<AttributeValue> {
        self.shared.attributes.lock().get(key).cloned()
    }

    /// Detached copy of the whole store.
    pub fn get_attributes(&self) -> ResourceAttributes {
        self.shared.attributes.lock().snapshot()
    }

    pub fn get_attribute_keys(&self) -> Vec<String> {
        self.shared.attributes.lock().keys()
    }

    fn sync_to_native(&self, snapshot: ResourceAttributes) {
        trace!(handle = %self.handle(), keys = snapshot.len(), "Sync to native");
        self.shared.bridge.sync_to_native(self.shared.handle, snapshot);
    }

    // --- Identity ---

    pub fn identity(&self) -> ResourceIdentity {
        self.shared.identity.read().clone()
    }

    pub fn set_identity(&self, identity: ResourceIdentity) {
        *self.shared.identity.write() = identity;
    }

    pub fn name(&self) -> Option<String> {
        self.shared.identity.read().name.clone()
    }

    pub fn set_name(&self, name: impl Into<String>) {
        self.shared.identity.write().name = Some(name.into());
    }

    pub fn uri(&self) -> Option<String> {
        self.shared.identity.read().uri.clone()
    }

    pub fn set_uri(&self, uri: impl Into<String>) {
        self.shared.identity.write().uri = Some(uri.into());
    }

    pub fn resource_type(&self) -> Option<String> {
        self.shared.identity.read().resource_type.clone()
    }

    pub fn set_resource_type(&self, resource_type: impl Into<String>) {
        self.shared.identity.write().resource_type = Some(resource_type.into());
    }

    pub fn address(&self) -> Option<String> {
        self.shared.identity.read().address.clone()
    }

    pub fn set_address(&self, address: impl Into<String>) {
        self.shared.identity.write().address = Some(address.into());
    }

    // --- Lifecycle ---

    pub fn is_deactivated(&self) -> bool {
        self.shared.deactivated.load(Ordering::Acquire)
    }

    /// Waits for any in-flight push, then flips the flag under the store lock.
    pub(crate) fn mark_deactivated(&self) {
        let _order = self.shared.push_order.lock();
        let _store = self.shared.attributes.lock();
        self.shared.deactivated.store(true, Ordering::Release);
    }
}

impl Debug for ResourceBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceBase")
            .field("handle", &self.shared.handle)
            .field("identity", &*self.shared.identity.read())
            .field("deactivated", &self.is_deactivated())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::RecordingBridge;
    use std::sync::Barrier;
    use std::thread;
    use std::time::Duration;

    // --- A minimal adapter ---

    #[derive(Debug, thiserror::Error)]
    #[error("lamp error: {0}")]
    struct LampError(String);

    #[derive(Debug)]
    struct LampParams {
        fail_init: bool,
    }

    struct Lamp {
        base: ResourceBase,
        fail_init: bool,
    }

    #[async_trait]
    impl BundleResource for Lamp {
        type Params = LampParams;
        type Error = LampError;

        fn from_params(base: ResourceBase, params: LampParams) -> Result<Self, LampError> {
            Ok(Self { base, fail_init: params.fail_init })
        }

        fn base(&self) -> &ResourceBase {
            &self.base
        }

        fn initialize_attributes(&self, attributes: &mut ResourceAttributes) -> Result<(), LampError> {
            if self.fail_init {
                return Err(LampError("bus offline".into()));
            }
            attributes.set("power", "off");
            Ok(())
        }

        async fn handle_set_attributes_request(&mut self, attributes: ResourceAttributes) -> Result<(), LampError> {
            self.base.set_attributes(attributes, Notify::Sync);
            Ok(())
        }

        async fn handle_get_attributes_request(&mut self) -> Result<ResourceAttributes, LampError> {
            Ok(self.base.get_attributes())
        }

        async fn deactivate_resource(&mut self) -> Result<(), LampError> {
            Ok(())
        }
    }

    fn lamp() -> (Lamp, RecordingBridge) {
        let bridge = RecordingBridge::new();
        let base = ResourceBase::new(NativeHandle(1), Arc::new(bridge.clone()));
        let lamp = Lamp::create(base, LampParams { fail_init: false }).unwrap();
        (lamp, bridge)
    }

    #[test]
    fn create_runs_initialize_attributes_silently() {
        let (lamp, bridge) = lamp();

        assert_eq!(lamp.base().get_attribute("power"), Some(AttributeValue::from("off")));
        assert_eq!(bridge.call_count(), 0);
    }

    #[test]
    fn failing_initialize_attributes_is_fatal() {
        let bridge = RecordingBridge::new();
        let base = ResourceBase::new(NativeHandle(1), Arc::new(bridge));

        let result = Lamp::create(base, LampParams { fail_init: true });

        assert!(matches!(result, Err(ResourceError::Construction(_))));
    }

    #[test]
    fn set_then_get_returns_value() {
        let (lamp, _) = lamp();
        lamp.base().set_attribute("level", 42, Notify::Silent);
        assert_eq!(lamp.base().get_attribute("level"), Some(AttributeValue::Int(42)));
    }

    #[test]
    fn power_on_with_notify_pushes_once() {
        let (lamp, bridge) = lamp();

        lamp.base().set_attribute("power", "on", Notify::Sync);

        let expected: ResourceAttributes = [("power", "on")].into_iter().collect();
        assert_eq!(lamp.base().get_attributes(), expected);
        bridge.verify_calls(1);
        let call = bridge.last().unwrap();
        assert_eq!(call.handle, NativeHandle(1));
        assert_eq!(call.attributes, expected);
    }

    #[test]
    fn silent_writes_batch_into_next_sync() {
        let bridge = RecordingBridge::new();
        let base = ResourceBase::new(NativeHandle(3), Arc::new(bridge.clone()));

        base.set_attribute("x", 1, Notify::Silent);
        assert_eq!(bridge.call_count(), 0);
        base.set_attribute("y", 2, Notify::Sync);

        let expected: ResourceAttributes = [("x", 1), ("y", 2)].into_iter().collect();
        bridge.verify_calls(1);
        assert_eq!(bridge.last().unwrap().attributes, expected);
    }

    #[test]
    fn set_attributes_merges_and_pushes_once() {
        let bridge = RecordingBridge::new();
        let base = ResourceBase::new(NativeHandle(1), Arc::new(bridge.clone()));
        base.set_attribute("a", 1, Notify::Silent);

        base.set_attributes([("a", 2), ("b", 3)].into_iter().collect(), Notify::Sync);

        let expected: ResourceAttributes = [("a", 2), ("b", 3)].into_iter().collect();
        assert_eq!(base.get_attributes(), expected);
        bridge.verify_calls(1);
        assert_eq!(bridge.last().unwrap().attributes, expected);
    }

    #[test]
    fn get_attributes_returns_independent_copies() {
        let (lamp, _) = lamp();

        let mut first = lamp.base().get_attributes();
        let second = lamp.base().get_attributes();
        first.set("power", "broken");
        first.set("extra", 1);

        assert_eq!(second.get("power"), Some(&AttributeValue::from("off")));
        assert!(!second.contains("extra"));
        assert_eq!(lamp.base().get_attribute("power"), Some(AttributeValue::from("off")));
    }

    #[test]
    fn pushed_snapshot_is_detached_from_store() {
        let (lamp, bridge) = lamp();
        lamp.base().set_attribute("power", "on", Notify::Sync);
        lamp.base().set_attribute("power", "off", Notify::Silent);

        assert_eq!(bridge.last().unwrap().attributes.get("power"), Some(&AttributeValue::from("on")));
    }

    #[test]
    fn attribute_keys_match_store() {
        let (lamp, _) = lamp();
        lamp.base().set_attribute("level", 1, Notify::Silent);
        lamp.base().set_attribute("level", 2, Notify::Silent);

        let mut keys = lamp.base().get_attribute_keys();
        keys.sort();
        assert_eq!(keys, vec!["level".to_string(), "power".to_string()]);
    }

    #[test]
    fn identity_fields_are_independent() {
        let base = ResourceBase::new(NativeHandle(1), Arc::new(RecordingBridge::new()));

        base.set_uri("/a/light/1");
        assert_eq!(base.uri().as_deref(), Some("/a/light/1"));
        assert_eq!(base.name(), None);
        assert_eq!(base.resource_type(), None);
        assert_eq!(base.address(), None);

        base.set_resource_type("oic.r.light");
        base.set_address("0x1F2E");
        base.set_name("Hallway");
        base.set_uri("/a/light/2");

        assert_eq!(base.name().as_deref(), Some("Hallway"));
        assert_eq!(base.resource_type().as_deref(), Some("oic.r.light"));
        assert_eq!(base.address().as_deref(), Some("0x1F2E"));
        assert_eq!(base.uri().as_deref(), Some("/a/light/2"));
    }

    #[test]
    fn bridge_can_reenter_the_resource() {
        struct Echo(Mutex<Option<ResourceBase>>, RecordingBridge);
        impl NativeBridge for Echo {
            fn sync_to_native(&self, handle: NativeHandle, attributes: ResourceAttributes) {
                if let Some(base) = self.0.lock().as_ref() {
                    // Re-entrant read while the push is in flight.
                    assert_eq!(base.get_attributes(), attributes);
                }
                self.1.sync_to_native(handle, attributes);
            }
        }

        let recorder = RecordingBridge::new();
        let echo = Arc::new(Echo(Mutex::new(None), recorder.clone()));
        let base = ResourceBase::new(NativeHandle(9), echo.clone());
        *echo.0.lock() = Some(base.clone());

        base.set_attribute("k", "v", Notify::Sync);
        recorder.verify_calls(1);
        *echo.0.lock() = None;
    }

    #[test]
    fn writes_after_deactivation_are_dropped() {
        let (lamp, bridge) = lamp();
        lamp.base().mark_deactivated();

        lamp.base().set_attribute("power", "on", Notify::Sync);

        assert!(lamp.base().is_deactivated());
        assert_eq!(lamp.base().get_attribute("power"), Some(AttributeValue::from("off")));
        assert_eq!(bridge.call_count(), 0);
    }

    #[test]
    fn notify_native_pushes_current_store_unchanged() {
        let (lamp, bridge) = lamp();
        lamp.base().set_attribute("level", 5, Notify::Silent);
        let before = lamp.base().get_attributes();

        lamp.base().notify_native();

        assert_eq!(lamp.base().get_attributes(), before);
        bridge.verify_calls(1);
        assert_eq!(bridge.last().unwrap().attributes, before);

        lamp.base().mark_deactivated();
        lamp.base().notify_native();
        bridge.verify_calls(1);
    }

    // --- Push ordering ---

    /// Holds the first push inside the bridge until the test releases it.
    struct GatedBridge {
        recorder: RecordingBridge,
        first: AtomicBool,
        entered: Barrier,
        release: Barrier,
    }

    impl NativeBridge for GatedBridge {
        fn sync_to_native(&self, handle: NativeHandle, attributes: ResourceAttributes) {
            if self.first.swap(false, Ordering::SeqCst) {
                self.entered.wait();
                self.release.wait();
            }
            self.recorder.sync_to_native(handle, attributes);
        }
    }

    fn gated_base() -> (ResourceBase, Arc<GatedBridge>, RecordingBridge) {
        let recorder = RecordingBridge::new();
        let gate = Arc::new(GatedBridge {
            recorder: recorder.clone(),
            first: AtomicBool::new(true),
            entered: Barrier::new(2),
            release: Barrier::new(2),
        });
        let base = ResourceBase::new(NativeHandle(4), gate.clone());
        (base, gate, recorder)
    }

    #[test]
    fn concurrent_sync_writes_reach_peer_in_store_order() {
        let (base, gate, recorder) = gated_base();

        let first = {
            let base = base.clone();
            thread::spawn(move || base.set_attribute("v", 1, Notify::Sync))
        };
        gate.entered.wait();
        let second = {
            let base = base.clone();
            thread::spawn(move || base.set_attribute("v", 2, Notify::Sync))
        };
        thread::sleep(Duration::from_millis(50));
        gate.release.wait();
        first.join().unwrap();
        second.join().unwrap();

        assert_eq!(base.get_attribute("v"), Some(AttributeValue::Int(2)));
        let pushed: Vec<Option<AttributeValue>> = recorder
            .calls()
            .iter()
            .map(|call| call.attributes.get("v").cloned())
            .collect();
        assert_eq!(pushed, vec![Some(AttributeValue::Int(1)), Some(AttributeValue::Int(2))]);
    }

    #[test]
    fn deactivation_waits_for_in_flight_push() {
        let (base, gate, recorder) = gated_base();

        let writer = {
            let base = base.clone();
            thread::spawn(move || base.set_attribute("v", 1, Notify::Sync))
        };
        gate.entered.wait();
        let marked = Arc::new(AtomicBool::new(false));
        let deactivator = {
            let base = base.clone();
            let marked = marked.clone();
            thread::spawn(move || {
                base.mark_deactivated();
                marked.store(true, Ordering::SeqCst);
            })
        };
        thread::sleep(Duration::from_millis(50));
        assert!(!marked.load(Ordering::SeqCst));
        assert!(!base.is_deactivated());

        gate.release.wait();
        writer.join().unwrap();
        deactivator.join().unwrap();

        assert!(base.is_deactivated());
        base.set_attribute("v", 2, Notify::Sync);
        recorder.verify_calls(1);
        assert_eq!(base.get_attribute("v"), Some(AttributeValue::Int(1)));
    }
}
