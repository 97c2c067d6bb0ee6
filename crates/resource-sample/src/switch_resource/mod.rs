//! # Binary Switch Resource
//!
//! An actuator adapter: one boolean `value` attribute mirrored onto a device
//! reachable over the [`SimulatedLink`].
//!
//! ## Write policy
//!
//! Write-through. A set request is first sent to the device as a
//! [`DeviceCommand::SetPower`]; only when the link accepts it does the store
//! change, followed by exactly one native push. A rejected request leaves the
//! store and the peer untouched.
//!
//! ## Usage
//!
//! ```rust
//! use bundle_resource::mock::RecordingBridge;
//! use bundle_resource::{NativeHandle, ResourceActor};
//! use resource_sample::clients::SwitchClient;
//! use resource_sample::link::SimulatedLink;
//! use resource_sample::switch_resource;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (link, mut commands) = SimulatedLink::new();
//!     let bridge = RecordingBridge::new();
//!     let switch = switch_resource::new(
//!         NativeHandle(1),
//!         Arc::new(bridge.clone()),
//!         "/zigbee/switch/1",
//!         "0x1A2B",
//!         link,
//!     )?;
//!
//!     let (actor, client) = ResourceActor::new(switch, 8);
//!     tokio::spawn(actor.run());
//!     let client = SwitchClient::new(client);
//!
//!     client.turn_on().await?;
//!     assert!(client.is_on().await?);
//!     assert!(commands.try_recv().is_ok());
//!     bridge.verify_calls(1);
//!     Ok(())
//! }
//! ```

pub mod error;

pub use error::*;

use crate::link::{DeviceCommand, SimulatedLink};
use async_trait::async_trait;
use bundle_resource::{
    AttributeValue, BundleResource, NativeBridge, NativeHandle, Notify, ResourceAttributes,
    ResourceBase, ResourceError, ResourceIdentity,
};
use std::sync::Arc;
use tracing::{debug, info};

pub const RESOURCE_TYPE: &str = "oic.r.switch.binary";
pub const VALUE: &str = "value";

pub struct BinarySwitchResource {
    base: ResourceBase,
    link: SimulatedLink,
    address: String,
}

impl BinarySwitchResource {
    pub fn address(&self) -> &str {
        &self.address
    }
}

#[async_trait]
impl BundleResource for BinarySwitchResource {
    type Params = SimulatedLink;
    type Error = SwitchError;

    /// Needs the address identity field. Subscribing happens in [`new`].
    fn from_params(base: ResourceBase, link: SimulatedLink) -> Result<Self, SwitchError> {
        let address = base.address().ok_or(SwitchError::MissingAddress)?;
        Ok(Self {
            base,
            link,
            address,
        })
    }

    fn base(&self) -> &ResourceBase {
        &self.base
    }

    fn initialize_attributes(&self, attributes: &mut ResourceAttributes) -> Result<(), SwitchError> {
        attributes.set(VALUE, false);
        Ok(())
    }

    async fn handle_set_attributes_request(
        &mut self,
        attributes: ResourceAttributes,
    ) -> Result<(), SwitchError> {
        let value = attributes.get(VALUE).ok_or(SwitchError::MissingValue)?;
        let on = value
            .as_bool()
            .ok_or_else(|| SwitchError::InvalidValue(format!("{:?}", value)))?;

        self.link.send(DeviceCommand::SetPower {
            address: self.address.clone(),
            on,
        })?;
        debug!(address = %self.address, on, "Device accepted command");
        self.base.set_attribute(VALUE, on, Notify::Sync);
        Ok(())
    }

    async fn handle_get_attributes_request(&mut self) -> Result<ResourceAttributes, SwitchError> {
        Ok(self.base.get_attributes())
    }

    async fn deactivate_resource(&mut self) -> Result<(), SwitchError> {
        self.link.unsubscribe(&self.address);
        info!(address = %self.address, "Switch released");
        Ok(())
    }
}

/// Reads the switch state out of an attribute set.
pub fn power_state(attributes: &ResourceAttributes) -> Option<bool> {
    attributes.get(VALUE).and_then(AttributeValue::as_bool)
}

/// Creates an identified, initialized switch and subscribes to `address`.
pub fn new(
    handle: NativeHandle,
    bridge: Arc<dyn NativeBridge>,
    uri: &str,
    address: &str,
    link: SimulatedLink,
) -> Result<BinarySwitchResource, ResourceError> {
    let identity = ResourceIdentity::new()
        .with_name("Binary Switch")
        .with_uri(uri)
        .with_resource_type(RESOURCE_TYPE)
        .with_address(address);
    let base = ResourceBase::with_identity(handle, bridge, identity);
    let switch = BinarySwitchResource::create(base, link)?;
    switch.link.subscribe(&switch.address);
    Ok(switch)
}
