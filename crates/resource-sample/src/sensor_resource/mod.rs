//! # Temperature Sensor Resource
//!
//! A sensor adapter. Readings arrive from the device on whatever task owns the
//! link and are written through a [`SensorFeed`], a cloned handle on the
//! resource's base.
//!
//! ## Write policy
//!
//! Read-only. Set requests are rejected with [`SensorError::ReadOnly`] and
//! never touch the store.
//!
//! ## Batching
//!
//! [`SensorFeed::apply`] merges the temperature and the sequence number in one
//! write with [`Notify::Sync`], so the native peer receives one snapshot per
//! reading in which both keys already agree.

pub mod error;

pub use error::*;

use crate::link::{DeviceCommand, SimulatedLink};
use async_trait::async_trait;
use bundle_resource::{
    AttributeValue, BundleResource, NativeBridge, NativeHandle, Notify, ResourceAttributes,
    ResourceBase, ResourceError, ResourceIdentity,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

pub const RESOURCE_TYPE: &str = "oic.r.temperature";
pub const TEMPERATURE: &str = "temperature";
pub const UNITS: &str = "units";
pub const SEQUENCE: &str = "sequence";

/// One reading reported by the device. Devices report it as JSON, e.g.
/// `{"celsius": 21.5, "sequence": 7}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub celsius: f64,
    pub sequence: i64,
}

pub struct TemperatureSensorResource {
    base: ResourceBase,
    link: SimulatedLink,
    address: String,
}

impl TemperatureSensorResource {
    /// Handle for the task that receives device readings.
    pub fn feed(&self) -> SensorFeed {
        SensorFeed {
            base: self.base.clone(),
        }
    }
}

#[async_trait]
impl BundleResource for TemperatureSensorResource {
    type Params = SimulatedLink;
    type Error = SensorError;

    fn from_params(base: ResourceBase, link: SimulatedLink) -> Result<Self, SensorError> {
        let address = base.address().ok_or(SensorError::MissingAddress)?;
        Ok(Self {
            base,
            link,
            address,
        })
    }

    fn base(&self) -> &ResourceBase {
        &self.base
    }

    fn initialize_attributes(&self, attributes: &mut ResourceAttributes) -> Result<(), SensorError> {
        attributes.set(TEMPERATURE, 0.0);
        attributes.set(UNITS, "C");
        attributes.set(SEQUENCE, 0);
        Ok(())
    }

    async fn handle_set_attributes_request(
        &mut self,
        attributes: ResourceAttributes,
    ) -> Result<(), SensorError> {
        let mut keys = attributes.keys();
        keys.sort();
        Err(SensorError::ReadOnly(keys))
    }

    /// Asks the device for a fresh reading, then answers from the store. The
    /// reading itself lands later through the feed.
    async fn handle_get_attributes_request(&mut self) -> Result<ResourceAttributes, SensorError> {
        self.link.send(DeviceCommand::Poll {
            address: self.address.clone(),
        })?;
        Ok(self.base.get_attributes())
    }

    async fn deactivate_resource(&mut self) -> Result<(), SensorError> {
        self.link.unsubscribe(&self.address);
        info!(address = %self.address, "Sensor released");
        Ok(())
    }
}

/// Device-side writer for a [`TemperatureSensorResource`].
#[derive(Debug, Clone)]
pub struct SensorFeed {
    base: ResourceBase,
}

impl SensorFeed {
    pub fn apply(&self, reading: SensorReading) {
        debug!(handle = %self.base.handle(), ?reading, "Reading");
        let mut update = ResourceAttributes::new();
        update.set(TEMPERATURE, reading.celsius);
        update.set(SEQUENCE, reading.sequence);
        self.base.set_attributes(update, Notify::Sync);
    }
}

pub fn temperature(attributes: &ResourceAttributes) -> Option<f64> {
    attributes.get(TEMPERATURE).and_then(AttributeValue::as_double)
}

/// Creates an identified, initialized sensor and subscribes to `address`.
pub fn new(
    handle: NativeHandle,
    bridge: Arc<dyn NativeBridge>,
    uri: &str,
    address: &str,
    link: SimulatedLink,
) -> Result<TemperatureSensorResource, ResourceError> {
    let identity = ResourceIdentity::new()
        .with_name("Temperature Sensor")
        .with_uri(uri)
        .with_resource_type(RESOURCE_TYPE)
        .with_address(address);
    let base = ResourceBase::with_identity(handle, bridge, identity);
    let sensor = TemperatureSensorResource::create(base, link)?;
    sensor.link.subscribe(&sensor.address);
    Ok(sensor)
}
