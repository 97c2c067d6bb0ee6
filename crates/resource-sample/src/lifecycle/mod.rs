//! # Sample System
//!
//! Wires the sample adapters into a [`ResourceContainer`]:
//!
//! 1. **Native side** - a [`ChannelBridge`] whose receiver plays the native runtime.
//! 2. **Device side** - a [`SimulatedLink`] whose receiver plays the devices.
//! 3. **Resources** - one switch and one sensor, each with its own handle, URI and address.
//!
//! ```rust,ignore
//! let mut system = SampleSystem::new(ContainerConfig::default())?;
//! system.switch_client.turn_on().await?;
//! let update = system.native_updates.recv().await;
//! system.shutdown().await?;
//! ```

use crate::clients::{SensorClient, SwitchClient};
use crate::link::{DeviceCommand, SimulatedLink};
use crate::sensor_resource::{self, SensorFeed};
use crate::switch_resource;
use bundle_resource::lifecycle::ResourceContainer;
use bundle_resource::{ChannelBridge, ContainerConfig, NativeHandle, NativeUpdate, ResourceError};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

pub const SWITCH_URI: &str = "/zigbee/switch/1";
pub const SWITCH_ADDRESS: &str = "0x1A2B";
pub const SWITCH_HANDLE: NativeHandle = NativeHandle(1);

pub const SENSOR_URI: &str = "/zigbee/temperature/1";
pub const SENSOR_ADDRESS: &str = "0x3C4D";
pub const SENSOR_HANDLE: NativeHandle = NativeHandle(2);

pub struct SampleSystem {
    pub switch_client: SwitchClient,
    pub sensor_client: SensorClient,
    /// Where device readings for the sensor are written.
    pub sensor_feed: SensorFeed,
    /// Snapshots pushed to the native runtime, in push order.
    pub native_updates: mpsc::UnboundedReceiver<NativeUpdate>,
    /// Commands the adapters sent to their devices.
    pub device_commands: mpsc::UnboundedReceiver<DeviceCommand>,
    pub link: SimulatedLink,
    container: ResourceContainer,
}

impl SampleSystem {
    /// Builds and activates both resources. Requires a running Tokio runtime.
    pub fn new(config: ContainerConfig) -> Result<Self, ResourceError> {
        let (bridge, native_updates) = ChannelBridge::new();
        let bridge = Arc::new(bridge);
        let (link, device_commands) = SimulatedLink::new();
        let mut container = ResourceContainer::new(config);

        let switch = switch_resource::new(
            SWITCH_HANDLE,
            bridge.clone(),
            SWITCH_URI,
            SWITCH_ADDRESS,
            link.clone(),
        )?;
        let switch_client = SwitchClient::new(container.register(switch)?);

        let sensor = sensor_resource::new(
            SENSOR_HANDLE,
            bridge,
            SENSOR_URI,
            SENSOR_ADDRESS,
            link.clone(),
        )?;
        let sensor_feed = sensor.feed();
        let sensor_client = SensorClient::new(container.register(sensor)?);

        info!(resources = ?container.uris(), "Sample system started");
        Ok(Self {
            switch_client,
            sensor_client,
            sensor_feed,
            native_updates,
            device_commands,
            link,
            container,
        })
    }

    pub fn container(&self) -> &ResourceContainer {
        &self.container
    }

    /// Deactivates every resource and waits for all of them.
    pub async fn shutdown(self) -> Result<(), ResourceError> {
        self.container.shutdown().await
    }
}
