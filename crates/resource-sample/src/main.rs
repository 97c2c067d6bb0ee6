//! # Resource Sample Demo
//!
//! Starts a [`SampleSystem`], toggles the switch, feeds the sensor one reading,
//! and prints what the native runtime received.
//!
//! ```bash
//! RUST_LOG=info cargo run -p resource-sample
//! ```

use bundle_resource::lifecycle::setup_tracing;
use bundle_resource::ContainerConfig;
use resource_sample::lifecycle::SampleSystem;
use resource_sample::sensor_resource::SensorReading;
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();

    info!("Starting sample resource container");
    let mut system = SampleSystem::new(ContainerConfig::default())?;

    let span = tracing::info_span!("switch");
    async {
        info!("Turning switch on");
        system.switch_client.turn_on().await
    }
    .instrument(span)
    .await?;
    info!(on = system.switch_client.is_on().await?, "Switch state");

    let span = tracing::info_span!("sensor");
    async {
        info!("Device reports a reading");
        system.sensor_feed.apply(SensorReading {
            celsius: 21.5,
            sequence: 1,
        });
    }
    .instrument(span)
    .await;
    info!(celsius = system.sensor_client.temperature().await?, "Sensor state");

    if let Err(e) = system.sensor_client.inner().set_attributes(Default::default()).await {
        info!(error = %e, "Sensor rejected write as expected");
    }

    while let Ok(update) = system.native_updates.try_recv() {
        info!(handle = %update.handle, attributes = ?update.attributes, "Native update");
    }
    while let Ok(command) = system.device_commands.try_recv() {
        info!(?command, "Device command");
    }

    match system.shutdown().await {
        Ok(()) => info!("Sample completed successfully"),
        Err(e) => {
            error!(error = %e, "Shutdown failed");
            return Err(e.into());
        }
    }
    Ok(())
}
