//! # Sensor Client
//!
//! Typed wrapper over a `ResourceClient` for the temperature sensor.
use crate::sensor_resource::{temperature, SensorError, TEMPERATURE};
use bundle_resource::{ResourceClient, ResourceError};
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct SensorClient {
    inner: ResourceClient,
}

impl SensorClient {
    pub fn new(inner: ResourceClient) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &ResourceClient {
        &self.inner
    }

    fn map_error(e: ResourceError) -> SensorError {
        SensorError::ResourceCommunicationError(e.to_string())
    }

    /// Latest known temperature in degrees Celsius.
    #[instrument(skip(self))]
    pub async fn temperature(&self) -> Result<f64, SensorError> {
        debug!("Sending request");
        let attributes = self.inner.get_attributes().await.map_err(Self::map_error)?;
        temperature(&attributes).ok_or_else(|| {
            SensorError::ResourceCommunicationError(format!("`{}` missing from response", TEMPERATURE))
        })
    }
}
