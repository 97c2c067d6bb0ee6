//! # Switch Client
//!
//! Typed wrapper over a `ResourceClient` for the binary switch.
use crate::switch_resource::{power_state, SwitchError, VALUE};
use bundle_resource::{ResourceAttributes, ResourceClient, ResourceError};
use tracing::{debug, instrument};

/// Client for interacting with a binary switch resource.
#[derive(Clone)]
pub struct SwitchClient {
    inner: ResourceClient,
}

impl SwitchClient {
    pub fn new(inner: ResourceClient) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &ResourceClient {
        &self.inner
    }

    fn map_error(e: ResourceError) -> SwitchError {
        SwitchError::ResourceCommunicationError(e.to_string())
    }

    #[instrument(skip(self))]
    pub async fn set_power(&self, on: bool) -> Result<(), SwitchError> {
        debug!("Sending request");
        let attributes: ResourceAttributes = [(VALUE, on)].into_iter().collect();
        self.inner
            .set_attributes(attributes)
            .await
            .map_err(Self::map_error)
    }

    pub async fn turn_on(&self) -> Result<(), SwitchError> {
        self.set_power(true).await
    }

    pub async fn turn_off(&self) -> Result<(), SwitchError> {
        self.set_power(false).await
    }

    #[instrument(skip(self))]
    pub async fn is_on(&self) -> Result<bool, SwitchError> {
        debug!("Sending request");
        let attributes = self.inner.get_attributes().await.map_err(Self::map_error)?;
        power_state(&attributes).ok_or(SwitchError::MissingValue)
    }
}
