//! Error types for the temperature sensor adapter.

use crate::link::LinkError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SensorError {
    #[error("Sensor has no device address")]
    MissingAddress,

    /// Sensors are read-only; carries the keys the caller tried to write.
    #[error("Sensor is read-only, rejected keys: {0:?}")]
    ReadOnly(Vec<String>),

    #[error("Link error: {0}")]
    Link(#[from] LinkError),

    #[error("Resource communication error: {0}")]
    ResourceCommunicationError(String),
}
