//! Error types for the binary switch adapter.

use crate::link::LinkError;
use thiserror::Error;

/// Errors that can occur during switch operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SwitchError {
    /// The resource was created without a device address.
    #[error("Switch has no device address")]
    MissingAddress,

    /// A set request did not carry the `value` attribute.
    #[error("Set request has no `value` attribute")]
    MissingValue,

    /// `value` was present but not a boolean.
    #[error("Switch value must be a boolean, got {0}")]
    InvalidValue(String),

    /// The command could not be delivered to the device.
    #[error("Link error: {0}")]
    Link(#[from] LinkError),

    /// An error occurred while communicating with the resource.
    #[error("Resource communication error: {0}")]
    ResourceCommunicationError(String),
}
