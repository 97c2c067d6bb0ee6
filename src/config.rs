//! Container configuration.
//!
//! The core never reads files. Hosts deserialize [`ContainerConfig`] from
//! whatever format they load bundle configuration from.

use serde::{Deserialize, Serialize};

pub const DEFAULT_REQUEST_BUFFER: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// Capacity of each resource's request queue. Zero is treated as one.
    pub request_buffer: usize,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            request_buffer: DEFAULT_REQUEST_BUFFER,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: ContainerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ContainerConfig::default());
        assert_eq!(config.request_buffer, 32);
    }

    #[test]
    fn request_buffer_is_configurable() {
        let config: ContainerConfig = serde_json::from_str(r#"{"request_buffer": 4}"#).unwrap();
        assert_eq!(config.request_buffer, 4);
    }
}
