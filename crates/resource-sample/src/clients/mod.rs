//! Typed clients for the sample resources.

pub mod sensor_client;
pub mod switch_client;

pub use sensor_client::SensorClient;
pub use switch_client::SwitchClient;
