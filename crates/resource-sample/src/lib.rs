//! # Resource Sample
//!
//! Two protocol adapters built on `bundle-resource`, talking to simulated devices.
//!
//! - [`switch_resource`]: actuator, write-through.
//! - [`sensor_resource`]: sensor, read-only, batched device readings.
//! - [`link`]: the in-memory device link both adapters use.
//! - [`clients`]: typed wrappers for the native runtime side.
//! - [`lifecycle`]: wires everything into a container.

pub mod clients;
pub mod lifecycle;
pub mod link;
pub mod sensor_resource;
pub mod switch_resource;
