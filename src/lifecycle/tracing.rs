//! # Observability & Tracing
//!
//! [`setup_tracing`] installs the process-wide subscriber. Everything in this
//! crate logs through `tracing` with structured fields:
//!
//! - **Resource lifecycle** (`info`): active, deactivated, shutdown, register/unregister
//! - **Requests** (`debug`): SetAttributes / GetAttributes with the keys involved
//! - **Store writes** (`debug`): key, native handle, notify mode
//! - **Native pushes** (`trace`): handle and number of keys
//! - **Failures** (`warn`): hook errors, construction errors, writes after deactivation
//!
//! ```bash
//! RUST_LOG=info cargo run -p resource-sample            # lifecycle only
//! RUST_LOG=debug cargo run -p resource-sample           # every request and write
//! RUST_LOG=bundle_resource=trace cargo run -p resource-sample
//! ```
//!
//! With `RUST_LOG=debug` a switch toggle reads like:
//!
//! ```text
//! DEBUG set_attributes{uri=Some("/zigbee/switch/1")}: Sending request keys=["value"]
//! DEBUG SetAttributes adapter="BinarySwitchResource" uri=/zigbee/switch/1 keys=["value"]
//! DEBUG Set attribute handle=native#1 key=value notify=Sync
//! DEBUG SetAttributes ok adapter="BinarySwitchResource" uri=/zigbee/switch/1
//! ```

/// Installs a compact fmt subscriber filtered by `RUST_LOG`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // adapter and uri fields identify the source
        .compact()
        .init();
}
