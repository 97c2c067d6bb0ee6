//! # Container Lifecycle & Orchestration
//!
//! Resources on their own are simple. Activating them, routing native requests
//! to the right one, and tearing them down in order is the container's job.
//!
//! **Key Responsibilities:**
//! 1. **Activation** - spawn one actor per resource ([`ResourceContainer::register`])
//! 2. **Routing** - look up the client for a URI ([`ResourceContainer::client`])
//! 3. **Teardown** - deactivate and await ([`ResourceContainer::unregister`], [`ResourceContainer::shutdown`])
//! 4. **Observability Setup** - [`setup_tracing`]
//!
//! ## Teardown
//!
//! Shutdown sends an explicit `Deactivate` to every resource rather than just
//! dropping clients, so each adapter's `deactivate_resource` hook runs even if
//! somebody else still holds a clone of its client. A resource that was already
//! deactivated counts as torn down.

pub mod container;
pub mod tracing;

pub use self::container::ResourceContainer;
pub use self::tracing::setup_tracing;
