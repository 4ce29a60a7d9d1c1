//! Nullable contracts for deterministic testing.
//!
//! Stand-ins for the governance engine's collaborators that:
//! - Return deterministic values
//! - Can be controlled through their own entry points
//! - Plug into the runtime like any other contract
//!
//! Usage: deploy a nullable where a test needs a collaborator whose
//! behaviour it controls.

pub mod oracle;
pub mod store;

pub use oracle::NullOracle;
pub use store::NullStore;
