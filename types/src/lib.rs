//! Fundamental types for the flow governance engine.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! addresses, ledger points, timestamps, call contexts, governance parameters,
//! effects and the balance oracle boundary.

pub mod address;
pub mod context;
pub mod effect;
pub mod error;
pub mod oracle;
pub mod params;
pub mod point;
pub mod time;

pub use address::Address;
pub use context::CallContext;
pub use effect::Effect;
pub use error::OracleError;
pub use oracle::{BalanceOracle, BalanceQuery, Continuation};
pub use params::GovernanceParams;
pub use point::Point;
pub use time::Timestamp;
