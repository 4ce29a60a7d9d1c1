//! Deterministic execution environment for the flow governance engine.
//!
//! The [`Runtime`] owns one governance engine and a registry of contracts
//! keyed by address. An external call is queued together with every
//! operation it triggers (balance queries, oracle replies, effects of an
//! executed proposal) and the queue is drained in FIFO order. Either the
//! whole chain applies or nothing does.

pub mod call;
pub mod contract;
pub mod error;
pub mod runtime;

pub use call::{Applied, Call, Receipt};
pub use contract::{Contract, ContractObject, MintParams, TransferParams};
pub use error::{ContractError, RuntimeError};
pub use runtime::{Runtime, DEFAULT_OPERATION_LIMIT};
