//! Snapshot token ledger.
//!
//! Live balances are kept alongside a per-holder, append-only balance
//! history keyed by ledger point. The history answers "balance of A as of
//! point P" with a binary search, which is what the governance engine uses
//! to weigh proposals and votes at a fixed point in the past.
//!
//! The token is assembled from independent parts rather than one monolith:
//! a [`BalanceStore`], a [`SnapshotStore`], an [`AdminGate`] and a
//! [`MintGate`], composed by [`SnapshotLedger`].

pub mod admin;
pub mod balances;
pub mod checkpoint;
pub mod error;
pub mod ledger;
pub mod snapshot;

pub use admin::{AdminGate, MintGate};
pub use balances::BalanceStore;
pub use checkpoint::{AccountCheckpoint, LedgerCheckpoint, CHECKPOINT_VERSION};
pub use error::LedgerError;
pub use ledger::SnapshotLedger;
pub use snapshot::{BalanceHistory, BalanceSnapshot, SnapshotStore};
