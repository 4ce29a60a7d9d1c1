//! Token-weighted governance for the flow engine.
//!
//! Lifecycle: register → snapshot-wait → voting → timelock → execution or
//! rejection.
//!
//! Vote weight is the voter's token balance at the proposal's origin point,
//! and eligibility to propose is the proposer's balance one point before the
//! registration call. Both are read from an external balance oracle that
//! answers asynchronously: `register_proposal` and `vote` park their input in
//! a single-slot pending buffer and return a balance request, and the oracle
//! later resumes the engine through `register_proposal_callback` or
//! `vote_callback`.
//!
//! All governance parameters are governable, including the thresholds used to
//! change them: an approved proposal replaces them through an effect routed
//! back to the engine.

pub mod config;
pub mod engine;
pub mod error;
pub mod executor;
pub mod pending;
pub mod proposal;
pub mod store;

pub use config::EngineConfig;
pub use engine::{GovernanceEngine, OracleRequest};
pub use error::GovernanceError;
pub use executor::ActionExecutor;
pub use pending::{MachineState, PendingOperation, PendingProposal, PendingVote};
pub use proposal::{
    Proposal, ProposalAction, ProposalId, ProposalStatus, Timelock, VoteChoice, VoteRecord,
};
pub use store::ProposalStore;
