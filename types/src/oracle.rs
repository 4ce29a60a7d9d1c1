//! The balance oracle boundary.
//!
//! The governance engine never reads ledger state directly. It emits a
//! [`BalanceQuery`] naming the [`Continuation`] that should receive the reply,
//! and the environment later invokes that continuation with the answer.

use crate::{Address, OracleError, Point};
use serde::{Deserialize, Serialize};

/// "Balance of `address` as of `point`."
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceQuery {
    pub address: Address,
    pub point: Point,
}

/// The re-entry point a balance reply must be delivered to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Continuation {
    RegisterProposalCallback,
    VoteCallback,
}

impl Continuation {
    /// Entry point name of the continuation.
    pub fn entrypoint(&self) -> &'static str {
        match self {
            Self::RegisterProposalCallback => "register_proposal_callback",
            Self::VoteCallback => "vote_callback",
        }
    }
}

/// Anything that can answer point-in-time balance queries.
pub trait BalanceOracle {
    /// Balance of `query.address` as of `query.point`, judged from `current`.
    ///
    /// Fails with [`OracleError::BlockNotFinalized`] unless `query.point` is
    /// strictly before `current`.
    fn balance_at(&self, query: &BalanceQuery, current: Point) -> Result<u128, OracleError>;
}
