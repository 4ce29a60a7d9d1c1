//! Governance parameters.
//!
//! Every field is itself governable: an approved proposal can replace the
//! whole record through the engine's `set_governance_parameters` entry point.

use serde::{Deserialize, Serialize};

/// Seconds in a day.
pub const DAY: i64 = 86_400;

/// Tunable governance parameters held by each engine instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceParams {
    /// Length of the voting window in seconds.
    pub voting_period: i64,

    /// Delay between a passed vote and execution, in seconds.
    pub timelock_period: i64,

    /// Minimum total vote weight (up + down) for a decisive vote.
    pub quorum_votes: u128,

    /// Minimum token balance needed to register a proposal.
    pub proposal_threshold: u128,
}

impl Default for GovernanceParams {
    fn default() -> Self {
        Self {
            voting_period: 2 * DAY,
            timelock_period: DAY,
            quorum_votes: 200_000,
            proposal_threshold: 50_000,
        }
    }
}
