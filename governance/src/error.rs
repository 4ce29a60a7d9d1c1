use crate::proposal::ProposalId;
use flow_types::{Address, OracleError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GovernanceError {
    #[error("sender {0} is not allowed to call this entry point")]
    NotAllowed(Address),

    #[error("engine is not in the state this call requires")]
    IncorrectState,

    #[error("no proposal is waiting for a balance snapshot")]
    ProposalBufferEmpty,

    #[error("no vote is waiting for a balance snapshot")]
    VotingBufferEmpty,

    #[error("not enough tokens to propose: have {balance}, need {threshold}")]
    NotEnoughTokens { balance: u128, threshold: u128 },

    #[error("vote carries no weight")]
    InvalidVote,

    #[error("invalid vote value {0} (expected 0 for up or 1 for down)")]
    InvalidVoteValue(u64),

    #[error("proposal {0} not found")]
    InvalidProposalId(ProposalId),

    #[error("voting on proposal {0} is still ongoing")]
    VotingOngoing(ProposalId),

    #[error("voting on proposal {0} has already ended")]
    VotingAlreadyEnded(ProposalId),

    #[error("{voter} has already voted on proposal {proposal_id}")]
    AlreadyVoted {
        voter: Address,
        proposal_id: ProposalId,
    },

    #[error("proposal {0} is not timelocked")]
    TimelockInactive(ProposalId),

    #[error("proposal {0} is still under timelock")]
    ExecutingTooSoon(ProposalId),

    #[error("arithmetic overflow in vote tally")]
    Overflow,

    #[error(transparent)]
    Oracle(#[from] OracleError),
}
