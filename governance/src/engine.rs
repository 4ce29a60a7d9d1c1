//! Core governance engine: the proposal state machine.

use crate::config::EngineConfig;
use crate::error::GovernanceError;
use crate::executor::ActionExecutor;
use crate::pending::{MachineState, PendingOperation, PendingProposal, PendingVote};
use crate::proposal::{
    Proposal, ProposalAction, ProposalId, ProposalStatus, Timelock, VoteChoice, VoteRecord,
};
use crate::store::ProposalStore;
use flow_types::{
    Address, BalanceQuery, CallContext, Continuation, Effect, GovernanceParams, OracleError,
};
use std::collections::BTreeMap;

/// A balance request the environment must route to the oracle.
///
/// The reply goes to `reply_to` on the engine, sent by `oracle`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OracleRequest {
    pub oracle: Address,
    pub query: BalanceQuery,
    pub reply_to: Continuation,
}

/// The governance state machine.
///
/// Idle until `register_proposal` or `vote` parks its input in the pending
/// slot; awaiting a snapshot until the matching callback consumes it. Only
/// one slot exists, so a second suspending call is refused until the first
/// one resolves.
#[derive(Clone, Debug)]
pub struct GovernanceEngine {
    address: Address,
    oracle: Address,
    params: GovernanceParams,
    proposals: ProposalStore,
    pending: Option<PendingOperation>,
    executor: ActionExecutor,
}

impl GovernanceEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            address: config.address,
            oracle: config.oracle,
            params: config.params,
            proposals: ProposalStore::new(),
            pending: None,
            executor: ActionExecutor,
        }
    }

    /// Register a proposal; eligibility is decided when the proposer's
    /// balance one point back arrives at `register_proposal_callback`.
    pub fn register_proposal(
        &mut self,
        ctx: &CallContext,
        metadata: String,
        action: ProposalAction,
    ) -> Result<OracleRequest, GovernanceError> {
        self.ensure_idle()?;
        // Sampling one point back stops tokens acquired in the current point
        // from counting towards the threshold.
        let point = ctx
            .level
            .previous()
            .ok_or(OracleError::BlockNotFinalized {
                requested: ctx.level,
                current: ctx.level,
            })?;

        self.pending = Some(PendingOperation::Proposal(PendingProposal {
            creator: ctx.sender.clone(),
            metadata,
            action,
            origin_point: ctx.level,
        }));
        tracing::debug!(creator = %ctx.sender, %point, "proposal registration awaiting snapshot");

        Ok(self.request(&ctx.sender, point, Continuation::RegisterProposalCallback))
    }

    /// Resume a registration with the proposer's balance.
    pub fn register_proposal_callback(
        &mut self,
        ctx: &CallContext,
        balance: u128,
    ) -> Result<ProposalId, GovernanceError> {
        self.ensure_oracle(ctx)?;
        match &self.pending {
            None => return Err(GovernanceError::IncorrectState),
            Some(PendingOperation::Vote(_)) => return Err(GovernanceError::ProposalBufferEmpty),
            Some(PendingOperation::Proposal(_)) => {}
        }
        if balance < self.params.proposal_threshold {
            return Err(GovernanceError::NotEnoughTokens {
                balance,
                threshold: self.params.proposal_threshold,
            });
        }
        let Some(PendingOperation::Proposal(buffer)) = self.pending.take() else {
            return Err(GovernanceError::ProposalBufferEmpty);
        };

        let proposal = Proposal {
            id: self.proposals.next_id(),
            creator: buffer.creator,
            metadata: buffer.metadata,
            action: buffer.action,
            up_votes: 0,
            down_votes: 0,
            voters: BTreeMap::new(),
            voting_deadline: ctx.now.add_seconds(self.params.voting_period),
            origin_point: buffer.origin_point,
            timelock: Timelock::default(),
            status: ProposalStatus::Voting,
        };
        let (creator, deadline, origin) = (
            proposal.creator.clone(),
            proposal.voting_deadline,
            proposal.origin_point,
        );
        let id = self.proposals.insert(proposal);
        tracing::info!(
            proposal_id = id,
            %creator,
            %origin,
            %deadline,
            "proposal registered"
        );
        Ok(id)
    }

    /// Cast a vote; its weight is the voter's balance at the proposal's
    /// origin point, delivered to `vote_callback`.
    pub fn vote(
        &mut self,
        ctx: &CallContext,
        proposal_id: ProposalId,
        vote_value: u64,
    ) -> Result<OracleRequest, GovernanceError> {
        self.ensure_idle()?;
        let proposal = self
            .proposals
            .get(proposal_id)
            .ok_or(GovernanceError::InvalidProposalId(proposal_id))?;
        if proposal.status != ProposalStatus::Voting || ctx.now >= proposal.voting_deadline {
            return Err(GovernanceError::VotingAlreadyEnded(proposal_id));
        }
        if proposal.has_voted(&ctx.sender) {
            return Err(GovernanceError::AlreadyVoted {
                voter: ctx.sender.clone(),
                proposal_id,
            });
        }
        let point = proposal.origin_point;

        self.pending = Some(PendingOperation::Vote(PendingVote {
            voter: ctx.sender.clone(),
            proposal_id,
            vote_value,
        }));
        tracing::debug!(voter = %ctx.sender, proposal_id, %point, "vote awaiting snapshot");

        Ok(self.request(&ctx.sender, point, Continuation::VoteCallback))
    }

    /// Resume a vote with the voter's weight.
    pub fn vote_callback(
        &mut self,
        ctx: &CallContext,
        balance: u128,
    ) -> Result<(), GovernanceError> {
        self.ensure_oracle(ctx)?;
        let buffer = match &self.pending {
            None => return Err(GovernanceError::IncorrectState),
            Some(PendingOperation::Proposal(_)) => return Err(GovernanceError::VotingBufferEmpty),
            Some(PendingOperation::Vote(buffer)) => buffer,
        };
        if balance == 0 {
            return Err(GovernanceError::InvalidVote);
        }
        let choice = VoteChoice::try_from(buffer.vote_value)
            .map_err(GovernanceError::InvalidVoteValue)?;
        let proposal = self
            .proposals
            .get(buffer.proposal_id)
            .ok_or(GovernanceError::InvalidProposalId(buffer.proposal_id))?;
        let tally = match choice {
            VoteChoice::Up => proposal.up_votes,
            VoteChoice::Down => proposal.down_votes,
        }
        .checked_add(balance)
        .ok_or(GovernanceError::Overflow)?;

        let Some(PendingOperation::Vote(buffer)) = self.pending.take() else {
            return Err(GovernanceError::VotingBufferEmpty);
        };
        let proposal = self
            .proposals
            .get_mut(buffer.proposal_id)
            .ok_or(GovernanceError::InvalidProposalId(buffer.proposal_id))?;
        match choice {
            VoteChoice::Up => proposal.up_votes = tally,
            VoteChoice::Down => proposal.down_votes = tally,
        }
        proposal.voters.insert(
            buffer.voter.clone(),
            VoteRecord {
                weight: balance,
                choice,
            },
        );
        tracing::info!(
            proposal_id = buffer.proposal_id,
            voter = %buffer.voter,
            weight = balance,
            ?choice,
            "vote recorded"
        );
        Ok(())
    }

    /// Close voting and decide the proposal.
    ///
    /// Passes on a strict majority that also meets quorum; a tie rejects.
    pub fn end_voting(
        &mut self,
        ctx: &CallContext,
        proposal_id: ProposalId,
    ) -> Result<ProposalStatus, GovernanceError> {
        let quorum_votes = self.params.quorum_votes;
        let timelock_period = self.params.timelock_period;
        let proposal = self
            .proposals
            .get_mut(proposal_id)
            .ok_or(GovernanceError::InvalidProposalId(proposal_id))?;
        if ctx.now <= proposal.voting_deadline {
            return Err(GovernanceError::VotingOngoing(proposal_id));
        }
        if proposal.status != ProposalStatus::Voting {
            return Err(GovernanceError::VotingAlreadyEnded(proposal_id));
        }

        if proposal.passes(quorum_votes) {
            proposal.timelock = Timelock {
                active: true,
                release_at: ctx.now.add_seconds(timelock_period),
            };
            proposal.status = ProposalStatus::Timelocked;
        } else {
            proposal.status = ProposalStatus::Rejected;
        }
        tracing::info!(
            proposal_id,
            up = proposal.up_votes,
            down = proposal.down_votes,
            status = ?proposal.status,
            "voting ended"
        );
        Ok(proposal.status)
    }

    /// Run a timelocked proposal's action once its timelock has released.
    ///
    /// Returns the action's effects for the environment to carry out with
    /// this engine as sender.
    pub fn execute_proposal(
        &mut self,
        ctx: &CallContext,
        proposal_id: ProposalId,
    ) -> Result<Vec<Effect>, GovernanceError> {
        let proposal = self
            .proposals
            .get_mut(proposal_id)
            .ok_or(GovernanceError::InvalidProposalId(proposal_id))?;
        if proposal.status != ProposalStatus::Timelocked {
            return Err(GovernanceError::TimelockInactive(proposal_id));
        }
        if ctx.now <= proposal.timelock.release_at {
            return Err(GovernanceError::ExecutingTooSoon(proposal_id));
        }

        let effects = self.executor.execute(proposal);
        proposal.status = ProposalStatus::Executed;
        tracing::info!(proposal_id, effects = effects.len(), "proposal executed");
        Ok(effects)
    }

    /// Replace the governance parameters. Only the engine itself may call
    /// this, which in practice means an executed proposal's effect.
    pub fn set_governance_parameters(
        &mut self,
        ctx: &CallContext,
        params: GovernanceParams,
    ) -> Result<(), GovernanceError> {
        if ctx.sender != self.address {
            return Err(GovernanceError::NotAllowed(ctx.sender.clone()));
        }
        tracing::info!(?params, "governance parameters updated");
        self.params = params;
        Ok(())
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn oracle(&self) -> &Address {
        &self.oracle
    }

    pub fn governance_parameters(&self) -> &GovernanceParams {
        &self.params
    }

    pub fn state(&self) -> MachineState {
        if self.pending.is_some() {
            MachineState::AwaitingSnapshot
        } else {
            MachineState::Idle
        }
    }

    pub fn pending(&self) -> Option<&PendingOperation> {
        self.pending.as_ref()
    }

    pub fn proposal(&self, id: ProposalId) -> Option<&Proposal> {
        self.proposals.get(id)
    }

    pub fn proposal_count(&self) -> usize {
        self.proposals.len()
    }

    pub fn proposals(&self) -> &ProposalStore {
        &self.proposals
    }

    fn ensure_idle(&self) -> Result<(), GovernanceError> {
        match &self.pending {
            None => Ok(()),
            Some(pending) => {
                tracing::warn!(
                    pending = pending.kind(),
                    "suspending call refused while a snapshot is pending"
                );
                Err(GovernanceError::IncorrectState)
            }
        }
    }

    fn ensure_oracle(&self, ctx: &CallContext) -> Result<(), GovernanceError> {
        if ctx.sender == self.oracle {
            Ok(())
        } else {
            Err(GovernanceError::NotAllowed(ctx.sender.clone()))
        }
    }

    fn request(
        &self,
        address: &Address,
        point: flow_types::Point,
        reply_to: Continuation,
    ) -> OracleRequest {
        OracleRequest {
            oracle: self.oracle.clone(),
            query: BalanceQuery {
                address: address.clone(),
                point,
            },
            reply_to,
        }
    }
}
