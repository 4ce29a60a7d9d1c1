//! Runs approved proposal actions.

use crate::proposal::Proposal;
use flow_types::Effect;

/// Invokes a proposal's action and hands its effects back for relaying.
#[derive(Clone, Debug, Default)]
pub struct ActionExecutor;

impl ActionExecutor {
    pub fn execute(&self, proposal: &Proposal) -> Vec<Effect> {
        let effects = proposal.action.invoke();
        tracing::debug!(
            proposal_id = proposal.id,
            effects = effects.len(),
            "proposal action invoked"
        );
        effects
    }
}
