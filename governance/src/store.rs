//! Proposal storage.

use crate::proposal::{Proposal, ProposalId};
use std::collections::BTreeMap;

/// Keyed proposal storage: insert once, read many, mutate in place.
///
/// Proposals are never removed; ids are handed out in increasing order
/// starting at 1.
#[derive(Clone, Debug, Default)]
pub struct ProposalStore {
    proposals: BTreeMap<ProposalId, Proposal>,
    last_id: ProposalId,
}

impl ProposalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The id the next inserted proposal will receive.
    pub fn next_id(&self) -> ProposalId {
        self.last_id.saturating_add(1)
    }

    /// Store `proposal` under the next id, overriding whatever id it carried.
    pub fn insert(&mut self, mut proposal: Proposal) -> ProposalId {
        let id = self.next_id();
        proposal.id = id;
        self.proposals.insert(id, proposal);
        self.last_id = id;
        id
    }

    pub fn get(&self, id: ProposalId) -> Option<&Proposal> {
        self.proposals.get(&id)
    }

    pub fn get_mut(&mut self, id: ProposalId) -> Option<&mut Proposal> {
        self.proposals.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.proposals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proposals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Proposal> {
        self.proposals.values()
    }
}
