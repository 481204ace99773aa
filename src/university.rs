//! Accepted proposal storage
//!
//! The university's active programme: an ordered list of accepted proposals.
//! Accepted proposals are only mutated through this type.

use tracing::debug;

use crate::error::{invalid_argument, GameResult};
use crate::proposal::{Proposal, ProposalId};

/// Ordered set of accepted proposals, insertion order preserved
#[derive(Debug, Clone, Default)]
pub struct AcceptedProposalSet {
    proposals: Vec<Proposal>,
}

impl AcceptedProposalSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a proposal. A second proposal carrying an id already in the set
    /// would alias one catalog entry twice and is rejected.
    pub fn add(&mut self, proposal: Proposal) -> GameResult<()> {
        if self.contains(proposal.id()) {
            return Err(invalid_argument(format!(
                "proposal {} is already accepted",
                proposal.id()
            )));
        }
        debug!(id = proposal.id(), name = proposal.name(), "Accepted proposal");
        self.proposals.push(proposal);
        Ok(())
    }

    /// Remove and hand back the first proposal with `id`, if any
    pub fn remove(&mut self, id: ProposalId) -> Option<Proposal> {
        let index = self.proposals.iter().position(|p| p.id() == id)?;
        let removed = self.proposals.remove(index);
        debug!(id, "Removed accepted proposal");
        Some(removed)
    }

    /// Read-only view in acceptance order
    pub fn list(&self) -> &[Proposal] {
        &self.proposals
    }

    /// Owned copy, detached from the set
    pub fn snapshot(&self) -> Vec<Proposal> {
        self.proposals.clone()
    }

    pub fn get(&self, id: ProposalId) -> Option<&Proposal> {
        self.proposals.iter().find(|p| p.id() == id)
    }

    pub fn contains(&self, id: ProposalId) -> bool {
        self.get(id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.proposals.is_empty()
    }

    pub fn len(&self) -> usize {
        self.proposals.len()
    }

    pub fn set_students(&mut self, id: ProposalId, students: u32) -> GameResult<()> {
        self.get_mut(id)?.set_students(students)
    }

    pub fn set_graduation(&mut self, id: ProposalId, percent: u32) -> GameResult<()> {
        self.get_mut(id)?.set_graduation_percent(percent)
    }

    fn get_mut(&mut self, id: ProposalId) -> GameResult<&mut Proposal> {
        self.proposals
            .iter_mut()
            .find(|p| p.id() == id)
            .ok_or_else(|| invalid_argument(format!("proposal {} is not accepted", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GameError;
    use crate::proposal::Field;
    use pretty_assertions::assert_eq;

    fn proposal(id: ProposalId) -> Proposal {
        Proposal::new(id, format!("Formation {}", id), Field::Biology, 100, 20).unwrap()
    }

    fn ids(set: &AcceptedProposalSet) -> Vec<ProposalId> {
        set.list().iter().map(Proposal::id).collect()
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let mut set = AcceptedProposalSet::new();
        assert!(set.is_empty());
        set.add(proposal(4)).unwrap();
        set.add(proposal(1)).unwrap();
        set.add(proposal(9)).unwrap();

        assert_eq!(ids(&set), vec![4, 1, 9]);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_add_rejects_aliased_id() {
        let mut set = AcceptedProposalSet::new();
        set.add(proposal(2)).unwrap();
        let err = set.add(proposal(2)).unwrap_err();
        assert!(matches!(err, GameError::InvalidArgument(_)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_remove_returns_proposal_and_keeps_order() {
        let mut set = AcceptedProposalSet::new();
        for id in [1, 2, 3] {
            set.add(proposal(id)).unwrap();
        }

        let removed = set.remove(2).unwrap();
        assert_eq!(removed.id(), 2);
        assert_eq!(ids(&set), vec![1, 3]);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut set = AcceptedProposalSet::new();
        set.add(proposal(1)).unwrap();
        assert!(set.remove(5).is_none());
        assert_eq!(ids(&set), vec![1]);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut set = AcceptedProposalSet::new();
        set.add(proposal(1)).unwrap();
        let snapshot = set.snapshot();

        set.set_students(1, 40).unwrap();
        assert_eq!(snapshot[0].students(), 0);
        assert_eq!(set.get(1).unwrap().students(), 40);
    }

    #[test]
    fn test_setters_reject_unknown_id_and_out_of_range() {
        let mut set = AcceptedProposalSet::new();
        set.add(proposal(1)).unwrap();

        assert!(matches!(set.set_students(2, 10), Err(GameError::InvalidArgument(_))));
        assert!(matches!(set.set_graduation(1, 101), Err(GameError::InvalidArgument(_))));

        set.set_graduation(1, 75).unwrap();
        assert_eq!(set.get(1).unwrap().graduation_percent(), 75);
    }
}
