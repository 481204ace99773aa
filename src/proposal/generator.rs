//! Proposal generator
//!
//! Samples catalog ids without replacement. The exclusion set holds every id
//! that is currently out of the pool, either offered as a candidate or accepted.

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, error};

use crate::catalog::ProposalCatalog;
use crate::error::{invalid_argument, GameError, GameResult};
use crate::proposal::{Proposal, ProposalId};

pub struct ProposalGenerator<C> {
    catalog: C,
    rng: StdRng,
    /// Invariant: every id is in `1..=catalog.len()`
    excluded: BTreeSet<ProposalId>,
}

impl<C: ProposalCatalog> ProposalGenerator<C> {
    pub fn new(catalog: C) -> Self {
        Self::with_rng(catalog, StdRng::from_entropy())
    }

    /// Reproducible draw order for a given seed
    pub fn with_seed(catalog: C, seed: u64) -> Self {
        Self::with_rng(catalog, StdRng::seed_from_u64(seed))
    }

    fn with_rng(catalog: C, rng: StdRng) -> Self {
        Self {
            catalog,
            rng,
            excluded: BTreeSet::new(),
        }
    }

    /// Pool size T
    pub fn total_count(&self) -> u32 {
        self.catalog.len()
    }

    pub fn drawn_count(&self) -> u32 {
        self.excluded.len() as u32
    }

    pub fn remaining_count(&self) -> u32 {
        self.total_count() - self.drawn_count()
    }

    pub fn is_drawn(&self, id: ProposalId) -> bool {
        self.excluded.contains(&id)
    }

    /// Draw one proposal uniformly among the ids still in the pool.
    ///
    /// A failed draw (catalog miss or unparseable record) puts the id back, so
    /// the pool is unchanged on every error path.
    pub fn draw(&mut self) -> GameResult<Proposal> {
        if self.remaining_count() == 0 {
            return Err(GameError::ExhaustedPool);
        }

        let total = self.total_count();
        let id = loop {
            let candidate = self.rng.gen_range(1..=total);
            if !self.excluded.contains(&candidate) {
                break candidate;
            }
        };
        self.excluded.insert(id);

        let result = match self.catalog.lookup(id) {
            Some(record) => Proposal::from_record(id, &record),
            None => Err(GameError::CatalogInconsistency { id }),
        };

        match &result {
            Ok(proposal) => debug!(
                id,
                name = proposal.name(),
                remaining = self.remaining_count(),
                "Drew proposal"
            ),
            Err(e) => {
                self.excluded.remove(&id);
                error!(id, error = %e, "Draw failed, id returned to pool");
            }
        }
        result
    }

    /// Draw up to `count` proposals. Near exhaustion this returns fewer than
    /// requested; it only fails outright when the pool is already empty.
    pub fn draw_many(&mut self, count: usize) -> GameResult<Vec<Proposal>> {
        if self.remaining_count() == 0 {
            return Err(GameError::ExhaustedPool);
        }

        let available = usize::try_from(self.remaining_count()).unwrap_or(usize::MAX);
        let mut drawn = Vec::with_capacity(count.min(available));
        for _ in 0..count.min(available) {
            match self.draw() {
                Ok(proposal) => drawn.push(proposal),
                Err(e) => {
                    for proposal in &drawn {
                        self.release(proposal.id());
                    }
                    return Err(e);
                }
            }
        }
        Ok(drawn)
    }

    /// Make `id` drawable again. Returns whether it was out of the pool.
    pub fn release(&mut self, id: ProposalId) -> bool {
        let removed = self.excluded.remove(&id);
        if removed {
            debug!(id, remaining = self.remaining_count(), "Returned proposal to pool");
        }
        removed
    }

    /// Take `id` out of the pool without drawing it.
    pub fn reserve(&mut self, id: ProposalId) -> GameResult<()> {
        if id == 0 || id > self.total_count() {
            return Err(invalid_argument(format!(
                "proposal id {} is outside the catalog range 1..={}",
                id,
                self.total_count()
            )));
        }
        self.excluded.insert(id);
        Ok(())
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogRecord, InMemoryCatalog};
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    fn catalog(size: u32) -> InMemoryCatalog {
        let records = (1..=size)
            .map(|i| CatalogRecord::new(format!("Formation {}", i), "ENGINEERING", 100 + i, 10 + i))
            .collect();
        InMemoryCatalog::new(records).unwrap()
    }

    /// Reports `len` ids but has holes or bad rows at chosen positions.
    struct PatchyCatalog {
        len: u32,
        missing: Vec<ProposalId>,
        bad_field: Vec<ProposalId>,
    }

    impl ProposalCatalog for PatchyCatalog {
        fn len(&self) -> u32 {
            self.len
        }

        fn lookup(&self, id: ProposalId) -> Option<CatalogRecord> {
            if self.missing.contains(&id) {
                return None;
            }
            let field = if self.bad_field.contains(&id) { "ALCHEMY" } else { "LAW" };
            Some(CatalogRecord::new(format!("Formation {}", id), field, 10, 5))
        }
    }

    #[test]
    fn test_draws_every_id_exactly_once_then_exhausts() {
        let mut generator = ProposalGenerator::with_seed(catalog(17), 42);
        let mut seen = HashSet::new();

        for _ in 0..17 {
            let proposal = generator.draw().unwrap();
            assert!((1..=17).contains(&proposal.id()));
            assert!(seen.insert(proposal.id()), "id {} drawn twice", proposal.id());
            assert_eq!(proposal.students(), 0);
            assert_eq!(proposal.graduation_percent(), 0);
        }

        assert_eq!(generator.remaining_count(), 0);
        assert_eq!(generator.drawn_count(), 17);
        assert_eq!(generator.draw().unwrap_err(), GameError::ExhaustedPool);
    }

    #[test]
    fn test_release_makes_ids_drawable_again() {
        let mut generator = ProposalGenerator::with_seed(catalog(5), 7);
        let drawn: Vec<_> = (0..5).map(|_| generator.draw().unwrap().id()).collect();
        assert_eq!(generator.remaining_count(), 0);

        assert!(generator.release(drawn[1]));
        assert!(generator.release(drawn[3]));
        assert_eq!(generator.remaining_count(), 2);

        let mut again: Vec<_> = (0..2).map(|_| generator.draw().unwrap().id()).collect();
        again.sort_unstable();
        let mut expected = vec![drawn[1], drawn[3]];
        expected.sort_unstable();
        assert_eq!(again, expected);
    }

    #[test]
    fn test_release_unknown_id_is_noop() {
        let mut generator = ProposalGenerator::with_seed(catalog(3), 1);
        assert!(!generator.release(2));
        assert_eq!(generator.remaining_count(), 3);
    }

    #[test]
    fn test_catalog_miss_returns_id_to_pool() {
        let mut generator = ProposalGenerator::with_seed(
            PatchyCatalog {
                len: 1,
                missing: vec![1],
                bad_field: vec![],
            },
            3,
        );

        let err = generator.draw().unwrap_err();
        assert_eq!(err, GameError::CatalogInconsistency { id: 1 });
        assert_eq!(generator.remaining_count(), 1);
        assert!(!generator.is_drawn(1));
    }

    #[test]
    fn test_unparseable_field_returns_id_to_pool() {
        let mut generator = ProposalGenerator::with_seed(
            PatchyCatalog {
                len: 1,
                missing: vec![],
                bad_field: vec![1],
            },
            3,
        );

        assert!(matches!(generator.draw().unwrap_err(), GameError::Parse(_)));
        assert_eq!(generator.drawn_count(), 0);
    }

    #[test]
    fn test_same_seed_same_order() {
        let mut a = ProposalGenerator::with_seed(catalog(17), 2024);
        let mut b = ProposalGenerator::with_seed(catalog(17), 2024);
        let order_a: Vec<_> = (0..17).map(|_| a.draw().unwrap().id()).collect();
        let order_b: Vec<_> = (0..17).map(|_| b.draw().unwrap().id()).collect();
        assert_eq!(order_a, order_b);
    }

    #[test]
    fn test_draw_many_caps_at_remaining() {
        let mut generator = ProposalGenerator::with_seed(catalog(4), 9);
        assert_eq!(generator.draw_many(3).unwrap().len(), 3);
        assert_eq!(generator.draw_many(3).unwrap().len(), 1);
        assert_eq!(generator.draw_many(3).unwrap_err(), GameError::ExhaustedPool);
    }

    #[test]
    fn test_draw_many_rolls_back_on_failure() {
        let mut generator = ProposalGenerator::with_seed(
            PatchyCatalog {
                len: 3,
                missing: vec![],
                bad_field: vec![1, 2, 3],
            },
            5,
        );
        assert!(generator.draw_many(3).is_err());
        assert_eq!(generator.remaining_count(), 3);
    }

    #[test]
    fn test_reserve_excludes_and_validates_range() {
        let mut generator = ProposalGenerator::with_seed(catalog(3), 11);
        generator.reserve(2).unwrap();
        assert!(generator.is_drawn(2));
        assert_eq!(generator.remaining_count(), 2);

        assert!(matches!(generator.reserve(0), Err(GameError::InvalidArgument(_))));
        assert!(matches!(generator.reserve(4), Err(GameError::InvalidArgument(_))));

        for _ in 0..2 {
            assert_ne!(generator.draw().unwrap().id(), 2);
        }
    }
}
