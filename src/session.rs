//! Game session
//!
//! Drives one play-through: `Created → Started → Ended`. Every operation runs
//! to completion and notifies observers inline before returning.
//!
//! Turn validation failures are reported to observers through `on_error` and
//! returned to the caller; the session is left exactly as it was. Calling an
//! operation from the wrong phase returns `GameError::InvalidState` without
//! notifying anyone.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::catalog::ProposalCatalog;
use crate::config::SessionConfig;
use crate::error::{invalid_argument, validation_error, GameError, GameResult};
use crate::observer::{ObserverRegistry, SessionObserver};
use crate::proposal::{Proposal, ProposalGenerator, ProposalId};
use crate::ratio::{self, Ratios, ZERO_STUDENTS_MESSAGE};
use crate::university::AcceptedProposalSet;

pub const EMPTY_SELECTION_MESSAGE: &str = "at least one proposal must be accepted";

/// Session lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Built, not yet started
    Created,
    /// Turns are being played
    Started,
    /// Terminal
    Ended,
}

impl Default for Phase {
    fn default() -> Self {
        Phase::Created
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Created => "created",
            Phase::Started => "started",
            Phase::Ended => "ended",
        })
    }
}

/// What a call to `next_turn` did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TurnOutcome {
    /// The year moved forward
    Advanced { year: i32, ratios: Ratios },
    /// The draw pool was empty, so the session ended instead
    Ended { ratios: Ratios },
}

/// Serializable point-in-time view of a session
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub id: Uuid,
    pub phase: Phase,
    pub year: i32,
    pub accepted: Vec<Proposal>,
    pub drawn: u32,
    pub remaining: u32,
    /// `None` while some accepted proposal has no students
    pub ratios: Option<Ratios>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
}

pub struct GameSession<C> {
    id: Uuid,
    phase: Phase,
    start_year: i32,
    year: i32,
    university: AcceptedProposalSet,
    generator: ProposalGenerator<C>,
    /// Ids handed to the caller and not yet accepted or declined: drawn
    /// candidates and proposals removed from the university.
    offered: BTreeSet<ProposalId>,
    observers: ObserverRegistry,
    created_at: DateTime<Utc>,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
}

impl<C: ProposalCatalog> GameSession<C> {
    /// Session over `catalog` with an entropy-seeded sampler
    pub fn new(catalog: C) -> Self {
        Self::with_generator(ProposalGenerator::new(catalog), crate::config::DEFAULT_START_YEAR)
    }

    pub fn with_seed(catalog: C, seed: u64) -> Self {
        Self::with_generator(
            ProposalGenerator::with_seed(catalog, seed),
            crate::config::DEFAULT_START_YEAR,
        )
    }

    pub fn from_config(catalog: C, config: &SessionConfig) -> Self {
        let generator = match config.seed {
            Some(seed) => ProposalGenerator::with_seed(catalog, seed),
            None => ProposalGenerator::new(catalog),
        };
        Self::with_generator(generator, config.start_year)
    }

    pub fn with_generator(generator: ProposalGenerator<C>, start_year: i32) -> Self {
        let session = Self {
            id: Uuid::new_v4(),
            phase: Phase::Created,
            start_year,
            year: start_year,
            university: AcceptedProposalSet::new(),
            generator,
            offered: BTreeSet::new(),
            observers: ObserverRegistry::new(),
            created_at: Utc::now(),
            started_at: None,
            ended_at: None,
        };
        debug!(
            session_id = %session.id,
            pool = session.generator.total_count(),
            "Session created"
        );
        session
    }

    /// Add an observer; dispatch follows registration order.
    pub fn register_observer(&mut self, observer: impl SessionObserver + 'static) {
        self.observers.register(Box::new(observer));
    }

    // ==================== Lifecycle ====================

    pub fn start(&mut self) -> GameResult<()> {
        self.require_phase(Phase::Created, "start the game")?;

        self.year = self.start_year;
        self.phase = Phase::Started;
        self.started_at = Some(Utc::now());
        info!(session_id = %self.id, year = self.year, "Session started");

        self.observers.notify_next_round(self.year);
        self.observers.notify_ratios_updated(&Ratios::ZERO);
        Ok(())
    }

    /// Advance one year, or end the session if the draw pool is empty.
    pub fn next_turn(&mut self) -> GameResult<TurnOutcome> {
        self.require_phase(Phase::Started, "advance the turn")?;
        self.validate_turn()?;

        if self.generator.remaining_count() == 0 {
            info!(session_id = %self.id, "Draw pool exhausted, ending session");
            let ratios = self.end_game()?;
            return Ok(TurnOutcome::Ended { ratios });
        }

        self.year += 1;
        let ratios = self.ratios()?;
        info!(session_id = %self.id, year = self.year, "Advanced to next year");

        self.observers.notify_next_round(self.year);
        self.observers.notify_ratios_updated(&ratios);
        Ok(TurnOutcome::Advanced {
            year: self.year,
            ratios,
        })
    }

    /// Close the session. Succeeds at most once.
    pub fn end_game(&mut self) -> GameResult<Ratios> {
        self.require_phase(Phase::Started, "end the game")?;
        let ratios = self.validate_turn()?;

        self.phase = Phase::Ended;
        self.ended_at = Some(Utc::now());
        info!(
            session_id = %self.id,
            year = self.year,
            satisfaction = ratios.satisfaction,
            "Session ended"
        );

        self.observers.notify_game_ended(&ratios);
        Ok(ratios)
    }

    // ==================== Proposals ====================

    /// Draw one candidate from the pool
    pub fn draw(&mut self) -> GameResult<Proposal> {
        self.ensure_open("draw a proposal")?;
        let proposal = self.generator.draw()?;
        self.offered.insert(proposal.id());
        Ok(proposal)
    }

    /// Draw up to `count` candidates; fewer near pool exhaustion
    pub fn draw_candidates(&mut self, count: usize) -> GameResult<Vec<Proposal>> {
        self.ensure_open("draw proposals")?;
        let proposals = self.generator.draw_many(count)?;
        self.offered.extend(proposals.iter().map(Proposal::id));
        Ok(proposals)
    }

    /// Accept a proposal into the university. Its id leaves the draw pool.
    ///
    /// Only proposals this session handed out are admitted, and they must
    /// still match their catalog record.
    pub fn add_proposal(&mut self, proposal: Proposal) -> GameResult<()> {
        self.ensure_open("add a proposal")?;
        let id = proposal.id();
        if self.university.contains(id) {
            return Err(invalid_argument(format!("proposal {} is already accepted", id)));
        }
        if !self.offered.contains(&id) {
            return Err(invalid_argument(format!(
                "proposal {} was not offered by this session",
                id
            )));
        }
        self.ensure_catalog_match(&proposal)?;

        self.generator.reserve(id)?;
        self.university.add(proposal)?;
        self.offered.remove(&id);
        Ok(())
    }

    /// Drop an accepted proposal and put its id back in the draw pool.
    pub fn remove_proposal(&mut self, id: ProposalId) -> GameResult<Option<Proposal>> {
        self.ensure_open("remove a proposal")?;
        let removed = self.university.remove(id);
        if removed.is_some() {
            self.generator.release(id);
            self.offered.insert(id);
        }
        Ok(removed)
    }

    /// Turn down a drawn candidate; it becomes drawable again.
    pub fn decline_proposal(&mut self, proposal: Proposal) -> GameResult<()> {
        self.ensure_open("decline a proposal")?;
        if self.university.contains(proposal.id()) {
            return Err(invalid_argument(format!(
                "proposal {} is accepted; remove it instead",
                proposal.id()
            )));
        }
        if !self.offered.remove(&proposal.id()) {
            return Err(invalid_argument(format!(
                "proposal {} is not an outstanding candidate",
                proposal.id()
            )));
        }
        self.generator.release(proposal.id());
        Ok(())
    }

    pub fn set_students(&mut self, id: ProposalId, students: u32) -> GameResult<()> {
        self.ensure_open("change student numbers")?;
        self.university.set_students(id, students)
    }

    pub fn set_graduation(&mut self, id: ProposalId, percent: u32) -> GameResult<()> {
        self.ensure_open("change graduation rates")?;
        self.university.set_graduation(id, percent)
    }

    // ==================== Queries ====================

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Fresh ratios over the accepted set
    pub fn ratios(&self) -> GameResult<Ratios> {
        ratio::compute(self.university.list())
    }

    /// Detached copy of the accepted proposals, in acceptance order
    pub fn accepted_proposals(&self) -> Vec<Proposal> {
        self.university.snapshot()
    }

    pub fn remaining_count(&self) -> u32 {
        self.generator.remaining_count()
    }

    pub fn drawn_count(&self) -> u32 {
        self.generator.drawn_count()
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.id,
            phase: self.phase,
            year: self.year,
            accepted: self.university.snapshot(),
            drawn: self.generator.drawn_count(),
            remaining: self.generator.remaining_count(),
            ratios: self.ratios().ok(),
            created_at: self.created_at,
            started_at: self.started_at,
            ended_at: self.ended_at,
        }
    }

    // ==================== Helpers ====================

    /// Accepted set non-empty and every proposal staffed.
    fn validate_turn(&self) -> GameResult<Ratios> {
        if self.university.is_empty() {
            return Err(self.report(validation_error(EMPTY_SELECTION_MESSAGE)));
        }
        if let Some(proposal) = ratio::find_zero_students(self.university.list()) {
            debug!(id = proposal.id(), "Accepted proposal has no students");
            return Err(self.report(validation_error(ZERO_STUDENTS_MESSAGE)));
        }
        self.ratios()
    }

    fn ensure_catalog_match(&self, proposal: &Proposal) -> GameResult<()> {
        let id = proposal.id();
        let record = self
            .generator
            .catalog()
            .lookup(id)
            .ok_or(GameError::CatalogInconsistency { id })?;
        let genuine = Proposal::from_record(id, &record)?;
        if !genuine.same_offering(proposal) {
            warn!(session_id = %self.id, id, "Proposal does not match its catalog record");
            return Err(invalid_argument(format!(
                "proposal {} does not match its catalog record",
                id
            )));
        }
        Ok(())
    }

    fn report(&self, err: GameError) -> GameError {
        let report = err.report();
        warn!(
            session_id = %self.id,
            code = %report.code,
            error = %err,
            "Turn validation failed"
        );
        self.observers.notify_error(&report.title, &report.message);
        err
    }

    fn require_phase(&self, expected: Phase, operation: &'static str) -> GameResult<()> {
        if self.phase == expected {
            return Ok(());
        }
        error!(session_id = %self.id, phase = %self.phase, operation, "Invalid session transition");
        Err(GameError::InvalidState {
            operation,
            phase: self.phase,
        })
    }

    fn ensure_open(&self, operation: &'static str) -> GameResult<()> {
        if self.phase == Phase::Ended {
            error!(session_id = %self.id, operation, "Session already ended");
            return Err(GameError::InvalidState {
                operation,
                phase: self.phase,
            });
        }
        Ok(())
    }
}
