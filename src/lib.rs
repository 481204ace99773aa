//! Torrington - university curriculum simulation core
//!
//! A university administrator accepts curriculum proposals year after year
//! and is scored on four ratios: attractiveness, success, insertion and
//! satisfaction.
//!
//! - `catalog`: read-only source of formation records
//! - `proposal`: proposals and the without-replacement generator
//! - `university`: the accepted proposal set
//! - `ratio`: pure KPI formulas
//! - `session`: the turn state machine
//! - `observer`: notification sinks for the presentation layer

pub mod catalog;
pub mod config;
pub mod error;
pub mod observer;
pub mod proposal;
pub mod ratio;
pub mod session;
pub mod university;

pub use catalog::{CatalogRecord, InMemoryCatalog, ProposalCatalog};
pub use error::{GameError, GameResult};
pub use observer::{
    NoopObserver, ObserverRegistry, RecordingObserver, SessionEvent, SessionObserver,
    TracingObserver,
};
pub use proposal::{Field, Proposal, ProposalGenerator, ProposalId};
pub use ratio::Ratios;
pub use session::{GameSession, Phase, SessionSummary, TurnOutcome};
pub use university::AcceptedProposalSet;
