//! Proposal module
//!
//! Curriculum proposals and the generator that draws them from the catalog.

mod generator;
mod models;

pub use generator::ProposalGenerator;
pub use models::{Field, Proposal, ProposalId};
