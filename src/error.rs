//! Error handling module
//!
//! Provides the unified error type for the simulation core.

use serde::Serialize;
use thiserror::Error;

use crate::session::Phase;

/// Crate-wide error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GameError {
    /// A turn transition precondition does not hold. Recoverable.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Draw pool exhausted: every catalog entry has already been drawn")]
    ExhaustedPool,

    #[error("Catalog inconsistency: no record for drawn proposal {id}")]
    CatalogInconsistency { id: u32 },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Operation attempted from the wrong session phase. Programmer error.
    #[error("Invalid state: cannot {operation} while session is {phase}")]
    InvalidState {
        operation: &'static str,
        phase: Phase,
    },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Catalog load error: {0}")]
    CatalogLoad(String),
}

/// Serializable view of an error, handed to observers and logs
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReport {
    pub title: String,
    pub message: String,
    pub code: String,
}

impl GameError {
    /// Stable machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            GameError::Validation(_) => "VALIDATION_ERROR",
            GameError::ExhaustedPool => "POOL_EXHAUSTED",
            GameError::CatalogInconsistency { .. } => "CATALOG_INCONSISTENCY",
            GameError::InvalidArgument(_) => "INVALID_ARGUMENT",
            GameError::InvalidState { .. } => "INVALID_STATE",
            GameError::Parse(_) => "PARSE_ERROR",
            GameError::CatalogLoad(_) => "CATALOG_LOAD_ERROR",
        }
    }

    /// Short heading shown next to the message
    pub fn title(&self) -> &'static str {
        match self {
            GameError::Validation(_) => "Cannot advance",
            GameError::ExhaustedPool => "No proposals left",
            GameError::CatalogInconsistency { .. } | GameError::CatalogLoad(_) => "Catalog error",
            GameError::InvalidArgument(_) | GameError::Parse(_) => "Invalid input",
            GameError::InvalidState { .. } => "Invalid state",
        }
    }

    /// Message without the category prefix that `Display` adds
    pub fn detail(&self) -> String {
        match self {
            GameError::Validation(msg)
            | GameError::InvalidArgument(msg)
            | GameError::Parse(msg)
            | GameError::CatalogLoad(msg) => msg.clone(),
            other => other.to_string(),
        }
    }

    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            title: self.title().to_string(),
            message: self.detail(),
            code: self.code().to_string(),
        }
    }
}

impl From<serde_json::Error> for GameError {
    fn from(e: serde_json::Error) -> Self {
        GameError::CatalogLoad(e.to_string())
    }
}

/// Result type alias for the simulation core
pub type GameResult<T> = Result<T, GameError>;

/// Helper function to create a validation error
pub fn validation_error(msg: impl Into<String>) -> GameError {
    GameError::Validation(msg.into())
}

/// Helper function to create an invalid argument error
pub fn invalid_argument(msg: impl Into<String>) -> GameError {
    GameError::InvalidArgument(msg.into())
}
