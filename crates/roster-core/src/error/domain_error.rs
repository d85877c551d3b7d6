//! Domain errors - error types for the domain layer

use thiserror::Error;
use uuid::Uuid;

/// Errors raised by repositories and domain checks
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Team not found: {0}")]
    TeamNotFound(Uuid),

    /// A persisted row carries an event type outside the stream's closed set
    #[error("Unknown {stream} event type: {value}")]
    InvalidEventKind { stream: &'static str, value: String },

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl DomainError {
    /// Stable code for logs
    pub fn code(&self) -> &'static str {
        match self {
            Self::TeamNotFound(_) => "UNKNOWN_TEAM",
            Self::InvalidEventKind { .. } => "INVALID_EVENT_KIND",
            Self::DatabaseError(_) => "DATABASE_ERROR",
        }
    }
}
