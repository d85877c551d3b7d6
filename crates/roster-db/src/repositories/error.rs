//! Error handling utilities for repositories

use roster_core::error::DomainError;
use sqlx::Error as SqlxError;
use uuid::Uuid;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Create a "team not found" error
pub fn team_not_found(id: Uuid) -> DomainError {
    DomainError::TeamNotFound(id)
}
