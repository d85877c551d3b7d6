//! # roster-db
//!
//! Database layer implementing the roster-core repository traits with
//! PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! - Connection pool management
//! - Runtime schema migrations for the outbox and mapping tables
//! - Database models with SQLx `FromRow` derives
//! - Model → entity mappers
//! - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use roster_core::{ExternalResource, RoleSyncKind};
//! use roster_db::{create_pool, run_migrations, DatabaseConfig, PgMappingRepository, PgOutboxRepository};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::default()).await?;
//!     run_migrations(&pool).await?;
//!
//!     let outbox = PgOutboxRepository::<RoleSyncKind>::new(pool.clone());
//!     let mappings = PgMappingRepository::new(pool, ExternalResource::Role);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod migrate;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use migrate::{run_migrations, run_migrations_from, MIGRATIONS_DIR};
pub use pool::{create_pool, DatabaseConfig, PgPool};
pub use repositories::{
    PgAgeRuleRepository, PgMappingRepository, PgMemberRepository, PgNotificationRepository,
    PgOutboxRepository, PgTeamRepository,
};
