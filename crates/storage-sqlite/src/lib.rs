//! SQLite storage implementation for Klypp.
//!
//! This crate provides all database-related functionality using Diesel ORM
//! with SQLite. It implements the repository traits defined in
//! `klypp-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - The single-writer actor all mutations are funneled through
//! - Repository implementations for all domain entities
//! - Database-specific model types (with Diesel derives)
//!
//! This is the only crate in the workspace with a Diesel dependency; the
//! core and server crates are database-agnostic and work with traits.

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod canceled_plans;
pub mod memberships;
pub mod notifications;
pub mod plans;
pub mod users;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, get_db_path, init, run_migrations, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from klypp-core for convenience
pub use klypp_core::errors::{DatabaseError, Error, Result};
