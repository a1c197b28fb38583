//! # Database Crate
//!
//! This crate acts as a high-level, application-specific interface to the
//! PostgreSQL database. It is the system's "permanent archive" of Fibonacci
//! request history.
//!
//! ## Architectural Principles
//!
//! - **Layer 3 Adapter:** This crate is an adapter that encapsulates all
//!   database-specific logic. It provides a clean, abstract API to the rest of
//!   the application, hiding the underlying SQL and database implementation
//!   details.
//! - **Transactional Core:** The analytics recording path runs as a single
//!   transaction, so either the whole set of writes and reads lands or none
//!   of it does.
//! - **Asynchronous & Pooled:** All operations are asynchronous, and it uses a
//!   connection pool (`PgPool`) for high-performance, concurrent database
//!   access.
//!
//! ## Public API
//!
//! - `connect`: The async function to establish the database connection pool
//!   (returns `None` when no database is configured — degraded mode).
//! - `run_migrations`: A utility to apply database migrations, ensuring the
//!   schema is up-to-date.
//! - `DbRepository`: The main struct that holds the connection pool and
//!   provides all the high-level data access methods (e.g. `record_request`).
//! - `DbError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, run_migrations};
pub use error::DbError;
pub use repository::{
    DbRepository, NumberTimingStats, PopularNumber, UserRequestStats, UserStatsBundle,
};
