//! # Rentfolio Database Crate
//!
//! This crate acts as a high-level, application-specific interface to the
//! PostgreSQL database holding properties and their income and expense rows.
//!
//! ## Architectural Principles
//!
//! - **Layer 3 Adapter:** This crate is an adapter that encapsulates all database-specific
//!   logic. Callers program against the `PortfolioStore` trait and never see SQL.
//! - **Asynchronous & Pooled:** All operations are asynchronous, and it uses a
//!   connection pool (`PgPool`) for concurrent database access.
//!
//! ## Public API
//!
//! - `connect`: The async function to establish the database connection pool.
//! - `run_migrations`: A utility to apply database migrations, ensuring the schema is up-to-date.
//! - `PortfolioStore`: The data-access trait used by the reporter and the web server.
//! - `DbRepository`: The PostgreSQL implementation of `PortfolioStore`.
//! - `InMemoryStore`: An in-memory implementation, available with the `test-util` feature.
//! - `DbError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;
pub mod repository;
pub mod store;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, run_migrations};
pub use error::DbError;
#[cfg(any(test, feature = "test-util"))]
pub use memory::InMemoryStore;
pub use repository::DbRepository;
pub use store::PortfolioStore;
