//! Tenantkit Shared Types and Storage
//!
//! This crate contains the tenant data model, the storage abstraction with its
//! PostgreSQL and in-memory backends, and development seeding.

pub mod db;
pub mod error;
pub mod seed;
pub mod store;
pub mod types;

pub use db::*;
pub use error::*;
pub use seed::{clear_test_data, seed_test_data, SeedOutcome};
pub use store::{MemoryStore, PgStore, TenantStore};
pub use types::*;
