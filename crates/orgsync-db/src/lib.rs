//! orgsync database — SurrealDB connection management, schema migrations
//! and implementations of the core trait seams.
//!
//! This crate provides:
//! - Connection management ([`DbManager`], [`DbConfig`])
//! - Schema initialization and migrations ([`run_migrations`])
//! - Error types ([`DbError`])
//! - [`SurrealGroupStore`] and [`SurrealOrganizationDirectory`], the
//!   backing implementations of the `orgsync-core` store traits

mod connection;
mod error;
mod schema;
pub mod store;

pub use connection::{DbConfig, DbManager};
pub use error::DbError;
pub use schema::{run_migrations, schema_v1};
pub use store::{SurrealGroupStore, SurrealOrganizationDirectory};
