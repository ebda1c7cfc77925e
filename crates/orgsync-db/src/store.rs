//! SurrealDB implementations of the core trait seams.

mod group;
mod organization;

pub use group::SurrealGroupStore;
pub use organization::SurrealOrganizationDirectory;
