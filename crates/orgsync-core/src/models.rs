//! Domain models for orgsync.
//!
//! These are the core types shared across all crates.

pub mod function;
pub mod group;
pub mod organization;
pub mod settings;

pub use function::Function;
pub use group::Group;
pub use organization::{CreateOrganization, Organization, UpdateOrganization};
pub use settings::Settings;
