//! orgsync core — shared domain models, error types, naming rules and the
//! trait seams (group store, organization directory, reference index) that
//! the engine and storage crates plug into.

pub mod error;
pub mod models;
pub mod naming;
pub mod store;

pub use error::{OrgsyncError, OrgsyncResult};
pub use naming::{GroupId, full_title, group_id, group_title};
