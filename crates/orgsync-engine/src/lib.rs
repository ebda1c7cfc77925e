//! orgsync engine — the configuration-change reconciliation core.
//!
//! Whenever the selected-organizations list or the function list changes,
//! the engine recomputes the desired group set, validates that no
//! destructive change would discard membership data, computes the minimal
//! create/rename/delete diff and applies it through the injected
//! [`GroupStore`].
//!
//! [`GroupStore`]: orgsync_core::store::GroupStore

pub mod differ;
pub mod error;
pub mod events;
pub mod reconciler;
pub mod validator;
pub mod vocabulary;

pub use differ::{GroupDiff, GroupSpec};
pub use error::{OperationFailure, SyncError, ValidationError};
pub use events::ChangeEvent;
pub use reconciler::{SyncReport, SyncService};
pub use vocabulary::{Vocabulary, VocabularyTerm};
