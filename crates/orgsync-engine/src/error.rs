//! Engine error types.

use std::fmt::{Display, Formatter};

use orgsync_core::error::OrgsyncError;
use orgsync_core::naming::GroupId;
use orgsync_core::store::ContentRef;
use thiserror::Error;
use uuid::Uuid;

/// A rejected configuration change. Recoverable by the user: the message
/// names the offending function and group so the administrator can empty
/// the group (or revert the edit) and try again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("cannot remove function '{function_id}': group '{group_id}' still has members")]
    FunctionRemovalBlocked {
        function_id: String,
        group_id: GroupId,
    },

    #[error(
        "cannot restrict function '{function_id}' to selected organizations: \
         group '{group_id}' still has members"
    )]
    FunctionRestrictionBlocked {
        function_id: String,
        group_id: GroupId,
    },
}

/// Group-store mutation kinds, for failure reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupOperation {
    Create,
    Rename,
    Delete,
}

impl Display for GroupOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupOperation::Create => f.write_str("create"),
            GroupOperation::Rename => f.write_str("rename"),
            GroupOperation::Delete => f.write_str("delete"),
        }
    }
}

/// A group-store operation that failed during apply. The batch is not
/// rolled back; every operation is idempotent, so fixing the cause and
/// re-running the whole pass is the recovery path.
#[derive(Debug, Clone)]
pub struct OperationFailure {
    pub group_id: GroupId,
    pub operation: GroupOperation,
    pub cause: String,
}

impl Display for OperationFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "group store {} failed for '{}': {}",
            self.operation, self.group_id, self.cause
        )
    }
}

/// Verdict blocking an organization deactivation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeactivationBlocked {
    #[error("organization '{org_id}' is selected in the configuration")]
    SelectedInConfiguration { org_id: Uuid },

    #[error("organization '{org_id}' is referenced by {} content item(s)", .references.len())]
    StillReferenced {
        org_id: Uuid,
        references: Vec<ContentRef>,
    },
}

/// Verdict blocking the removal of an organization that is still selected.
/// The engine only renders the verdict; enforcing it on the host's deletion
/// pathway is the host's job.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("organization '{org_id}' is selected in the configuration")]
pub struct RemovalBlocked {
    pub org_id: Uuid,
}

#[derive(Debug, Error)]
pub enum SyncError {
    /// The proposed configuration failed validation; nothing was applied.
    #[error("configuration change rejected with {} validation error(s)", .0.len())]
    Rejected(Vec<ValidationError>),

    #[error(transparent)]
    DeactivationBlocked(#[from] DeactivationBlocked),

    #[error(transparent)]
    RemovalBlocked(#[from] RemovalBlocked),

    #[error(transparent)]
    Core(#[from] OrgsyncError),
}

impl SyncError {
    /// The validation errors carried by a [`SyncError::Rejected`], if any.
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            SyncError::Rejected(errors) => errors,
            _ => &[],
        }
    }
}
