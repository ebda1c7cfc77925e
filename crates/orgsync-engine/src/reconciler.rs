//! Reconciliation orchestration.
//!
//! One pass validates the proposed configuration, recomputes the desired
//! group set, diffs it against the store and applies deletes, renames and
//! creates in that order. The pass is a single sequential task; each store
//! call completes before the next one is issued, and the store mutation
//! channel is separate from the configuration-change events, so a pass
//! never re-triggers itself.

use orgsync_core::error::{OrgsyncError, OrgsyncResult};
use orgsync_core::models::settings::Settings;
use orgsync_core::naming::GroupId;
use orgsync_core::store::{GroupStore, OrganizationDirectory};
use tracing::{info, warn};

use crate::differ;
use crate::error::{GroupOperation, OperationFailure, SyncError, ValidationError};
use crate::validator;

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    pub created: usize,
    pub renamed: usize,
    pub deleted: usize,
    /// Desired groups that already existed with the right title.
    pub unchanged: usize,
    /// Store operations that failed; the rest of the batch was still
    /// applied. Re-running the pass retries exactly these.
    pub failures: Vec<OperationFailure>,
}

impl SyncReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Whether the pass found nothing to do.
    pub fn is_noop(&self) -> bool {
        self.created == 0 && self.renamed == 0 && self.deleted == 0 && self.failures.is_empty()
    }

    fn record_failure(
        &mut self,
        group_id: GroupId,
        operation: GroupOperation,
        error: OrgsyncError,
    ) {
        warn!(group = %group_id, %operation, error = %error, "group store operation failed");
        self.failures.push(OperationFailure {
            group_id,
            operation,
            cause: error.to_string(),
        });
    }
}

/// Reconciliation service, generic over the injected store and directory so
/// the engine has no dependency on any particular backend.
pub struct SyncService<S: GroupStore, D: OrganizationDirectory> {
    store: S,
    directory: D,
}

impl<S: GroupStore, D: OrganizationDirectory> SyncService<S, D> {
    pub fn new(store: S, directory: D) -> Self {
        Self { store, directory }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    /// Pre-commit validation query for host UIs: the errors the proposed
    /// configuration would be rejected with, without applying anything.
    pub async fn validate(
        &self,
        current: &Settings,
        proposed: &Settings,
    ) -> OrgsyncResult<Vec<ValidationError>> {
        validator::validate(current, proposed, &self.store).await
    }

    /// Validate and apply a configuration change.
    ///
    /// On validation failure the change is rejected as a whole: the prior
    /// configuration stays committed and no group is touched. On success
    /// the diff is applied delete-first so the store holds the minimal
    /// group set at any instant.
    pub async fn reconcile(
        &self,
        current: &Settings,
        proposed: &Settings,
    ) -> Result<SyncReport, SyncError> {
        let errors = validator::validate(current, proposed, &self.store).await?;
        if !errors.is_empty() {
            warn!(errors = errors.len(), "configuration change rejected");
            return Err(SyncError::Rejected(errors));
        }

        let desired = differ::desired_groups(proposed, &self.directory).await?;
        let existing = self.store.list().await?;
        let diff = differ::diff(&desired, &existing);

        let mut report = SyncReport {
            unchanged: desired.len() - diff.to_create.len() - diff.to_rename.len(),
            ..SyncReport::default()
        };

        for id in &diff.to_delete {
            match self.store.delete(id).await {
                Ok(()) => {
                    info!(group = %id, "deleted group");
                    report.deleted += 1;
                }
                Err(e) => report.record_failure(id.clone(), GroupOperation::Delete, e),
            }
        }
        for spec in &diff.to_rename {
            match self.store.rename(&spec.id, &spec.title).await {
                Ok(()) => {
                    info!(group = %spec.id, title = %spec.title, "renamed group");
                    report.renamed += 1;
                }
                Err(e) => report.record_failure(spec.id.clone(), GroupOperation::Rename, e),
            }
        }
        for spec in &diff.to_create {
            match self.store.create(&spec.id, &spec.title).await {
                Ok(()) => {
                    info!(group = %spec.id, title = %spec.title, "created group");
                    report.created += 1;
                }
                Err(e) => report.record_failure(spec.id.clone(), GroupOperation::Create, e),
            }
        }

        Ok(report)
    }

    /// Regenerate every group title from the directory's current state,
    /// e.g. after an organization was retitled or moved. Group ids are
    /// derived from immutable ids and never change.
    pub async fn refresh_titles(&self, settings: &Settings) -> Result<SyncReport, SyncError> {
        self.reconcile(settings, settings).await
    }
}
