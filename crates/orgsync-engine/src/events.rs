//! Host-facing change-trigger channel and content guards.
//!
//! The host detects edits to the configuration or the organization tree and
//! invokes the engine with explicit old/new state; the engine holds nothing
//! between calls.

use orgsync_core::models::settings::Settings;
use orgsync_core::store::{GroupStore, OrganizationDirectory, ReferenceIndex};
use uuid::Uuid;

use crate::error::{DeactivationBlocked, RemovalBlocked, SyncError};
use crate::reconciler::{SyncReport, SyncService};

/// A change observed by the host that the engine must react to.
#[derive(Debug, Clone)]
pub enum ChangeEvent {
    /// The selected-organizations list or the function list was edited.
    SettingsChanged { proposed: Settings },
    /// An organization's title changed.
    OrganizationModified { org: Uuid },
    /// An organization was moved to a new parent.
    OrganizationMoved { org: Uuid },
}

impl<S: GroupStore, D: OrganizationDirectory> SyncService<S, D> {
    /// Dispatch a change event. Settings edits validate-then-apply;
    /// title and tree changes regenerate titles against the unchanged
    /// configuration. A rejection leaves configuration and groups alone —
    /// the caller keeps `current` committed.
    pub async fn handle_event(
        &self,
        current: &Settings,
        event: &ChangeEvent,
    ) -> Result<SyncReport, SyncError> {
        match event {
            ChangeEvent::SettingsChanged { proposed } => self.reconcile(current, proposed).await,
            ChangeEvent::OrganizationModified { .. } | ChangeEvent::OrganizationMoved { .. } => {
                self.refresh_titles(current).await
            }
        }
    }
}

/// Guard for deactivating an organization: blocked while it is still
/// selected in the configuration, or while content still references it.
pub async fn organization_deactivating<R: ReferenceIndex>(
    org: Uuid,
    settings: &Settings,
    index: &R,
) -> Result<(), SyncError> {
    if settings.organizations.contains(&org) {
        return Err(DeactivationBlocked::SelectedInConfiguration { org_id: org }.into());
    }
    let references = index.references_to(org).await?;
    if !references.is_empty() {
        return Err(DeactivationBlocked::StillReferenced {
            org_id: org,
            references,
        }
        .into());
    }
    Ok(())
}

/// Guard for removing an organization from the tree: blocked while it is
/// still selected. This is a verdict only — the host's deletion pathway is
/// responsible for actually honoring it.
pub fn organization_removing(org: Uuid, settings: &Settings) -> Result<(), SyncError> {
    if settings.organizations.contains(&org) {
        return Err(RemovalBlocked { org_id: org }.into());
    }
    Ok(())
}
