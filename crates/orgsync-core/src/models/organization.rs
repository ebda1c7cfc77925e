//! Organization domain model.
//!
//! Organizations form a tree rooted at a single designated root. The engine
//! never creates or mutates organizations; the host platform owns them and
//! the engine observes them through the [`OrganizationDirectory`] trait.
//!
//! [`OrganizationDirectory`]: crate::store::OrganizationDirectory

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A node in the organization hierarchy (a department or service).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub id: Uuid,
    /// Display title, mutable at any time.
    pub title: String,
    /// Parent organization; `None` for top-level nodes.
    pub parent_id: Option<Uuid>,
    /// Marks the single designated root of the configured tree.
    pub is_root: bool,
    /// Inactive organizations are excluded from selection vocabularies
    /// but may still own groups.
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a new organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrganization {
    pub title: String,
    pub parent_id: Option<Uuid>,
    pub is_root: bool,
}

/// Fields that can be updated on an existing organization.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateOrganization {
    pub title: Option<String>,
    pub active: Option<bool>,
}
