//! Function domain model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A role suffix (e.g. "director") that combines with each selected
/// organization to define one group per applicable pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Function {
    /// Identifier, unique within a [`Settings`] value. Immutable once
    /// groups exist for it (group ids embed it).
    ///
    /// [`Settings`]: crate::models::Settings
    pub id: String,
    /// Display label, mutable at any time.
    pub title: String,
    /// Restriction list: the function only applies to these organizations.
    /// Empty means it applies to every selected organization.
    #[serde(default)]
    pub orgs: Vec<Uuid>,
}

impl Function {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            orgs: Vec::new(),
        }
    }

    /// Restrict the function to the given organizations.
    #[must_use]
    pub fn restricted_to(mut self, orgs: Vec<Uuid>) -> Self {
        self.orgs = orgs;
        self
    }

    /// Whether this function applies to the given organization.
    pub fn applies_to(&self, org_id: Uuid) -> bool {
        self.orgs.is_empty() || self.orgs.contains(&org_id)
    }
}
