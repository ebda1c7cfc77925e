//! Engine configuration: the selected organizations and the function list.
//!
//! A `Settings` value is an explicit, self-contained snapshot. The host
//! detects edits and hands the engine the old and the new snapshot; the
//! engine itself holds no configuration state.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::function::Function;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Ordered list of selected organization ids. Order defines vocabulary
    /// and reconciliation-operation ordering.
    pub organizations: Vec<Uuid>,
    /// Ordered function list. Order is significant for display only.
    pub functions: Vec<Function>,
}

impl Settings {
    pub fn new(organizations: Vec<Uuid>, functions: Vec<Function>) -> Self {
        Self {
            organizations,
            functions,
        }
    }

    /// Look up a function by id.
    pub fn function(&self, id: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.id == id)
    }

    pub fn function_ids(&self) -> impl Iterator<Item = &str> {
        self.functions.iter().map(|f| f.id.as_str())
    }
}
