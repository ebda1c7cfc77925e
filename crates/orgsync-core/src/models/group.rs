//! Group domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::naming::GroupId;

/// A platform user-group as the engine sees it: identifier and title.
/// Membership lives in the group store and is never carried on this type;
/// the engine only creates, renames and deletes groups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
