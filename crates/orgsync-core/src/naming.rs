//! Deterministic group identifiers and display titles.
//!
//! Group ids are derived from the immutable (organization id, function id)
//! pair and never change. Titles are derived from the *current* organization
//! and function titles, so a rename anywhere in the tree regenerates titles
//! on the next reconciliation pass while every id stays stable.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Separator between the organization id and the function id inside a group
/// id. The string form of a UUID never contains `_`, so the first `_` splits
/// the pair unambiguously even when function ids contain underscores.
pub const GROUP_ID_SEPARATOR: char = '_';

/// Separator between ancestor titles in a full hierarchical title.
pub const TITLE_SEPARATOR: &str = " - ";

/// Identifier of a platform user-group managed by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(String);

impl GroupId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split the id back into its (organization id, function id) pair.
    /// Returns `None` for ids not produced by [`group_id`].
    pub fn org_and_function(&self) -> Option<(Uuid, &str)> {
        let (org, function) = self.0.split_once(GROUP_ID_SEPARATOR)?;
        let org = Uuid::parse_str(org).ok()?;
        if function.is_empty() {
            return None;
        }
        Some((org, function))
    }
}

impl Display for GroupId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for GroupId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl From<&str> for GroupId {
    fn from(raw: &str) -> Self {
        Self(raw.to_owned())
    }
}

/// Derive the group id for an (organization, function) pair.
pub fn group_id(org_id: Uuid, function_id: &str) -> GroupId {
    GroupId(format!("{org_id}{GROUP_ID_SEPARATOR}{function_id}"))
}

/// Join an organization's ancestor titles (from just below the root down to
/// the organization itself, root excluded) into its full hierarchical title.
pub fn full_title(path_titles: &[String]) -> String {
    path_titles.join(TITLE_SEPARATOR)
}

/// Display title for a group: the organization's full hierarchical title
/// followed by the function title in parentheses.
pub fn group_title(path_titles: &[String], function_title: &str) -> String {
    format!("{} ({})", full_title(path_titles), function_title)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_id_is_deterministic() {
        let org = Uuid::new_v4();
        assert_eq!(group_id(org, "director"), group_id(org, "director"));
        assert_eq!(
            group_id(org, "director").as_str(),
            format!("{org}_director")
        );
    }

    #[test]
    fn group_id_round_trips() {
        let org = Uuid::new_v4();
        let id = group_id(org, "vice_director");
        // The function id itself contains the separator; the org side of
        // the split must still be the full UUID.
        assert_eq!(id.org_and_function(), Some((org, "vice_director")));
    }

    #[test]
    fn foreign_ids_do_not_split() {
        assert_eq!(GroupId::from("Administrators").org_and_function(), None);
        assert_eq!(GroupId::from("not-a-uuid_x").org_and_function(), None);
        let org = Uuid::new_v4();
        assert_eq!(GroupId::from(format!("{org}_")).org_and_function(), None);
    }

    #[test]
    fn titles_join_path_and_function() {
        let path = vec!["Department 1".to_owned(), "Service 1".to_owned()];
        assert_eq!(full_title(&path), "Department 1 - Service 1");
        assert_eq!(
            group_title(&path, "Director"),
            "Department 1 - Service 1 (Director)"
        );
        assert_eq!(
            group_title(&path[..1], "Worker"),
            "Department 1 (Worker)"
        );
    }
}
