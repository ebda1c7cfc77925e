//! Desired group set and the create/rename/delete diff.

use std::collections::{HashMap, HashSet};

use orgsync_core::error::OrgsyncResult;
use orgsync_core::models::group::Group;
use orgsync_core::models::settings::Settings;
use orgsync_core::naming::{GroupId, group_id, group_title};
use orgsync_core::store::OrganizationDirectory;

/// A group the configuration wants to exist, with its current desired title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSpec {
    pub id: GroupId,
    pub title: String,
}

/// Disjoint operation lists produced by [`diff`]. Order within each list is
/// deterministic, so repeated runs over unchanged input yield identical
/// sequences.
#[derive(Debug, Clone, Default)]
pub struct GroupDiff {
    /// Groups to create, in desired-set order.
    pub to_create: Vec<GroupSpec>,
    /// Existing groups whose stored title differs from the desired one,
    /// in desired-set order.
    pub to_rename: Vec<GroupSpec>,
    /// Existing groups absent from the desired set, in store order.
    pub to_delete: Vec<GroupId>,
}

impl GroupDiff {
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_rename.is_empty() && self.to_delete.is_empty()
    }
}

/// Recompute the desired group set from scratch: one group per selected
/// organization and applicable function, organization-major (configured
/// organization order outer, configured function order inner). Titles are
/// derived from the directory's *current* path titles.
pub async fn desired_groups<D: OrganizationDirectory>(
    settings: &Settings,
    directory: &D,
) -> OrgsyncResult<Vec<GroupSpec>> {
    let mut specs = Vec::new();
    for &org in &settings.organizations {
        let path_titles = directory.ancestor_path_titles(org).await?;
        for function in &settings.functions {
            if !function.applies_to(org) {
                continue;
            }
            specs.push(GroupSpec {
                id: group_id(org, &function.id),
                title: group_title(&path_titles, &function.title),
            });
        }
    }
    Ok(specs)
}

/// Pure three-way diff of the desired set against the stored set. A group
/// present on both sides with an identical title yields no operation.
pub fn diff(desired: &[GroupSpec], existing: &[Group]) -> GroupDiff {
    let stored_titles: HashMap<&GroupId, &str> = existing
        .iter()
        .map(|g| (&g.id, g.title.as_str()))
        .collect();
    let desired_ids: HashSet<&GroupId> = desired.iter().map(|s| &s.id).collect();

    let mut out = GroupDiff::default();
    for spec in desired {
        match stored_titles.get(&spec.id) {
            None => out.to_create.push(spec.clone()),
            Some(&stored) if stored != spec.title => out.to_rename.push(spec.clone()),
            Some(_) => {}
        }
    }
    for group in existing {
        if !desired_ids.contains(&group.id) {
            out.to_delete.push(group.id.clone());
        }
    }
    out
}
