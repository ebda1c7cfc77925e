//! Integrity checks run before a configuration change is accepted.
//!
//! Both checks compare the proposed configuration against the current one
//! and current group membership, before anything is mutated. A non-empty
//! result rejects the whole change; the reconciler applies nothing.

use orgsync_core::error::OrgsyncResult;
use orgsync_core::models::settings::Settings;
use orgsync_core::naming::{GroupId, group_id};
use orgsync_core::store::GroupStore;
use uuid::Uuid;

use crate::error::ValidationError;

/// Validate a proposed configuration against the committed one.
///
/// Side-effect-free: only `exists`/`members` store queries are issued.
/// Returns one error per offending function, naming the first non-empty
/// group found in configured-organization order.
pub async fn validate<S: GroupStore>(
    current: &Settings,
    proposed: &Settings,
    store: &S,
) -> OrgsyncResult<Vec<ValidationError>> {
    let mut errors = Vec::new();

    // Function removal: every group that exists for the removed function
    // must be empty, across all currently selected organizations.
    for function in &current.functions {
        if proposed.function(&function.id).is_some() {
            continue;
        }
        if let Some(group_id) = first_populated_group(current, &function.id, None, store).await? {
            errors.push(ValidationError::FunctionRemovalBlocked {
                function_id: function.id.clone(),
                group_id,
            });
        }
    }

    // Restriction narrowing: organizations the function applied to before
    // but no longer applies to must have empty (or absent) groups.
    // Organizations dropped from the selected list are not blocked here;
    // their groups are ordinary deletion candidates for the differ.
    for function in &current.functions {
        let Some(proposed_function) = proposed.function(&function.id) else {
            continue;
        };
        let dropped =
            |org: Uuid| function.applies_to(org) && !proposed_function.applies_to(org);
        if let Some(group_id) =
            first_populated_group(current, &function.id, Some(&dropped), store).await?
        {
            errors.push(ValidationError::FunctionRestrictionBlocked {
                function_id: function.id.clone(),
                group_id,
            });
        }
    }

    Ok(errors)
}

/// First group for `function_id` over the current organizations (optionally
/// filtered) that exists and still has members.
async fn first_populated_group<S: GroupStore>(
    current: &Settings,
    function_id: &str,
    filter: Option<&dyn Fn(Uuid) -> bool>,
    store: &S,
) -> OrgsyncResult<Option<GroupId>> {
    for &org in &current.organizations {
        if let Some(filter) = filter {
            if !filter(org) {
                continue;
            }
        }
        let id = group_id(org, function_id);
        if store.exists(&id).await? && !store.members(&id).await?.is_empty() {
            return Ok(Some(id));
        }
    }
    Ok(None)
}
