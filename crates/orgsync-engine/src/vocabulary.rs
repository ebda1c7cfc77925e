//! Selection lists derived from the directory and the configuration.
//!
//! Every builder degrades a broken root invariant (no root, several roots)
//! to a single explanatory placeholder term instead of failing or returning
//! an empty list: the host UI always has something to render in a selection
//! widget.

use orgsync_core::error::{OrgsyncError, OrgsyncResult};
use orgsync_core::models::settings::Settings;
use orgsync_core::naming::{full_title, group_id, group_title};
use orgsync_core::store::OrganizationDirectory;
use uuid::Uuid;

pub const NO_ROOT_MESSAGE: &str = "You must define a root organization!";
pub const MULTIPLE_ROOTS_MESSAGE: &str = "You must have only one root organization!";

/// Token of the synthetic term produced when the root invariant is broken.
pub const PLACEHOLDER_TOKEN: &str = "__error__";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabularyTerm {
    /// Stable value stored by the host (organization id or group id).
    pub token: String,
    pub title: String,
}

/// An ordered selection list. `terms` is what a widget renders; `hidden`
/// terms are not listed but still resolve, so values stored before a
/// configuration change keep rendering.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    terms: Vec<VocabularyTerm>,
    hidden: Vec<VocabularyTerm>,
}

impl Vocabulary {
    fn from_terms(terms: Vec<VocabularyTerm>) -> Self {
        Self {
            terms,
            hidden: Vec::new(),
        }
    }

    fn placeholder(message: &str) -> Self {
        Self::from_terms(vec![VocabularyTerm {
            token: PLACEHOLDER_TOKEN.to_owned(),
            title: message.to_owned(),
        }])
    }

    pub fn terms(&self) -> &[VocabularyTerm] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &VocabularyTerm> {
        self.terms.iter()
    }

    pub fn titles(&self) -> Vec<&str> {
        self.terms.iter().map(|t| t.title.as_str()).collect()
    }

    /// Resolve a stored token, falling back to hidden terms.
    pub fn resolve(&self, token: &str) -> Option<&VocabularyTerm> {
        self.terms
            .iter()
            .chain(self.hidden.iter())
            .find(|t| t.token == token)
    }
}

enum RootLookup {
    Root(Uuid),
    Degraded(Vocabulary),
}

async fn lookup_root<D: OrganizationDirectory>(directory: &D) -> OrgsyncResult<RootLookup> {
    match directory.root_organization().await {
        Ok(root) => Ok(RootLookup::Root(root)),
        Err(OrgsyncError::NoRootOrganization) => {
            Ok(RootLookup::Degraded(Vocabulary::placeholder(NO_ROOT_MESSAGE)))
        }
        Err(OrgsyncError::MultipleRootOrganizations) => Ok(RootLookup::Degraded(
            Vocabulary::placeholder(MULTIPLE_ROOTS_MESSAGE),
        )),
        Err(e) => Err(e),
    }
}

async fn term_for<D: OrganizationDirectory>(
    directory: &D,
    org: Uuid,
) -> OrgsyncResult<VocabularyTerm> {
    let path = directory.ancestor_path_titles(org).await?;
    Ok(VocabularyTerm {
        token: org.to_string(),
        title: full_title(&path),
    })
}

/// Every active organization below the root, depth-first, with full
/// hierarchical titles.
pub async fn organization_services<D: OrganizationDirectory>(
    directory: &D,
) -> OrgsyncResult<Vocabulary> {
    let root = match lookup_root(directory).await? {
        RootLookup::Root(root) => root,
        RootLookup::Degraded(vocabulary) => return Ok(vocabulary),
    };
    let mut terms = Vec::new();
    for org in directory.descendants(root).await? {
        if !org.active {
            continue;
        }
        terms.push(term_for(directory, org.id).await?);
    }
    Ok(Vocabulary::from_terms(terms))
}

/// The configured subset in configured order, active organizations only.
pub async fn selected_organizations<D: OrganizationDirectory>(
    settings: &Settings,
    directory: &D,
) -> OrgsyncResult<Vocabulary> {
    if let RootLookup::Degraded(vocabulary) = lookup_root(directory).await? {
        return Ok(vocabulary);
    }
    let mut terms = Vec::new();
    for &org in &settings.organizations {
        if !directory.is_active(org).await? {
            continue;
        }
        terms.push(term_for(directory, org).await?);
    }
    Ok(Vocabulary::from_terms(terms))
}

/// The configured subset in configured order; every other active service is
/// carried as a hidden term so previously stored selections still resolve.
pub async fn selected_organization_services<D: OrganizationDirectory>(
    settings: &Settings,
    directory: &D,
) -> OrgsyncResult<Vocabulary> {
    let root = match lookup_root(directory).await? {
        RootLookup::Root(root) => root,
        RootLookup::Degraded(vocabulary) => return Ok(vocabulary),
    };
    let mut terms = Vec::new();
    for &org in &settings.organizations {
        if !directory.is_active(org).await? {
            continue;
        }
        terms.push(term_for(directory, org).await?);
    }
    let mut hidden = Vec::new();
    for org in directory.descendants(root).await? {
        if !org.active || settings.organizations.contains(&org.id) {
            continue;
        }
        hidden.push(term_for(directory, org.id).await?);
    }
    Ok(Vocabulary { terms, hidden })
}

/// One term per desired (organization, function) pair, token = group id.
/// `functions` optionally restricts to a subset of function ids;
/// `with_group_title` switches between the group title and the bare
/// organization title. Selected organizations are active by construction
/// (deactivation is guarded), so no activity filter is applied here.
pub async fn selected_organization_groups<D: OrganizationDirectory>(
    settings: &Settings,
    directory: &D,
    functions: Option<&[&str]>,
    with_group_title: bool,
) -> OrgsyncResult<Vocabulary> {
    let mut terms = Vec::new();
    for &org in &settings.organizations {
        let path = directory.ancestor_path_titles(org).await?;
        for function in &settings.functions {
            if !function.applies_to(org) {
                continue;
            }
            if let Some(wanted) = functions {
                if !wanted.contains(&function.id.as_str()) {
                    continue;
                }
            }
            terms.push(VocabularyTerm {
                token: group_id(org, &function.id).to_string(),
                title: if with_group_title {
                    group_title(&path, &function.title)
                } else {
                    full_title(&path)
                },
            });
        }
    }
    Ok(Vocabulary::from_terms(terms))
}
