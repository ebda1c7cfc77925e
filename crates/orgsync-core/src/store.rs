//! Trait seams between the engine and the host platform.
//!
//! All operations are async and return [`OrgsyncResult`]. The engine only
//! ever calls these traits; it holds no organization or group data of its
//! own. Mutations go exclusively through [`GroupStore`], which is a channel
//! distinct from the configuration-change events the host feeds the engine,
//! so a reconciliation pass cannot re-trigger itself.

use uuid::Uuid;

use crate::error::OrgsyncResult;
use crate::models::group::Group;
use crate::models::organization::Organization;
use crate::naming::GroupId;

/// Read-only view of the host's organization content tree.
pub trait OrganizationDirectory: Send + Sync {
    /// The single designated root of the configured tree.
    ///
    /// Errs with [`OrgsyncError::NoRootOrganization`] or
    /// [`OrgsyncError::MultipleRootOrganizations`] when the invariant does
    /// not hold; callers building vocabularies degrade those to a
    /// placeholder entry instead of failing.
    ///
    /// [`OrgsyncError::NoRootOrganization`]: crate::error::OrgsyncError::NoRootOrganization
    /// [`OrgsyncError::MultipleRootOrganizations`]: crate::error::OrgsyncError::MultipleRootOrganizations
    fn root_organization(&self) -> impl Future<Output = OrgsyncResult<Uuid>> + Send;

    fn get(&self, id: Uuid) -> impl Future<Output = OrgsyncResult<Organization>> + Send;

    fn title(&self, id: Uuid) -> impl Future<Output = OrgsyncResult<String>> + Send;

    fn is_active(&self, id: Uuid) -> impl Future<Output = OrgsyncResult<bool>> + Send;

    /// Titles from just below the root down to the organization itself,
    /// root excluded. Reflects current titles and the current tree shape.
    fn ancestor_path_titles(&self, id: Uuid)
    -> impl Future<Output = OrgsyncResult<Vec<String>>> + Send;

    /// All organizations below `root`, depth-first, siblings in creation
    /// order. Drives the services vocabulary.
    fn descendants(&self, root: Uuid)
    -> impl Future<Output = OrgsyncResult<Vec<Organization>>> + Send;

    /// Whether the organization sits inside the configured tree (is the
    /// root or one of its descendants). Explicit computed tag; hosts that
    /// need to badge content derive it from here.
    fn in_configured_tree(&self, id: Uuid) -> impl Future<Output = OrgsyncResult<bool>> + Send;
}

/// The host platform's user-group storage.
///
/// All three mutations are idempotent: creating an existing group, renaming
/// an absent group and deleting an absent group are successful no-ops. This
/// makes a whole reconciliation batch safe to retry after a partial failure.
pub trait GroupStore: Send + Sync {
    fn exists(&self, id: &GroupId) -> impl Future<Output = OrgsyncResult<bool>> + Send;

    /// Member user ids of a group; an absent group has no members.
    fn members(&self, id: &GroupId) -> impl Future<Output = OrgsyncResult<Vec<String>>> + Send;

    /// Every engine-managed group, in creation order. Groups the platform
    /// owns for other purposes are never reported here.
    fn list(&self) -> impl Future<Output = OrgsyncResult<Vec<Group>>> + Send;

    /// Create a group. No-op if the id already exists (the stored title is
    /// left untouched; converging titles is the renamer's job).
    fn create(&self, id: &GroupId, title: &str) -> impl Future<Output = OrgsyncResult<()>> + Send;

    /// Retitle a group. No-op if the id does not exist.
    fn rename(&self, id: &GroupId, title: &str) -> impl Future<Output = OrgsyncResult<()>> + Send;

    /// Delete a group and its membership. No-op if the id does not exist.
    fn delete(&self, id: &GroupId) -> impl Future<Output = OrgsyncResult<()>> + Send;

    /// Add a user to an existing group. No-op if already a member.
    fn add_member(
        &self,
        id: &GroupId,
        user_id: &str,
    ) -> impl Future<Output = OrgsyncResult<()>> + Send;

    /// Remove a user from a group. No-op if not a member.
    fn remove_member(
        &self,
        id: &GroupId,
        user_id: &str,
    ) -> impl Future<Output = OrgsyncResult<()>> + Send;
}

/// A content object that still references an organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRef {
    pub url: String,
    pub title: String,
}

/// Host-side search over content fields for references to an organization
/// id. Consumed by the deactivation guard; the search itself (catalog,
/// index, full scan) is entirely the host's concern.
pub trait ReferenceIndex: Send + Sync {
    fn references_to(&self, org_id: Uuid)
    -> impl Future<Output = OrgsyncResult<Vec<ContentRef>>> + Send;
}
