//! SurrealDB implementation of [`GroupStore`].
//!
//! The `platform_group` table holds only engine-managed groups, so
//! `list()` never reports groups the platform owns for other purposes.
//! Mutations follow the idempotency contract of the trait: create on an
//! existing id, rename on an absent id and delete on an absent id are all
//! successful no-ops.

use chrono::{DateTime, Utc};
use orgsync_core::error::{OrgsyncError, OrgsyncResult};
use orgsync_core::models::group::Group;
use orgsync_core::naming::GroupId;
use orgsync_core::store::GroupStore;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;

use crate::error::DbError;

/// DB-side row struct for queries where the group id is already known.
#[derive(Debug, SurrealValue)]
struct GroupRow {
    title: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct GroupRowWithId {
    record_id: String,
    title: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl GroupRowWithId {
    fn into_group(self) -> Group {
        Group {
            id: GroupId::from(self.record_id),
            title: self.title,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Row struct for membership queries.
#[derive(Debug, SurrealValue)]
struct MemberRow {
    user_id: String,
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the group store.
#[derive(Clone)]
pub struct SurrealGroupStore<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealGroupStore<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn fetch(&self, id: &GroupId) -> OrgsyncResult<Option<GroupRow>> {
        let mut result = self
            .db
            .query("SELECT * FROM type::record('platform_group', $id)")
            .bind(("id", id.as_str().to_owned()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<GroupRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.into_iter().next())
    }
}

impl<C: Connection> GroupStore for SurrealGroupStore<C> {
    async fn exists(&self, id: &GroupId) -> OrgsyncResult<bool> {
        Ok(self.fetch(id).await?.is_some())
    }

    async fn members(&self, id: &GroupId) -> OrgsyncResult<Vec<String>> {
        let mut result = self
            .db
            .query(
                "SELECT user_id FROM group_member \
                 WHERE group_id = $group_id \
                 ORDER BY user_id ASC",
            )
            .bind(("group_id", id.as_str().to_owned()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<MemberRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.into_iter().map(|r| r.user_id).collect())
    }

    async fn list(&self) -> OrgsyncResult<Vec<Group>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM platform_group \
                 ORDER BY created_at ASC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<GroupRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(rows.into_iter().map(GroupRowWithId::into_group).collect())
    }

    async fn create(&self, id: &GroupId, title: &str) -> OrgsyncResult<()> {
        if self.fetch(id).await?.is_some() {
            return Ok(());
        }

        self.db
            .query("CREATE type::record('platform_group', $id) SET title = $title")
            .bind(("id", id.as_str().to_owned()))
            .bind(("title", title.to_owned()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| OrgsyncError::Database(e.to_string()))?;

        Ok(())
    }

    async fn rename(&self, id: &GroupId, title: &str) -> OrgsyncResult<()> {
        if self.fetch(id).await?.is_none() {
            return Ok(());
        }

        self.db
            .query(
                "UPDATE type::record('platform_group', $id) SET \
                 title = $title, updated_at = time::now()",
            )
            .bind(("id", id.as_str().to_owned()))
            .bind(("title", title.to_owned()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| OrgsyncError::Database(e.to_string()))?;

        Ok(())
    }

    async fn delete(&self, id: &GroupId) -> OrgsyncResult<()> {
        // Drop membership rows first, then the group record itself.
        self.db
            .query(
                "DELETE group_member WHERE group_id = $id; \
                 DELETE type::record('platform_group', $id);",
            )
            .bind(("id", id.as_str().to_owned()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn add_member(&self, id: &GroupId, user_id: &str) -> OrgsyncResult<()> {
        if self.fetch(id).await?.is_none() {
            return Err(DbError::NotFound {
                entity: "platform_group".into(),
                id: id.as_str().to_owned(),
            }
            .into());
        }

        // Skip if already a member (the unique index would reject it).
        let mut check = self
            .db
            .query(
                "SELECT count() AS total FROM group_member \
                 WHERE group_id = $group_id AND user_id = $user_id GROUP ALL",
            )
            .bind(("group_id", id.as_str().to_owned()))
            .bind(("user_id", user_id.to_owned()))
            .await
            .map_err(DbError::from)?;
        let counts: Vec<CountRow> = check.take(0).map_err(DbError::from)?;
        if counts.first().map(|r| r.total).unwrap_or(0) > 0 {
            return Ok(());
        }

        self.db
            .query("CREATE group_member SET group_id = $group_id, user_id = $user_id")
            .bind(("group_id", id.as_str().to_owned()))
            .bind(("user_id", user_id.to_owned()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| OrgsyncError::Database(e.to_string()))?;

        Ok(())
    }

    async fn remove_member(&self, id: &GroupId, user_id: &str) -> OrgsyncResult<()> {
        self.db
            .query(
                "DELETE group_member WHERE \
                 group_id = $group_id AND user_id = $user_id",
            )
            .bind(("group_id", id.as_str().to_owned()))
            .bind(("user_id", user_id.to_owned()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }
}
