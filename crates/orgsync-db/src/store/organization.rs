//! SurrealDB implementation of [`OrganizationDirectory`].
//!
//! The directory trait itself is read-only; the inherent `create`/`update`/
//! `move_to` helpers exist because something has to own the organization
//! content in a deployment backed by this crate (and in tests).

use chrono::{DateTime, Utc};
use orgsync_core::error::{OrgsyncError, OrgsyncResult};
use orgsync_core::models::organization::{CreateOrganization, Organization, UpdateOrganization};
use orgsync_core::store::OrganizationDirectory;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// Parent-chain walks refuse to go deeper than this; a longer chain means
/// the stored hierarchy is corrupt (cycle or runaway nesting).
const MAX_TREE_DEPTH: usize = 64;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct OrganizationRow {
    title: String,
    parent_id: Option<String>,
    is_root: bool,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct OrganizationRowWithId {
    record_id: String,
    title: String,
    parent_id: Option<String>,
    is_root: bool,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_uuid(raw: &str, what: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(raw).map_err(|e| DbError::Schema(format!("invalid {what} UUID: {e}")))
}

impl OrganizationRowWithId {
    fn try_into_organization(self) -> Result<Organization, DbError> {
        let id = parse_uuid(&self.record_id, "organization")?;
        let parent_id = self
            .parent_id
            .as_deref()
            .map(|p| parse_uuid(p, "parent organization"))
            .transpose()?;
        Ok(Organization {
            id,
            title: self.title,
            parent_id,
            is_root: self.is_root,
            active: self.active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the organization directory.
#[derive(Clone)]
pub struct SurrealOrganizationDirectory<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealOrganizationDirectory<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    /// Create an organization record. Host/test-side management, not part
    /// of the directory trait.
    pub async fn create(&self, input: CreateOrganization) -> OrgsyncResult<Organization> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let parent_str = input.parent_id.map(|p| p.to_string());

        let mut result = self
            .db
            .query(
                "CREATE type::record('organization', $id) SET \
                 title = $title, parent_id = $parent_id, \
                 is_root = $is_root, active = true",
            )
            .bind(("id", id_str.clone()))
            .bind(("title", input.title))
            .bind(("parent_id", parent_str))
            .bind(("is_root", input.is_root))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| OrgsyncError::Database(e.to_string()))?;

        let rows: Vec<OrganizationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "organization".into(),
            id: id_str,
        })?;

        Ok(Organization {
            id,
            title: row.title,
            parent_id: input.parent_id,
            is_root: row.is_root,
            active: row.active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    /// Update title and/or activity state.
    pub async fn update(&self, id: Uuid, input: UpdateOrganization) -> OrgsyncResult<Organization> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.title.is_some() {
            sets.push("title = $title");
        }
        if input.active.is_some() {
            sets.push("active = $active");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('organization', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));
        if let Some(title) = input.title {
            builder = builder.bind(("title", title));
        }
        if let Some(active) = input.active {
            builder = builder.bind(("active", active));
        }

        let mut result = builder
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| OrgsyncError::Database(e.to_string()))?;

        let rows: Vec<OrganizationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "organization".into(),
            id: id_str,
        })?;

        let parent_id = row
            .parent_id
            .as_deref()
            .map(|p| parse_uuid(p, "parent organization"))
            .transpose()?;

        Ok(Organization {
            id,
            title: row.title,
            parent_id,
            is_root: row.is_root,
            active: row.active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    /// Reparent an organization (`None` makes it top-level).
    pub async fn move_to(&self, id: Uuid, new_parent: Option<Uuid>) -> OrgsyncResult<()> {
        let id_str = id.to_string();
        let parent_str = new_parent.map(|p| p.to_string());

        let mut result = self
            .db
            .query(
                "UPDATE type::record('organization', $id) SET \
                 parent_id = $parent_id, updated_at = time::now()",
            )
            .bind(("id", id_str.clone()))
            .bind(("parent_id", parent_str))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| OrgsyncError::Database(e.to_string()))?;

        let rows: Vec<OrganizationRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::NotFound {
                entity: "organization".into(),
                id: id_str,
            }
            .into());
        }
        Ok(())
    }

    /// Direct children, in creation order.
    async fn children(&self, parent: Uuid) -> OrgsyncResult<Vec<Organization>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM organization \
                 WHERE parent_id = $parent_id \
                 ORDER BY created_at ASC",
            )
            .bind(("parent_id", parent.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OrganizationRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .map(|row| row.try_into_organization())
            .collect::<Result<Vec<_>, DbError>>()?)
    }
}

impl<C: Connection> OrganizationDirectory for SurrealOrganizationDirectory<C> {
    async fn root_organization(&self) -> OrgsyncResult<Uuid> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM organization \
                 WHERE is_root = true",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OrganizationRowWithId> = result.take(0).map_err(DbError::from)?;
        match rows.len() {
            0 => Err(OrgsyncError::NoRootOrganization),
            1 => Ok(parse_uuid(&rows[0].record_id, "organization")?),
            _ => Err(OrgsyncError::MultipleRootOrganizations),
        }
    }

    async fn get(&self, id: Uuid) -> OrgsyncResult<Organization> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM type::record('organization', $id)",
            )
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OrganizationRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "organization".into(),
            id: id_str,
        })?;

        Ok(row.try_into_organization()?)
    }

    async fn title(&self, id: Uuid) -> OrgsyncResult<String> {
        Ok(self.get(id).await?.title)
    }

    async fn is_active(&self, id: Uuid) -> OrgsyncResult<bool> {
        Ok(self.get(id).await?.active)
    }

    async fn ancestor_path_titles(&self, id: Uuid) -> OrgsyncResult<Vec<String>> {
        let mut titles = Vec::new();
        let mut current = self.get(id).await?;

        while !current.is_root {
            if titles.len() >= MAX_TREE_DEPTH {
                return Err(OrgsyncError::Internal(format!(
                    "organization hierarchy deeper than {MAX_TREE_DEPTH} at {id}"
                )));
            }
            titles.push(current.title);
            let Some(parent_id) = current.parent_id else {
                break;
            };
            current = self.get(parent_id).await?;
        }

        titles.reverse();
        Ok(titles)
    }

    async fn descendants(&self, root: Uuid) -> OrgsyncResult<Vec<Organization>> {
        let mut out = Vec::new();
        let mut stack = self.children(root).await?;
        stack.reverse();

        while let Some(org) = stack.pop() {
            if out.len() > MAX_TREE_DEPTH * MAX_TREE_DEPTH {
                return Err(OrgsyncError::Internal(format!(
                    "organization tree under {root} is unreasonably large"
                )));
            }
            let mut kids = self.children(org.id).await?;
            out.push(org);
            kids.reverse();
            stack.extend(kids);
        }
        Ok(out)
    }

    async fn in_configured_tree(&self, id: Uuid) -> OrgsyncResult<bool> {
        let mut depth = 0;
        let mut current = self.get(id).await?;
        loop {
            if current.is_root {
                return Ok(true);
            }
            let Some(parent_id) = current.parent_id else {
                return Ok(false);
            };
            depth += 1;
            if depth > MAX_TREE_DEPTH {
                return Err(OrgsyncError::Internal(format!(
                    "organization hierarchy deeper than {MAX_TREE_DEPTH} at {id}"
                )));
            }
            current = self.get(parent_id).await?;
        }
    }
}
