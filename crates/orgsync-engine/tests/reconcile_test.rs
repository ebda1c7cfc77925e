//! Integration tests for the reconciliation service using in-memory
//! SurrealDB implementations of the store and directory.

use orgsync_core::error::{OrgsyncError, OrgsyncResult};
use orgsync_core::models::function::Function;
use orgsync_core::models::group::Group;
use orgsync_core::models::organization::{CreateOrganization, UpdateOrganization};
use orgsync_core::models::settings::Settings;
use orgsync_core::naming::{GroupId, group_id};
use orgsync_core::store::GroupStore;
use orgsync_db::{SurrealGroupStore, SurrealOrganizationDirectory, run_migrations};
use orgsync_engine::events::ChangeEvent;
use orgsync_engine::reconciler::SyncService;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

struct Fixture {
    store: SurrealGroupStore<Db>,
    directory: SurrealOrganizationDirectory<Db>,
    service: SyncService<SurrealGroupStore<Db>, SurrealOrganizationDirectory<Db>>,
    dep1: Uuid,
    service1: Uuid,
    dep2: Uuid,
    settings: Settings,
}

/// Spin up an in-memory DB with the tree from the classic scenario:
/// root > {department1 > service1, department2}, two unrestricted
/// functions, groups already reconciled once.
async fn setup() -> Fixture {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    run_migrations(&db).await.unwrap();

    let directory = SurrealOrganizationDirectory::new(db.clone());
    let root = directory
        .create(CreateOrganization {
            title: "My organization".into(),
            parent_id: None,
            is_root: true,
        })
        .await
        .unwrap();
    let dep1 = directory
        .create(CreateOrganization {
            title: "Department 1".into(),
            parent_id: Some(root.id),
            is_root: false,
        })
        .await
        .unwrap();
    let service1 = directory
        .create(CreateOrganization {
            title: "Service 1".into(),
            parent_id: Some(dep1.id),
            is_root: false,
        })
        .await
        .unwrap();
    let dep2 = directory
        .create(CreateOrganization {
            title: "Department 2".into(),
            parent_id: Some(root.id),
            is_root: false,
        })
        .await
        .unwrap();

    let settings = Settings::new(
        vec![dep1.id, service1.id, dep2.id],
        vec![
            Function::new("director", "Director"),
            Function::new("worker", "Worker"),
        ],
    );

    let store = SurrealGroupStore::new(db.clone());
    let service = SyncService::new(store.clone(), directory.clone());
    let report = service
        .reconcile(&Settings::default(), &settings)
        .await
        .unwrap();
    assert_eq!(report.created, 6);

    Fixture {
        store,
        directory,
        service,
        dep1: dep1.id,
        service1: service1.id,
        dep2: dep2.id,
        settings,
    }
}

async fn title_of(store: &SurrealGroupStore<Db>, id: &GroupId) -> String {
    store
        .list()
        .await
        .unwrap()
        .into_iter()
        .find(|g| &g.id == id)
        .map(|g| g.title)
        .unwrap()
}

#[tokio::test]
async fn groups_created_for_every_selected_pair() {
    let fx = setup().await;

    for &org in &fx.settings.organizations {
        assert!(fx.store.exists(&group_id(org, "director")).await.unwrap());
        assert!(fx.store.exists(&group_id(org, "worker")).await.unwrap());
    }

    assert_eq!(
        title_of(&fx.store, &group_id(fx.dep1, "director")).await,
        "Department 1 (Director)"
    );
    assert_eq!(
        title_of(&fx.store, &group_id(fx.service1, "director")).await,
        "Department 1 - Service 1 (Director)"
    );
}

#[tokio::test]
async fn second_pass_over_unchanged_input_is_a_noop() {
    let fx = setup().await;

    let report = fx
        .service
        .reconcile(&fx.settings, &fx.settings)
        .await
        .unwrap();
    assert!(report.is_noop());
    assert_eq!(report.unchanged, 6);
    assert_eq!(fx.store.list().await.unwrap().len(), 6);
}

#[tokio::test]
async fn function_retitle_renames_every_group_of_that_function() {
    let fx = setup().await;

    let mut proposed = fx.settings.clone();
    proposed.functions[0].title = "Directors".into();

    let report = fx.service.reconcile(&fx.settings, &proposed).await.unwrap();
    assert_eq!(report.renamed, 3);
    assert_eq!(report.created, 0);
    assert_eq!(report.deleted, 0);

    assert_eq!(
        title_of(&fx.store, &group_id(fx.dep1, "director")).await,
        "Department 1 (Directors)"
    );
    assert_eq!(
        title_of(&fx.store, &group_id(fx.service1, "director")).await,
        "Department 1 - Service 1 (Directors)"
    );
    // Worker groups are untouched.
    assert_eq!(
        title_of(&fx.store, &group_id(fx.dep1, "worker")).await,
        "Department 1 (Worker)"
    );
}

#[tokio::test]
async fn adding_an_organization_creates_its_groups() {
    let fx = setup().await;

    let service2 = fx
        .directory
        .create(CreateOrganization {
            title: "Service 2".into(),
            parent_id: Some(fx.dep2),
            is_root: false,
        })
        .await
        .unwrap();

    let mut proposed = fx.settings.clone();
    proposed.organizations.push(service2.id);

    let report = fx.service.reconcile(&fx.settings, &proposed).await.unwrap();
    assert_eq!(report.created, 2);
    assert_eq!(report.deleted, 0);

    assert!(
        fx.store
            .exists(&group_id(service2.id, "director"))
            .await
            .unwrap()
    );
    assert_eq!(
        title_of(&fx.store, &group_id(service2.id, "worker")).await,
        "Department 2 - Service 2 (Worker)"
    );
}

#[tokio::test]
async fn adding_a_function_scales_coverage() {
    let fx = setup().await;

    let mut proposed = fx.settings.clone();
    proposed.functions.push(Function::new("chief", "Chief"));

    let report = fx.service.reconcile(&fx.settings, &proposed).await.unwrap();
    assert_eq!(report.created, 3);
    assert_eq!(report.unchanged, 6);
    assert_eq!(report.deleted, 0);
    assert_eq!(fx.store.list().await.unwrap().len(), 9);

    for &org in &proposed.organizations {
        assert!(fx.store.exists(&group_id(org, "chief")).await.unwrap());
    }
}

#[tokio::test]
async fn organization_rename_updates_all_affected_titles() {
    let fx = setup().await;

    fx.directory
        .update(
            fx.dep1,
            UpdateOrganization {
                title: Some("Department 1 changed".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let report = fx
        .service
        .handle_event(
            &fx.settings,
            &ChangeEvent::OrganizationModified { org: fx.dep1 },
        )
        .await
        .unwrap();
    // department1 and its descendant service1, for both functions.
    assert_eq!(report.renamed, 4);
    assert_eq!(report.created, 0);
    assert_eq!(report.deleted, 0);

    assert_eq!(
        title_of(&fx.store, &group_id(fx.dep1, "director")).await,
        "Department 1 changed (Director)"
    );
    assert_eq!(
        title_of(&fx.store, &group_id(fx.service1, "director")).await,
        "Department 1 changed - Service 1 (Director)"
    );
    // Ids are stable across retitles.
    assert!(fx.store.exists(&group_id(fx.dep1, "director")).await.unwrap());
}

#[tokio::test]
async fn organization_move_updates_path_titles() {
    let fx = setup().await;

    fx.directory
        .move_to(fx.service1, Some(fx.dep2))
        .await
        .unwrap();

    let report = fx
        .service
        .handle_event(
            &fx.settings,
            &ChangeEvent::OrganizationMoved { org: fx.service1 },
        )
        .await
        .unwrap();
    assert_eq!(report.renamed, 2);

    assert_eq!(
        title_of(&fx.store, &group_id(fx.service1, "director")).await,
        "Department 2 - Service 1 (Director)"
    );
}

#[tokio::test]
async fn deselecting_an_organization_deletes_its_groups() {
    let fx = setup().await;

    let mut proposed = fx.settings.clone();
    proposed.organizations.retain(|&org| org != fx.dep2);

    let report = fx.service.reconcile(&fx.settings, &proposed).await.unwrap();
    assert_eq!(report.deleted, 2);

    assert!(!fx.store.exists(&group_id(fx.dep2, "director")).await.unwrap());
    assert!(!fx.store.exists(&group_id(fx.dep2, "worker")).await.unwrap());
    assert!(fx.store.exists(&group_id(fx.dep1, "director")).await.unwrap());
}

#[tokio::test]
async fn restricted_function_only_creates_relevant_groups() {
    let fx = setup().await;

    let mut proposed = fx.settings.clone();
    proposed
        .functions
        .push(Function::new("new", "New").restricted_to(vec![fx.dep1]));

    fx.service.reconcile(&fx.settings, &proposed).await.unwrap();

    assert!(fx.store.exists(&group_id(fx.dep1, "new")).await.unwrap());
    assert!(!fx.store.exists(&group_id(fx.dep2, "new")).await.unwrap());
    assert!(
        !fx.store
            .exists(&group_id(fx.service1, "new"))
            .await
            .unwrap()
    );
}

/// Store wrapper whose deletes always fail, to exercise partial-failure
/// reporting and batch retry.
struct OutageStore {
    inner: SurrealGroupStore<Db>,
}

impl GroupStore for OutageStore {
    async fn exists(&self, id: &GroupId) -> OrgsyncResult<bool> {
        self.inner.exists(id).await
    }

    async fn members(&self, id: &GroupId) -> OrgsyncResult<Vec<String>> {
        self.inner.members(id).await
    }

    async fn list(&self) -> OrgsyncResult<Vec<Group>> {
        self.inner.list().await
    }

    async fn create(&self, id: &GroupId, title: &str) -> OrgsyncResult<()> {
        self.inner.create(id, title).await
    }

    async fn rename(&self, id: &GroupId, title: &str) -> OrgsyncResult<()> {
        self.inner.rename(id, title).await
    }

    async fn delete(&self, _id: &GroupId) -> OrgsyncResult<()> {
        Err(OrgsyncError::Database("simulated outage".into()))
    }

    async fn add_member(&self, id: &GroupId, user_id: &str) -> OrgsyncResult<()> {
        self.inner.add_member(id, user_id).await
    }

    async fn remove_member(&self, id: &GroupId, user_id: &str) -> OrgsyncResult<()> {
        self.inner.remove_member(id, user_id).await
    }
}

#[tokio::test]
async fn partial_failure_is_reported_and_the_batch_is_retryable() {
    let fx = setup().await;

    let mut proposed = fx.settings.clone();
    proposed.functions.retain(|f| f.id != "director");

    let flaky = SyncService::new(
        OutageStore {
            inner: fx.store.clone(),
        },
        fx.directory.clone(),
    );
    let report = flaky.reconcile(&fx.settings, &proposed).await.unwrap();
    assert!(!report.is_complete());
    assert_eq!(report.deleted, 0);
    assert_eq!(report.failures.len(), 3);
    for failure in &report.failures {
        assert_eq!(failure.cause, "Database error: simulated outage");
    }

    // The director groups survived the outage; retrying the whole batch
    // against the healthy store finishes the job.
    assert!(fx.store.exists(&group_id(fx.dep1, "director")).await.unwrap());
    let report = fx.service.reconcile(&fx.settings, &proposed).await.unwrap();
    assert!(report.is_complete());
    assert_eq!(report.deleted, 3);
    assert!(!fx.store.exists(&group_id(fx.dep1, "director")).await.unwrap());
    assert!(fx.store.exists(&group_id(fx.dep1, "worker")).await.unwrap());
}
