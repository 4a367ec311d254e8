//! End-to-end Task Hub provisioning.
//!
//! Steps run strictly in sequence and stop at the first remote error. Every
//! step before the content append tolerates the partial state left by an
//! aborted earlier run.

use std::fmt;

use crate::blueprint;
use crate::client::WorkspaceClient;
use crate::error::RemoteError;
use crate::reconcile::{
    Provisioned, SeedOutcome, append_info_blocks, count_rows, ensure, locate, reconcile_schema,
    seed_if_empty,
};
use crate::schema::{Schema, SchemaDiff, diff_schema};
use crate::types::{CreationSpec, Handle, ResourceKind, RowSpec};

/// Knobs for [`bootstrap`].
#[derive(Debug, Clone, Copy)]
pub struct BootstrapOptions {
    /// Append the info blocks to the dashboard. Every run appends another copy.
    pub append_links: bool,
}

impl Default for BootstrapOptions {
    fn default() -> Self {
        Self { append_links: true }
    }
}

/// What a [`bootstrap`] run did.
#[derive(Debug, Clone)]
pub struct BootstrapReport {
    pub dashboard: Provisioned,
    pub projects: Provisioned,
    pub projects_schema: SchemaDiff,
    pub tasks: Provisioned,
    pub tasks_schema: SchemaDiff,
    pub projects_seed: SeedOutcome,
    /// `None` when there were no project rows to link tasks to.
    pub tasks_seed: Option<SeedOutcome>,
    pub links_appended: bool,
}

impl BootstrapReport {
    /// Number of pages and stores created by this run.
    #[must_use]
    pub fn resources_created(&self) -> usize {
        [&self.dashboard, &self.projects, &self.tasks]
            .iter()
            .filter(|p| p.was_created())
            .count()
    }

    /// Number of property definitions sent across both stores.
    #[must_use]
    pub fn schema_changes(&self) -> usize {
        self.projects_schema.len() + self.tasks_schema.len()
    }

    /// Number of rows created across both stores.
    #[must_use]
    pub fn rows_created(&self) -> usize {
        self.projects_seed.created_count()
            + self
                .tasks_seed
                .as_ref()
                .map_or(0, SeedOutcome::created_count)
    }
}

/// Provisions and reconciles the whole hub under `root`.
pub async fn bootstrap(
    client: &dyn WorkspaceClient,
    root: &Handle,
    options: BootstrapOptions,
) -> Result<BootstrapReport, RemoteError> {
    tracing::info!(root = %root.id, backend = client.backend_name(), "Bootstrapping task hub");

    let dashboard = ensure(client, root, &blueprint::dashboard_spec().into()).await?;

    let projects = ensure(
        client,
        &dashboard.handle,
        &blueprint::projects_spec().into(),
    )
    .await?;
    let projects_schema =
        reconcile_schema(client, &projects.handle, &blueprint::projects_schema()).await?;

    let tasks = ensure(
        client,
        &dashboard.handle,
        &blueprint::tasks_spec(&projects.handle).into(),
    )
    .await?;
    let tasks_schema = reconcile_schema(
        client,
        &tasks.handle,
        &blueprint::tasks_schema(&projects.handle),
    )
    .await?;

    let project_rows = retitle(blueprint::project_rows(), &projects_schema);
    let projects_seed = seed_if_empty(client, &projects.handle, &project_rows).await?;

    let tasks_seed = if projects_seed.rows().is_empty() {
        tracing::warn!(
            store = %projects.handle.id,
            "No project rows available, skipping task seed"
        );
        None
    } else {
        let rows = retitle(blueprint::task_rows(projects_seed.rows()), &tasks_schema);
        Some(seed_if_empty(client, &tasks.handle, &rows).await?)
    };

    if options.append_links {
        let blocks = blueprint::info_blocks(&projects.handle, &tasks.handle);
        append_info_blocks(client, &dashboard.handle, &blocks).await?;
    }

    let report = BootstrapReport {
        dashboard,
        projects,
        projects_schema,
        tasks,
        tasks_schema,
        projects_seed,
        tasks_seed,
        links_appended: options.append_links,
    };

    tracing::info!(
        resources_created = report.resources_created(),
        schema_changes = report.schema_changes(),
        rows_created = report.rows_created(),
        "Task hub bootstrap complete"
    );

    Ok(report)
}

/// Points sample titles at the title property the store actually has.
fn retitle(rows: Vec<RowSpec>, diff: &SchemaDiff) -> Vec<RowSpec> {
    match diff.title_property.as_deref() {
        Some(property) => rows
            .into_iter()
            .map(|row| row.with_title_property(property))
            .collect(),
        None => rows,
    }
}

/// What [`bootstrap`] would do with one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannedAction {
    Create,
    Adopt,
}

impl fmt::Display for PlannedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Adopt => write!(f, "adopt"),
        }
    }
}

/// Planned treatment of one page or store.
#[derive(Debug, Clone)]
pub struct ResourcePlan {
    pub title: &'static str,
    pub kind: ResourceKind,
    pub action: PlannedAction,
    /// Existing handle when adopting.
    pub handle: Option<Handle>,
    /// Properties that would be sent. Always empty for pages and for stores
    /// that would be created with their full schema.
    pub schema: SchemaDiff,
    /// Current row count probe for existing stores.
    pub rows: Option<u64>,
    /// Whether sample rows would be created.
    pub will_seed: bool,
}

impl ResourcePlan {
    fn create(title: &'static str, kind: ResourceKind) -> Self {
        Self {
            title,
            kind,
            action: PlannedAction::Create,
            handle: None,
            schema: SchemaDiff::default(),
            rows: None,
            will_seed: kind == ResourceKind::Database,
        }
    }

    fn adopt(title: &'static str, handle: Handle) -> Self {
        Self {
            title,
            kind: handle.kind,
            action: PlannedAction::Adopt,
            handle: Some(handle),
            schema: SchemaDiff::default(),
            rows: None,
            will_seed: false,
        }
    }

    /// Returns `true` when bootstrap would leave this resource untouched.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.action == PlannedAction::Adopt && self.schema.is_empty() && !self.will_seed
    }
}

/// Read-only preview of a [`bootstrap`] run.
#[derive(Debug, Clone)]
pub struct PlanReport {
    pub dashboard: ResourcePlan,
    pub projects: ResourcePlan,
    pub tasks: ResourcePlan,
    pub appends_links: bool,
}

impl PlanReport {
    pub fn resources(&self) -> impl Iterator<Item = &ResourcePlan> {
        [&self.dashboard, &self.projects, &self.tasks].into_iter()
    }

    /// Returns `true` when bootstrap would only append the info blocks, if anything.
    #[must_use]
    pub fn is_converged(&self) -> bool {
        self.resources().all(ResourcePlan::is_noop)
    }
}

/// Computes what [`bootstrap`] would change under `root` without writing anything.
pub async fn plan(
    client: &dyn WorkspaceClient,
    root: &Handle,
    options: BootstrapOptions,
) -> Result<PlanReport, RemoteError> {
    let dashboard_spec: CreationSpec = blueprint::dashboard_spec().into();
    let Some(dashboard) = locate(
        client,
        root,
        dashboard_spec.kind(),
        dashboard_spec.title(),
    )
    .await?
    else {
        return Ok(PlanReport {
            dashboard: ResourcePlan::create(blueprint::DASHBOARD_TITLE, ResourceKind::Page),
            projects: ResourcePlan::create(blueprint::PROJECTS_TITLE, ResourceKind::Database),
            tasks: ResourcePlan::create(blueprint::TASKS_TITLE, ResourceKind::Database),
            appends_links: options.append_links,
        });
    };

    let projects = plan_store(
        client,
        &dashboard,
        blueprint::PROJECTS_TITLE,
        &blueprint::projects_schema(),
    )
    .await?;

    // Relation targets do not affect a kind-level diff, so any handle will do
    // when the projects store does not exist yet.
    let projects_handle = projects
        .handle
        .clone()
        .unwrap_or_else(|| Handle::database(""));
    let mut tasks = plan_store(
        client,
        &dashboard,
        blueprint::TASKS_TITLE,
        &blueprint::tasks_schema(&projects_handle),
    )
    .await?;

    let projects_will_have_rows = projects.will_seed || projects.rows.unwrap_or(0) > 0;
    tasks.will_seed &= projects_will_have_rows;

    Ok(PlanReport {
        dashboard: ResourcePlan::adopt(blueprint::DASHBOARD_TITLE, dashboard),
        projects,
        tasks,
        appends_links: options.append_links,
    })
}

async fn plan_store(
    client: &dyn WorkspaceClient,
    dashboard: &Handle,
    title: &'static str,
    target: &Schema,
) -> Result<ResourcePlan, RemoteError> {
    let Some(handle) = locate(client, dashboard, ResourceKind::Database, title).await? else {
        return Ok(ResourcePlan::create(title, ResourceKind::Database));
    };

    let live = client.retrieve_schema(&handle).await?;
    let rows = count_rows(client, &handle).await?;

    let mut plan = ResourcePlan::adopt(title, handle);
    plan.schema = diff_schema(&live, target);
    plan.rows = Some(rows);
    plan.will_seed = rows == 0;
    Ok(plan)
}
