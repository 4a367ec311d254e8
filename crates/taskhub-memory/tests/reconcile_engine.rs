//! Engine-level tests for locate/ensure/reconcile/seed/append against the
//! in-memory workspace.

use taskhub_core::blueprint;
use taskhub_core::reconcile::{
    ProvisionOutcome, SeedOutcome, append_info_blocks, count_rows, ensure, fetch_rows, locate,
    reconcile_schema, seed_if_empty,
};
use taskhub_core::{
    Block, CreationSpec, DatabaseSpec, ErrorCategory, Handle, LiveSchema, PageSpec,
    PropertyDefinition, PropertyKind, PropertyValue, RemoteOp, ResourceKind, RowSpec, Schema,
    WorkspaceClient,
};
use taskhub_memory::{InMemoryWorkspace, WorkspaceOptions};

fn paged(listing_page_size: usize) -> InMemoryWorkspace {
    InMemoryWorkspace::with_options(WorkspaceOptions {
        listing_page_size,
        ..WorkspaceOptions::default()
    })
}

// ==================== Locator ====================

#[tokio::test]
async fn locate_walks_every_listing_page() {
    let ws = paged(2);
    let root = ws.insert_root("Root").await;
    for i in 0..6 {
        ws.insert_page(&root, &format!("filler {i}")).await;
    }
    let target = ws.insert_page(&root, "Target").await;

    let found = locate(&ws, &root, ResourceKind::Page, "Target")
        .await
        .unwrap();
    assert_eq!(found, Some(target));
    assert_eq!(ws.stats().get(RemoteOp::ListChildren), 4);
}

#[tokio::test]
async fn locate_filters_by_kind_and_exact_name() {
    let ws = InMemoryWorkspace::new();
    let root = ws.insert_root("Root").await;
    ws.insert_page(&root, "Projects").await;
    ws.insert_page(&root, "projects db").await;

    let as_store = locate(&ws, &root, ResourceKind::Database, "Projects")
        .await
        .unwrap();
    assert_eq!(as_store, None);

    let case_mismatch = locate(&ws, &root, ResourceKind::Page, "projects")
        .await
        .unwrap();
    assert_eq!(case_mismatch, None);
}

#[tokio::test]
async fn locate_returns_first_match() {
    let ws = InMemoryWorkspace::new();
    let root = ws.insert_root("Root").await;
    let first = ws.insert_page(&root, "Dup").await;
    ws.insert_page(&root, "Dup").await;

    let found = locate(&ws, &root, ResourceKind::Page, "Dup").await.unwrap();
    assert_eq!(found, Some(first));
}

#[tokio::test]
async fn locate_propagates_lookup_errors() {
    let ws = InMemoryWorkspace::new();
    let root = ws.insert_root("Root").await;
    ws.fail_next(RemoteOp::ListChildren);

    let err = locate(&ws, &root, ResourceKind::Page, "x")
        .await
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Lookup);

    let missing = locate(&ws, &Handle::page("nope"), ResourceKind::Page, "x")
        .await
        .unwrap_err();
    assert!(missing.is_not_found());
}

// ==================== Provisioner ====================

#[tokio::test]
async fn ensure_twice_creates_once() {
    let ws = InMemoryWorkspace::new();
    let root = ws.insert_root("Root").await;
    let spec: CreationSpec = PageSpec::new("Hub").into();

    let first = ensure(&ws, &root, &spec).await.unwrap();
    let second = ensure(&ws, &root, &spec).await.unwrap();

    assert_eq!(first.outcome, ProvisionOutcome::Created);
    assert_eq!(second.outcome, ProvisionOutcome::Adopted);
    assert_eq!(first.handle, second.handle);
    assert_eq!(ws.stats().get(RemoteOp::CreatePage), 1);
    assert_eq!(ws.find_children(&root, ResourceKind::Page, "Hub").await.len(), 1);
}

#[tokio::test]
async fn ensure_adopts_existing_store_without_touching_it() {
    let ws = InMemoryWorkspace::new();
    let root = ws.insert_root("Root").await;
    let existing = ws
        .insert_database(
            &root,
            "Store",
            LiveSchema::new().with("Title", PropertyKind::Title),
        )
        .await;

    let spec: CreationSpec = DatabaseSpec::new(
        "Store",
        Schema::new()
            .with("Name", PropertyDefinition::Title)
            .with("Notes", PropertyDefinition::Text),
    )
    .into();
    let provisioned = ensure(&ws, &root, &spec).await.unwrap();

    assert_eq!(provisioned.handle, existing);
    assert!(!provisioned.was_created());
    assert_eq!(ws.stats().writes(), 0);
    assert_eq!(
        ws.live_schema(&existing).await.unwrap(),
        LiveSchema::new().with("Title", PropertyKind::Title)
    );
}

#[tokio::test]
async fn ensure_does_not_confuse_pages_and_stores() {
    let ws = InMemoryWorkspace::new();
    let root = ws.insert_root("Root").await;
    ws.insert_page(&root, "Store").await;

    let spec: CreationSpec =
        DatabaseSpec::new("Store", Schema::new().with("Name", PropertyDefinition::Title)).into();
    let provisioned = ensure(&ws, &root, &spec).await.unwrap();

    assert!(provisioned.was_created());
    assert_eq!(provisioned.handle.kind, ResourceKind::Database);
}

#[tokio::test]
async fn ensure_reports_write_failures() {
    let ws = InMemoryWorkspace::new();
    let root = ws.insert_root("Root").await;
    ws.fail_next(RemoteOp::CreatePage);

    let err = ensure(&ws, &root, &PageSpec::new("Hub").into())
        .await
        .unwrap_err();
    assert_eq!(err.op(), RemoteOp::CreatePage);
    assert_eq!(err.category(), ErrorCategory::Write);
    assert!(ws.children(&root).await.is_empty());
}

// ==================== Schema reconciler ====================

#[tokio::test]
async fn reconcile_reaches_fixed_point_in_one_pass() {
    let ws = InMemoryWorkspace::new();
    let root = ws.insert_root("Root").await;
    let store = ws
        .insert_database(
            &root,
            "Projects",
            LiveSchema::new()
                .with("Name", PropertyKind::Title)
                .with("Area", PropertyKind::Select)
                .with("Done", PropertyKind::Other("checkbox".into())),
        )
        .await;
    let target = blueprint::projects_schema();

    let applied = reconcile_schema(&ws, &store, &target).await.unwrap();
    assert_eq!(applied.names().collect::<Vec<_>>(), vec!["Status", "Notes"]);
    assert_eq!(ws.stats().get(RemoteOp::UpdateDatabase), 1);

    let live = ws.live_schema(&store).await.unwrap();
    assert!(live.satisfies(&target));
    assert_eq!(
        live.kind_of("Done"),
        Some(&PropertyKind::Other("checkbox".into()))
    );

    let again = reconcile_schema(&ws, &store, &target).await.unwrap();
    assert!(again.is_empty());
    assert_eq!(ws.stats().get(RemoteOp::UpdateDatabase), 1);
}

#[tokio::test]
async fn reconcile_replaces_property_with_wrong_kind() {
    let ws = InMemoryWorkspace::new();
    let root = ws.insert_root("Root").await;
    let store = ws
        .insert_database(
            &root,
            "Projects",
            LiveSchema::new()
                .with("Name", PropertyKind::Title)
                .with("Status", PropertyKind::Text),
        )
        .await;

    reconcile_schema(&ws, &store, &blueprint::projects_schema())
        .await
        .unwrap();

    let live = ws.live_schema(&store).await.unwrap();
    assert_eq!(live.kind_of("Status"), Some(&PropertyKind::Status));
    assert_eq!(
        ws.definition(&store, "Status").await,
        Some(PropertyDefinition::Status)
    );
}

#[tokio::test]
async fn reconcile_leaves_matching_kind_with_other_options_alone() {
    let ws = InMemoryWorkspace::new();
    let root = ws.insert_root("Root").await;
    let custom = Schema::new()
        .with("Name", PropertyDefinition::Title)
        .with("Status", PropertyDefinition::Status)
        .with("Area", PropertyDefinition::select(["Garden"]))
        .with("Notes", PropertyDefinition::Text);
    let store = ensure(
        &ws,
        &root,
        &DatabaseSpec::new(blueprint::PROJECTS_TITLE, custom).into(),
    )
    .await
    .unwrap()
    .handle;

    let applied = reconcile_schema(&ws, &store, &blueprint::projects_schema())
        .await
        .unwrap();

    assert!(applied.is_empty());
    assert_eq!(
        ws.definition(&store, "Area").await,
        Some(PropertyDefinition::select(["Garden"]))
    );
}

#[tokio::test]
async fn reconcile_never_retargets_an_existing_relation() {
    let ws = InMemoryWorkspace::new();
    let root = ws.insert_root("Root").await;
    let original = ensure(&ws, &root, &blueprint::projects_spec().into())
        .await
        .unwrap()
        .handle;
    let other = ws
        .insert_database(
            &root,
            "Elsewhere",
            LiveSchema::new().with("Name", PropertyKind::Title),
        )
        .await;
    let tasks = ensure(&ws, &root, &blueprint::tasks_spec(&original).into())
        .await
        .unwrap()
        .handle;

    let applied = reconcile_schema(&ws, &tasks, &blueprint::tasks_schema(&other))
        .await
        .unwrap();

    assert!(applied.is_empty());
    assert_eq!(
        ws.definition(&tasks, blueprint::PROJECT_RELATION).await,
        Some(PropertyDefinition::relation(&original.id))
    );
}

#[tokio::test]
async fn reconcile_adds_missing_relation_with_target() {
    let ws = InMemoryWorkspace::new();
    let root = ws.insert_root("Root").await;
    let projects = ensure(&ws, &root, &blueprint::projects_spec().into())
        .await
        .unwrap()
        .handle;
    let tasks = ws
        .insert_database(
            &root,
            blueprint::TASKS_TITLE,
            LiveSchema::new().with("Name", PropertyKind::Title),
        )
        .await;

    let applied = reconcile_schema(&ws, &tasks, &blueprint::tasks_schema(&projects))
        .await
        .unwrap();

    assert_eq!(applied.len(), 7);
    assert_eq!(
        ws.definition(&tasks, blueprint::PROJECT_RELATION).await,
        Some(PropertyDefinition::relation(&projects.id))
    );
}

#[tokio::test]
async fn reconcile_failure_leaves_schema_unchanged() {
    let ws = InMemoryWorkspace::new();
    let root = ws.insert_root("Root").await;
    let store = ws
        .insert_database(
            &root,
            "Projects",
            LiveSchema::new().with("Name", PropertyKind::Title),
        )
        .await;
    ws.fail_next(RemoteOp::UpdateDatabase);

    let err = reconcile_schema(&ws, &store, &blueprint::projects_schema())
        .await
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Write);
    assert_eq!(ws.live_schema(&store).await.unwrap().len(), 1);
}

#[tokio::test]
async fn reconcile_keeps_a_differently_named_title() {
    let ws = InMemoryWorkspace::new();
    let root = ws.insert_root("Root").await;
    let store = ws
        .insert_database(
            &root,
            "Projects",
            LiveSchema::new().with("Project", PropertyKind::Title),
        )
        .await;

    let applied = reconcile_schema(&ws, &store, &blueprint::projects_schema())
        .await
        .unwrap();

    assert_eq!(
        applied.names().collect::<Vec<_>>(),
        vec!["Status", "Area", "Notes"]
    );
    assert_eq!(applied.title_property.as_deref(), Some("Project"));
    let live = ws.live_schema(&store).await.unwrap();
    assert_eq!(live.kind_of("Name"), None);
    assert_eq!(live.title_property(), Some("Project"));
}

#[tokio::test]
async fn second_title_property_is_rejected() {
    let ws = InMemoryWorkspace::new();
    let root = ws.insert_root("Root").await;
    let store = ws
        .insert_database(
            &root,
            "Projects",
            LiveSchema::new().with("Project", PropertyKind::Title),
        )
        .await;

    let err = ws
        .update_schema(
            &store,
            &Schema::new().with("Name", PropertyDefinition::Title),
        )
        .await
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Write);
    assert_eq!(ws.live_schema(&store).await.unwrap().len(), 1);
}

// ==================== Seed loader ====================

async fn projects_store(ws: &InMemoryWorkspace) -> Handle {
    let root = ws.insert_root("Root").await;
    ensure(ws, &root, &blueprint::projects_spec().into())
        .await
        .unwrap()
        .handle
}

#[tokio::test]
async fn seed_fills_empty_store_in_input_order() {
    let ws = InMemoryWorkspace::new();
    let store = projects_store(&ws).await;
    let samples = blueprint::project_rows();

    let outcome = seed_if_empty(&ws, &store, &samples).await.unwrap();

    let SeedOutcome::Created(handles) = &outcome else {
        panic!("expected rows to be created, got {outcome:?}");
    };
    assert_eq!(handles.len(), 3);
    let stored = ws.rows(&store).await;
    for (i, (handle, values)) in stored.iter().enumerate() {
        assert_eq!(handle, &handles[i]);
        assert_eq!(values, &samples[i]);
    }
}

#[tokio::test]
async fn seed_skips_non_empty_store() {
    let ws = InMemoryWorkspace::new();
    let store = projects_store(&ws).await;
    let manual = ws
        .insert_row(
            &store,
            RowSpec::new().with("Name", PropertyValue::Title("Mine".into())),
        )
        .await;

    let outcome = seed_if_empty(&ws, &store, &blueprint::project_rows())
        .await
        .unwrap();

    assert_eq!(outcome, SeedOutcome::Existing(vec![manual]));
    assert_eq!(outcome.created_count(), 0);
    assert_eq!(ws.stats().get(RemoteOp::CreateRow), 0);
    assert_eq!(ws.rows(&store).await.len(), 1);
}

#[tokio::test]
async fn seed_returns_at_most_one_existing_row_per_sample() {
    let ws = paged(100);
    let store = projects_store(&ws).await;
    let mut inserted = Vec::new();
    for i in 0..5 {
        inserted.push(
            ws.insert_row(
                &store,
                RowSpec::new().with("Name", PropertyValue::Title(format!("r{i}"))),
            )
            .await,
        );
    }

    let outcome = seed_if_empty(&ws, &store, &blueprint::project_rows())
        .await
        .unwrap();
    assert_eq!(outcome.rows(), &inserted[..3]);
}

#[tokio::test]
async fn fetch_rows_stops_at_limit() {
    let ws = InMemoryWorkspace::new();
    let store = projects_store(&ws).await;
    for i in 0..4 {
        ws.insert_row(
            &store,
            RowSpec::new().with("Name", PropertyValue::Title(format!("r{i}"))),
        )
        .await;
    }
    ws.reset_stats();

    let rows = fetch_rows(&ws, &store, 3).await.unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(ws.stats().get(RemoteOp::QueryDatabase), 1);

    assert!(fetch_rows(&ws, &store, 0).await.unwrap().is_empty());
    assert_eq!(ws.stats().get(RemoteOp::QueryDatabase), 1);
}

#[tokio::test]
async fn fetch_rows_follows_cursors() {
    let ws = InMemoryWorkspace::new();
    let store = projects_store(&ws).await;
    for _ in 0..120 {
        ws.insert_row(&store, RowSpec::new()).await;
    }
    ws.reset_stats();

    // The backend caps pages at 100 rows.
    let rows = fetch_rows(&ws, &store, 150).await.unwrap();
    assert_eq!(rows.len(), 120);
    assert_eq!(ws.stats().get(RemoteOp::QueryDatabase), 2);
}

#[tokio::test]
async fn count_uses_total_when_reported() {
    let with_totals = InMemoryWorkspace::with_options(WorkspaceOptions {
        report_totals: true,
        ..WorkspaceOptions::default()
    });
    let store = projects_store(&with_totals).await;
    for _ in 0..3 {
        with_totals.insert_row(&store, RowSpec::new()).await;
    }
    assert_eq!(count_rows(&with_totals, &store).await.unwrap(), 3);

    let without = InMemoryWorkspace::new();
    let store = projects_store(&without).await;
    for _ in 0..3 {
        without.insert_row(&store, RowSpec::new()).await;
    }
    // Without a total only the probe page is visible.
    assert_eq!(count_rows(&without, &store).await.unwrap(), 1);
}

#[tokio::test]
async fn seed_stops_at_first_failed_row() {
    let ws = InMemoryWorkspace::new();
    let store = projects_store(&ws).await;
    ws.fail_next(RemoteOp::CreateRow);

    let err = seed_if_empty(&ws, &store, &blueprint::project_rows())
        .await
        .unwrap_err();
    assert_eq!(err.op(), RemoteOp::CreateRow);
    assert!(ws.rows(&store).await.is_empty());
    assert_eq!(ws.stats().get(RemoteOp::CreateRow), 1);
}

// ==================== Content appender ====================

#[tokio::test]
async fn append_duplicates_on_every_call() {
    let ws = InMemoryWorkspace::new();
    let root = ws.insert_root("Root").await;
    let blocks = vec![
        Block::Heading2("Your Databases".into()),
        Block::Paragraph("hello".into()),
    ];

    append_info_blocks(&ws, &root, &blocks).await.unwrap();
    append_info_blocks(&ws, &root, &blocks).await.unwrap();

    assert_eq!(ws.blocks(&root).await.len(), 4);
    assert_eq!(ws.stats().get(RemoteOp::AppendBlocks), 2);
}

#[tokio::test]
async fn append_nothing_is_a_noop() {
    let ws = InMemoryWorkspace::new();
    let root = ws.insert_root("Root").await;

    append_info_blocks(&ws, &root, &[]).await.unwrap();
    assert_eq!(ws.stats().total(), 0);
}
