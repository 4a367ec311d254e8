//! Implementation of the WorkspaceClient trait for InMemoryWorkspace.

use async_trait::async_trait;
use indexmap::IndexMap;
use taskhub_core::{
    Block, ChildListing, DatabaseSpec, Handle, LiveSchema, PageSpec, PropertyDefinition,
    PropertyKind, PropertyValue, RemoteError, RemoteOp, ResourceKind, RowPage, RowQuery, RowSpec,
    Schema, WorkspaceClient,
};

use crate::workspace::{InMemoryWorkspace, NodeBody, State};

const MAX_PAGE_SIZE: usize = 100;

fn validation(op: RemoteOp, message: impl Into<String>) -> RemoteError {
    RemoteError::api(op, 400, "validation_error", message)
}

/// Parses an offset cursor handed out by this backend.
fn parse_cursor(op: RemoteOp, cursor: Option<&str>) -> Result<usize, RemoteError> {
    match cursor {
        None => Ok(0),
        Some(c) => c
            .parse()
            .map_err(|_| validation(op, format!("invalid start_cursor: {c}"))),
    }
}

/// Slices `items` into one page and returns the cursor for the next one.
fn paginate<T: Clone>(items: &[T], offset: usize, page_size: usize) -> (Vec<T>, Option<String>) {
    let start = offset.min(items.len());
    let end = start.saturating_add(page_size.max(1)).min(items.len());
    let next = (end < items.len()).then(|| end.to_string());
    (items[start..end].to_vec(), next)
}

fn require(
    state: &State,
    op: RemoteOp,
    handle: &Handle,
    kind: ResourceKind,
) -> Result<(), RemoteError> {
    match state.kind_of(&handle.id) {
        Some(found) if found == kind => Ok(()),
        _ => Err(RemoteError::not_found(op, &handle.id)),
    }
}

/// Checks that every relation in `schema` targets an existing store.
fn check_relations(state: &State, op: RemoteOp, schema: &Schema) -> Result<(), RemoteError> {
    for (name, definition) in schema.iter() {
        if let PropertyDefinition::Relation { database_id } = definition
            && state.kind_of(database_id) != Some(ResourceKind::Database)
        {
            return Err(validation(
                op,
                format!("relation {name} targets unknown database {database_id}"),
            ));
        }
    }
    Ok(())
}

fn check_row(
    state: &State,
    properties: &IndexMap<String, PropertyKind>,
    row: &RowSpec,
) -> Result<(), RemoteError> {
    let op = RemoteOp::CreateRow;
    for (name, value) in &row.values {
        let Some(kind) = properties.get(name) else {
            return Err(validation(op, format!("{name} is not a property that exists")));
        };
        if *kind != value.kind() {
            return Err(validation(
                op,
                format!("{name} is expected to be {kind}, got {}", value.kind()),
            ));
        }
        if let PropertyValue::Relation(ids) = value
            && let Some(missing) = ids
                .iter()
                .find(|id| state.kind_of(id) != Some(ResourceKind::Row))
        {
            return Err(validation(op, format!("{name} references unknown row {missing}")));
        }
    }
    Ok(())
}

#[async_trait]
impl WorkspaceClient for InMemoryWorkspace {
    async fn list_children(
        &self,
        scope: &Handle,
        cursor: Option<&str>,
    ) -> Result<ChildListing, RemoteError> {
        let op = RemoteOp::ListChildren;
        self.begin(op)?;
        let offset = parse_cursor(op, cursor)?;

        let state = self.state.read().await;
        let node = state
            .nodes
            .get(&scope.id)
            .ok_or_else(|| RemoteError::not_found(op, &scope.id))?;
        let (ids, next_cursor) = paginate(&node.children, offset, self.options.listing_page_size);
        let entries = ids
            .iter()
            .filter_map(|id| state.nodes.get(id))
            .map(|n| n.child_entry())
            .collect();

        Ok(ChildListing {
            entries,
            next_cursor,
        })
    }

    async fn retrieve_schema(&self, database: &Handle) -> Result<LiveSchema, RemoteError> {
        let op = RemoteOp::RetrieveDatabase;
        self.begin(op)?;

        let state = self.state.read().await;
        match state.nodes.get(&database.id).map(|n| &n.body) {
            Some(NodeBody::Database { properties, .. }) => Ok(properties
                .iter()
                .map(|(name, kind)| (name.clone(), kind.clone()))
                .collect()),
            _ => Err(RemoteError::not_found(op, &database.id)),
        }
    }

    async fn query_rows(
        &self,
        database: &Handle,
        query: &RowQuery,
    ) -> Result<RowPage, RemoteError> {
        let op = RemoteOp::QueryDatabase;
        self.begin(op)?;
        let offset = parse_cursor(op, query.start_cursor.as_deref())?;
        let page_size = (query.page_size as usize).clamp(1, MAX_PAGE_SIZE);

        let state = self.state.read().await;
        let Some(NodeBody::Database { rows, .. }) = state.nodes.get(&database.id).map(|n| &n.body)
        else {
            return Err(RemoteError::not_found(op, &database.id));
        };
        let (ids, next_cursor) = paginate(rows, offset, page_size);

        Ok(RowPage {
            rows: ids.into_iter().map(Handle::row).collect(),
            total: self.options.report_totals.then_some(rows.len() as u64),
            next_cursor,
        })
    }

    async fn create_page(&self, parent: &Handle, spec: &PageSpec) -> Result<Handle, RemoteError> {
        let op = RemoteOp::CreatePage;
        self.begin(op)?;

        let mut state = self.state.write().await;
        require(&state, op, parent, ResourceKind::Page)?;

        let handle = Handle::page(Self::next_id());
        state.insert(
            Some(&parent.id),
            handle.clone(),
            NodeBody::Page {
                title: spec.title.clone(),
            },
        );
        Ok(handle)
    }

    async fn create_database(
        &self,
        parent: &Handle,
        spec: &DatabaseSpec,
    ) -> Result<Handle, RemoteError> {
        let op = RemoteOp::CreateDatabase;
        self.begin(op)?;

        let mut state = self.state.write().await;
        require(&state, op, parent, ResourceKind::Page)?;

        let titles = spec
            .schema
            .iter()
            .filter(|(_, d)| **d == PropertyDefinition::Title)
            .count();
        if titles != 1 {
            return Err(validation(
                op,
                format!("a database needs exactly one title property, got {titles}"),
            ));
        }
        check_relations(&state, op, &spec.schema)?;

        let handle = Handle::database(Self::next_id());
        state.insert(
            Some(&parent.id),
            handle.clone(),
            NodeBody::Database {
                title: spec.title.clone(),
                properties: spec
                    .schema
                    .iter()
                    .map(|(name, d)| (name.to_string(), d.kind()))
                    .collect(),
                definitions: spec
                    .schema
                    .iter()
                    .map(|(name, d)| (name.to_string(), d.clone()))
                    .collect(),
                rows: Vec::new(),
            },
        );
        Ok(handle)
    }

    async fn update_schema(
        &self,
        database: &Handle,
        properties: &Schema,
    ) -> Result<(), RemoteError> {
        let op = RemoteOp::UpdateDatabase;
        self.begin(op)?;

        let mut state = self.state.write().await;
        check_relations(&state, op, properties)?;

        let Some(NodeBody::Database {
            properties: live,
            definitions,
            ..
        }) = state.nodes.get_mut(&database.id).map(|n| &mut n.body)
        else {
            return Err(RemoteError::not_found(op, &database.id));
        };
        let live_title = live
            .iter()
            .find(|(_, kind)| **kind == PropertyKind::Title)
            .map(|(name, _)| name.clone());
        for (name, definition) in properties.iter() {
            if definition.kind() == PropertyKind::Title
                && let Some(existing) = &live_title
                && existing != name
            {
                return Err(validation(
                    op,
                    format!("{name} cannot be a title, {existing} is already the title property"),
                ));
            }
        }
        for (name, definition) in properties.iter() {
            live.insert(name.to_string(), definition.kind());
            definitions.insert(name.to_string(), definition.clone());
        }
        Ok(())
    }

    async fn create_row(&self, database: &Handle, row: &RowSpec) -> Result<Handle, RemoteError> {
        let op = RemoteOp::CreateRow;
        self.begin(op)?;

        let mut state = self.state.write().await;
        let Some(NodeBody::Database { properties, .. }) =
            state.nodes.get(&database.id).map(|n| &n.body)
        else {
            return Err(RemoteError::not_found(op, &database.id));
        };
        check_row(&state, properties, row)?;

        let handle = Handle::row(Self::next_id());
        state.insert(
            Some(&database.id),
            handle.clone(),
            NodeBody::Row {
                values: row.clone(),
            },
        );
        Ok(handle)
    }

    async fn append_blocks(&self, parent: &Handle, blocks: &[Block]) -> Result<(), RemoteError> {
        let op = RemoteOp::AppendBlocks;
        self.begin(op)?;

        let mut state = self.state.write().await;
        require(&state, op, parent, ResourceKind::Page)?;
        for block in blocks {
            if let Block::LinkToDatabase(id) = block
                && state.kind_of(id) != Some(ResourceKind::Database)
            {
                return Err(validation(op, format!("link target {id} is not a database")));
            }
        }

        for block in blocks {
            state.insert(
                Some(&parent.id),
                Handle::new(Self::next_id(), ResourceKind::Block),
                NodeBody::Block(block.clone()),
            );
        }
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
