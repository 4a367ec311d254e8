use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, PoisonError};

use indexmap::IndexMap;
use taskhub_core::{
    Block, ChildEntry, Handle, LiveSchema, PropertyDefinition, PropertyKind, RemoteError,
    RemoteOp, ResourceKind, RowSpec,
};
use tokio::sync::RwLock;

use crate::stats::CallStats;

/// Behaviour switches for [`InMemoryWorkspace`].
#[derive(Debug, Clone, Copy)]
pub struct WorkspaceOptions {
    /// Maximum number of children returned per listing page.
    pub listing_page_size: usize,
    /// Whether row queries report a total count. The Notion API does not.
    pub report_totals: bool,
}

impl Default for WorkspaceOptions {
    fn default() -> Self {
        Self {
            listing_page_size: 100,
            report_totals: false,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) enum NodeBody {
    Page {
        title: String,
    },
    Database {
        title: String,
        properties: IndexMap<String, PropertyKind>,
        /// Definitions for properties created through the client. Stores
        /// inserted out of band only know their kinds.
        definitions: IndexMap<String, PropertyDefinition>,
        rows: Vec<String>,
    },
    Row {
        values: RowSpec,
    },
    Block(Block),
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) handle: Handle,
    pub(crate) body: NodeBody,
    pub(crate) children: Vec<String>,
}

impl Node {
    pub(crate) fn child_entry(&self) -> ChildEntry {
        let title = match &self.body {
            NodeBody::Page { title } | NodeBody::Database { title, .. } => title.clone(),
            NodeBody::Row { .. } | NodeBody::Block(_) => String::new(),
        };
        ChildEntry::new(self.handle.clone(), title)
    }
}

#[derive(Debug, Default)]
pub(crate) struct State {
    pub(crate) nodes: HashMap<String, Node>,
}

impl State {
    /// Inserts a node and links it under `parent`.
    ///
    /// Rows are linked into their store's row list instead of the child list.
    pub(crate) fn insert(&mut self, parent: Option<&str>, handle: Handle, body: NodeBody) {
        let id = handle.id.clone();
        if let Some(parent) = parent.and_then(|p| self.nodes.get_mut(p)) {
            match (&mut parent.body, handle.kind) {
                (NodeBody::Database { rows, .. }, ResourceKind::Row) => rows.push(id.clone()),
                _ => parent.children.push(id.clone()),
            }
        }
        self.nodes.insert(
            id,
            Node {
                handle,
                body,
                children: Vec::new(),
            },
        );
    }

    pub(crate) fn kind_of(&self, id: &str) -> Option<ResourceKind> {
        self.nodes.get(id).map(|n| n.handle.kind)
    }
}

/// In-memory stand-in for a remote workspace.
///
/// This workspace provides:
/// - Pages, stores, rows and blocks linked in a tree
/// - Cursor pagination for child listings and row queries
/// - Validation of row values and relation targets against store schemas
/// - Per-operation call statistics
/// - One-shot failure injection per operation
///
/// The `insert_*` helpers modify state out of band: they bypass validation
/// and are not counted in [`CallStats`].
#[derive(Debug)]
pub struct InMemoryWorkspace {
    pub(crate) state: RwLock<State>,
    pub(crate) stats: Mutex<CallStats>,
    faults: Mutex<HashSet<RemoteOp>>,
    pub(crate) options: WorkspaceOptions,
}

impl Default for InMemoryWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryWorkspace {
    /// Creates an empty workspace with default options.
    pub fn new() -> Self {
        Self::with_options(WorkspaceOptions::default())
    }

    /// Creates an empty workspace with the given options.
    pub fn with_options(options: WorkspaceOptions) -> Self {
        Self {
            state: RwLock::new(State::default()),
            stats: Mutex::new(CallStats::new()),
            faults: Mutex::new(HashSet::new()),
            options,
        }
    }

    pub(crate) fn next_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    /// Records a call of `op` and fails it if a fault was armed.
    pub(crate) fn begin(&self, op: RemoteOp) -> Result<(), RemoteError> {
        self.stats
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .record(op);
        let armed = self
            .faults
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&op);
        if armed {
            return Err(RemoteError::connection(op, "injected failure"));
        }
        Ok(())
    }

    /// Makes the next call of `op` fail with a connection error.
    pub fn fail_next(&self, op: RemoteOp) {
        self.faults
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(op);
    }

    /// Returns a snapshot of the call counters.
    pub fn stats(&self) -> CallStats {
        self.stats
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Clears the call counters.
    pub fn reset_stats(&self) {
        *self.stats.lock().unwrap_or_else(PoisonError::into_inner) = CallStats::new();
    }

    // ==================== Out-of-band setup ====================

    /// Adds a top-level page, e.g. the root scope shared with an integration.
    pub async fn insert_root(&self, title: &str) -> Handle {
        let handle = Handle::page(Self::next_id());
        let mut state = self.state.write().await;
        state.insert(
            None,
            handle.clone(),
            NodeBody::Page {
                title: title.to_string(),
            },
        );
        handle
    }

    /// Adds a page under `parent`.
    pub async fn insert_page(&self, parent: &Handle, title: &str) -> Handle {
        let handle = Handle::page(Self::next_id());
        let mut state = self.state.write().await;
        state.insert(
            Some(&parent.id),
            handle.clone(),
            NodeBody::Page {
                title: title.to_string(),
            },
        );
        handle
    }

    /// Adds a store under `parent` with the given property kinds.
    pub async fn insert_database(&self, parent: &Handle, title: &str, schema: LiveSchema) -> Handle {
        let handle = Handle::database(Self::next_id());
        let mut state = self.state.write().await;
        state.insert(
            Some(&parent.id),
            handle.clone(),
            NodeBody::Database {
                title: title.to_string(),
                properties: schema
                    .iter()
                    .map(|(name, kind)| (name.to_string(), kind.clone()))
                    .collect(),
                definitions: IndexMap::new(),
                rows: Vec::new(),
            },
        );
        handle
    }

    /// Adds a row to `database` without validating its values.
    pub async fn insert_row(&self, database: &Handle, values: RowSpec) -> Handle {
        let handle = Handle::row(Self::next_id());
        let mut state = self.state.write().await;
        state.insert(Some(&database.id), handle.clone(), NodeBody::Row { values });
        handle
    }

    // ==================== Inspection ====================

    /// Children of `scope` in insertion order.
    pub async fn children(&self, scope: &Handle) -> Vec<ChildEntry> {
        let state = self.state.read().await;
        let Some(node) = state.nodes.get(&scope.id) else {
            return Vec::new();
        };
        node.children
            .iter()
            .filter_map(|id| state.nodes.get(id))
            .map(Node::child_entry)
            .collect()
    }

    /// Children of `scope` with the given kind and title.
    pub async fn find_children(
        &self,
        scope: &Handle,
        kind: ResourceKind,
        title: &str,
    ) -> Vec<Handle> {
        self.children(scope)
            .await
            .into_iter()
            .filter(|c| c.handle.kind == kind && c.title == title)
            .map(|c| c.handle)
            .collect()
    }

    /// Content blocks appended to `page`, in order.
    pub async fn blocks(&self, page: &Handle) -> Vec<Block> {
        let state = self.state.read().await;
        let Some(node) = state.nodes.get(&page.id) else {
            return Vec::new();
        };
        node.children
            .iter()
            .filter_map(|id| match state.nodes.get(id).map(|n| &n.body) {
                Some(NodeBody::Block(block)) => Some(block.clone()),
                _ => None,
            })
            .collect()
    }

    /// Property kinds of `database`.
    pub async fn live_schema(&self, database: &Handle) -> Option<LiveSchema> {
        let state = self.state.read().await;
        match state.nodes.get(&database.id).map(|n| &n.body) {
            Some(NodeBody::Database { properties, .. }) => Some(
                properties
                    .iter()
                    .map(|(name, kind)| (name.clone(), kind.clone()))
                    .collect(),
            ),
            _ => None,
        }
    }

    /// Definition of one property of `database`, if it was set through the client.
    pub async fn definition(&self, database: &Handle, name: &str) -> Option<PropertyDefinition> {
        let state = self.state.read().await;
        match state.nodes.get(&database.id).map(|n| &n.body) {
            Some(NodeBody::Database { definitions, .. }) => definitions.get(name).cloned(),
            _ => None,
        }
    }

    /// Rows of `database` with their values, in creation order.
    pub async fn rows(&self, database: &Handle) -> Vec<(Handle, RowSpec)> {
        let state = self.state.read().await;
        let Some(NodeBody::Database { rows, .. }) = state.nodes.get(&database.id).map(|n| &n.body)
        else {
            return Vec::new();
        };
        rows.iter()
            .filter_map(|id| state.nodes.get(id))
            .filter_map(|node| match &node.body {
                NodeBody::Row { values } => Some((node.handle.clone(), values.clone())),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskhub_core::{PropertyKind, PropertyValue};

    #[tokio::test]
    async fn test_out_of_band_tree() {
        let ws = InMemoryWorkspace::new();
        let root = ws.insert_root("Root").await;
        let page = ws.insert_page(&root, "Child").await;
        let db = ws
            .insert_database(
                &root,
                "Store",
                LiveSchema::new().with("Name", PropertyKind::Title),
            )
            .await;
        ws.insert_row(
            &db,
            RowSpec::new().with("Name", PropertyValue::Title("r".into())),
        )
        .await;

        let children = ws.children(&root).await;
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].handle, page);
        assert_eq!(children[1].title, "Store");
        assert_eq!(ws.rows(&db).await.len(), 1);
        assert_eq!(ws.stats().total(), 0);
    }

    #[tokio::test]
    async fn test_fault_is_one_shot() {
        let ws = InMemoryWorkspace::new();
        ws.fail_next(RemoteOp::CreatePage);

        assert!(ws.begin(RemoteOp::CreatePage).is_err());
        assert!(ws.begin(RemoteOp::CreatePage).is_ok());
        assert_eq!(ws.stats().get(RemoteOp::CreatePage), 2);
    }
}
