//! The capability set the engine needs from a remote workspace.

use async_trait::async_trait;

use crate::error::RemoteError;
use crate::schema::{LiveSchema, Schema};
use crate::types::{
    Block, ChildListing, DatabaseSpec, Handle, PageSpec, RowPage, RowQuery, RowSpec,
};

/// A remote collaborative workspace.
///
/// Every call is a single request with at-least-once semantics; there are no
/// transactions spanning calls. Implementations must be `Send + Sync` so a
/// single client can be shared as a [`DynWorkspace`](crate::DynWorkspace).
///
/// # Example
///
/// ```ignore
/// use taskhub_core::{Handle, ResourceKind, WorkspaceClient};
///
/// async fn first_child(client: &dyn WorkspaceClient, scope: &Handle) -> Option<Handle> {
///     let listing = client.list_children(scope, None).await.ok()?;
///     listing.entries.into_iter().next().map(|e| e.handle)
/// }
/// ```
#[async_trait]
pub trait WorkspaceClient: Send + Sync {
    // ==================== Lookups ====================

    /// Lists one page of the children of `scope`.
    ///
    /// Pass the `next_cursor` of the previous page to continue.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::NotFound` if the scope does not exist.
    async fn list_children(
        &self,
        scope: &Handle,
        cursor: Option<&str>,
    ) -> Result<ChildListing, RemoteError>;

    /// Reads the property kinds of a store.
    async fn retrieve_schema(&self, database: &Handle) -> Result<LiveSchema, RemoteError>;

    /// Queries one page of rows of a store in remote order.
    async fn query_rows(&self, database: &Handle, query: &RowQuery)
    -> Result<RowPage, RemoteError>;

    // ==================== Writes ====================

    /// Creates a page under `parent`.
    async fn create_page(&self, parent: &Handle, spec: &PageSpec) -> Result<Handle, RemoteError>;

    /// Creates a store under `parent`.
    async fn create_database(
        &self,
        parent: &Handle,
        spec: &DatabaseSpec,
    ) -> Result<Handle, RemoteError>;

    /// Sends property definitions to a store in one batch.
    ///
    /// Named properties are added or replaced; others are left alone.
    async fn update_schema(&self, database: &Handle, properties: &Schema)
    -> Result<(), RemoteError>;

    /// Creates a row in a store.
    async fn create_row(&self, database: &Handle, row: &RowSpec) -> Result<Handle, RemoteError>;

    /// Appends content blocks to the end of a page.
    async fn append_blocks(&self, parent: &Handle, blocks: &[Block]) -> Result<(), RemoteError>;

    /// Returns the name of this client for logging.
    fn backend_name(&self) -> &'static str;
}
