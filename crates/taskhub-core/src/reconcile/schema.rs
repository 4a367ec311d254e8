//! Schema reconciliation of a single store.

use crate::client::WorkspaceClient;
use crate::error::RemoteError;
use crate::schema::{Schema, SchemaDiff, diff_schema};
use crate::types::Handle;

/// Brings `store` up to `target` and returns the diff that was applied.
///
/// Reads the live schema, then sends every missing or kind-mismatched target
/// property in one batched update. An empty diff issues no write at all, so a
/// second call right after a successful one is read-only. Properties that are
/// not part of `target` are never touched.
pub async fn reconcile_schema(
    client: &dyn WorkspaceClient,
    store: &Handle,
    target: &Schema,
) -> Result<SchemaDiff, RemoteError> {
    let live = client.retrieve_schema(store).await?;
    let diff = diff_schema(&live, target);

    if diff.is_empty() {
        tracing::debug!(store = %store.id, properties = live.len(), "Schema already up to date");
        return Ok(diff);
    }

    client.update_schema(store, &diff.to_schema()).await?;

    tracing::info!(
        store = %store.id,
        changed = diff.len(),
        properties = ?diff.names().collect::<Vec<_>>(),
        "Schema reconciled"
    );

    Ok(diff)
}
