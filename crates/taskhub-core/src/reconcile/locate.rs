//! Child lookup by structural kind and display name.

use crate::client::WorkspaceClient;
use crate::error::RemoteError;
use crate::types::{Handle, ResourceKind};

/// Finds the first child of `scope` with the given kind and exact display name.
///
/// Walks the paginated listing until a match is found or the cursor runs out.
/// Lookup failures are returned as-is; nothing is retried.
pub async fn locate(
    client: &dyn WorkspaceClient,
    scope: &Handle,
    kind: ResourceKind,
    display_name: &str,
) -> Result<Option<Handle>, RemoteError> {
    let mut cursor: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let listing = client.list_children(scope, cursor.as_deref()).await?;
        pages += 1;

        if let Some(entry) = listing
            .entries
            .into_iter()
            .find(|entry| entry.handle.kind == kind && entry.title == display_name)
        {
            tracing::debug!(
                scope = %scope.id,
                kind = %kind,
                name = %display_name,
                id = %entry.handle.id,
                pages,
                "Located existing child"
            );
            return Ok(Some(entry.handle));
        }

        match listing.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    tracing::debug!(
        scope = %scope.id,
        kind = %kind,
        name = %display_name,
        pages,
        "No matching child"
    );
    Ok(None)
}
