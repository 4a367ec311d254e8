//! Informational content on the dashboard.

use crate::client::WorkspaceClient;
use crate::error::RemoteError;
use crate::types::{Block, Handle};

/// Appends `blocks` to the end of `scope` in one call.
///
/// Not idempotent: every call adds another copy. There is no check for
/// blocks that are already present.
pub async fn append_info_blocks(
    client: &dyn WorkspaceClient,
    scope: &Handle,
    blocks: &[Block],
) -> Result<(), RemoteError> {
    if blocks.is_empty() {
        return Ok(());
    }
    client.append_blocks(scope, blocks).await?;
    tracing::info!(scope = %scope.id, blocks = blocks.len(), "Appended info blocks");
    Ok(())
}
