//! Conditional seeding of stores.

use crate::client::WorkspaceClient;
use crate::error::RemoteError;
use crate::types::{Handle, RowQuery, RowSpec};

/// Result of a seeding attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The store was empty; holds the new rows in sample order.
    Created(Vec<Handle>),
    /// The store already had rows; holds up to one existing row per sample,
    /// in remote order. Nothing was created.
    Existing(Vec<Handle>),
}

impl SeedOutcome {
    #[must_use]
    pub fn rows(&self) -> &[Handle] {
        match self {
            Self::Created(rows) | Self::Existing(rows) => rows,
        }
    }

    /// Number of rows created by this attempt.
    #[must_use]
    pub fn created_count(&self) -> usize {
        match self {
            Self::Created(rows) => rows.len(),
            Self::Existing(_) => 0,
        }
    }
}

/// Probes the row count of a store with a single one-row query.
///
/// Uses the reported total when the remote provides one. Otherwise the page
/// length stands in for the count, which can only tell "empty" from
/// "not empty".
pub async fn count_rows(client: &dyn WorkspaceClient, store: &Handle) -> Result<u64, RemoteError> {
    let page = client.query_rows(store, &RowQuery::first(1)).await?;
    Ok(page.total.unwrap_or(page.rows.len() as u64))
}

/// Fetches up to `limit` rows of a store in remote order.
pub async fn fetch_rows(
    client: &dyn WorkspaceClient,
    store: &Handle,
    limit: usize,
) -> Result<Vec<Handle>, RemoteError> {
    let mut rows = Vec::with_capacity(limit);
    if limit == 0 {
        return Ok(rows);
    }

    let page_size = u32::try_from(limit).unwrap_or(u32::MAX);
    let mut query = RowQuery::first(page_size);
    loop {
        let page = client.query_rows(store, &query).await?;
        rows.extend(page.rows);
        if rows.len() >= limit {
            rows.truncate(limit);
            break;
        }
        match page.next_cursor {
            Some(cursor) => query = RowQuery::first(page_size).after(cursor),
            None => break,
        }
    }
    Ok(rows)
}

/// Creates every sample row when `store` is empty.
///
/// When the store already has rows, nothing is created and up to
/// `samples.len()` existing rows are returned instead so dependent rows can
/// still be linked. Those rows are not necessarily the original samples.
pub async fn seed_if_empty(
    client: &dyn WorkspaceClient,
    store: &Handle,
    samples: &[RowSpec],
) -> Result<SeedOutcome, RemoteError> {
    let count = count_rows(client, store).await?;

    if count > 0 {
        let existing = fetch_rows(client, store, samples.len()).await?;
        tracing::info!(
            store = %store.id,
            count,
            linked = existing.len(),
            "Store already has rows, skipping seed"
        );
        return Ok(SeedOutcome::Existing(existing));
    }

    let mut created = Vec::with_capacity(samples.len());
    for row in samples {
        created.push(client.create_row(store, row).await?);
    }

    tracing::info!(store = %store.id, created = created.len(), "Seeded store");
    Ok(SeedOutcome::Created(created))
}
