//! Find-or-create provisioning.

use std::fmt;

use super::locate::locate;
use crate::client::WorkspaceClient;
use crate::error::RemoteError;
use crate::types::{CreationSpec, Handle};

/// How a provisioned handle was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// A child with the same kind and name already existed and was adopted as-is.
    Adopted,
    /// Nothing matched, so the resource was created.
    Created,
}

impl fmt::Display for ProvisionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Adopted => write!(f, "adopted"),
            Self::Created => write!(f, "created"),
        }
    }
}

/// A handle together with how it was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provisioned {
    pub handle: Handle,
    pub outcome: ProvisionOutcome,
}

impl Provisioned {
    #[must_use]
    pub fn was_created(&self) -> bool {
        self.outcome == ProvisionOutcome::Created
    }
}

/// Returns the existing child of `scope` matching the spec's kind and title,
/// or creates it.
///
/// The spec is only used on the create path. An existing resource is adopted
/// unchanged even if its configuration differs from `spec`.
pub async fn ensure(
    client: &dyn WorkspaceClient,
    scope: &Handle,
    spec: &CreationSpec,
) -> Result<Provisioned, RemoteError> {
    if let Some(handle) = locate(client, scope, spec.kind(), spec.title()).await? {
        tracing::info!(
            scope = %scope.id,
            kind = %handle.kind,
            name = %spec.title(),
            id = %handle.id,
            "Adopted existing resource"
        );
        return Ok(Provisioned {
            handle,
            outcome: ProvisionOutcome::Adopted,
        });
    }

    let handle = match spec {
        CreationSpec::Page(page) => client.create_page(scope, page).await?,
        CreationSpec::Database(database) => client.create_database(scope, database).await?,
    };

    tracing::info!(
        scope = %scope.id,
        kind = %handle.kind,
        name = %spec.title(),
        id = %handle.id,
        "Created resource"
    );

    Ok(Provisioned {
        handle,
        outcome: ProvisionOutcome::Created,
    })
}
