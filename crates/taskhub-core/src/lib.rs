//! # taskhub-core
//!
//! Idempotent provisioning engine for the Task Hub workspace.
//!
//! This crate owns the reconciliation logic and the types it speaks. It does not
//! talk HTTP itself: every remote call goes through the [`WorkspaceClient`]
//! trait, which is implemented by the Notion client in `taskhub-cli` and by the
//! in-memory workspace in `taskhub-memory`.
//!
//! ## Overview
//!
//! - [`reconcile::locate`] finds a child by kind and display name
//! - [`reconcile::ensure`] adopts an existing resource or creates it
//! - [`reconcile::reconcile_schema`] sends only missing or kind-mismatched properties
//! - [`reconcile::seed_if_empty`] seeds a store only while it is empty
//! - [`reconcile::append_info_blocks`] appends dashboard content (not idempotent)
//! - [`pipeline::bootstrap`] runs all of the above for the Task Hub layout
//!
//! ## Example
//!
//! ```ignore
//! use taskhub_core::{BootstrapOptions, DynWorkspace, Handle, bootstrap};
//!
//! async fn run(client: DynWorkspace, root_page: &str) -> Result<(), RemoteError> {
//!     let report = bootstrap(client.as_ref(), &Handle::page(root_page), BootstrapOptions::default()).await?;
//!     println!("created {} rows", report.rows_created());
//!     Ok(())
//! }
//! ```

pub mod blueprint;
mod client;
mod error;
pub mod pipeline;
pub mod reconcile;
pub mod schema;
mod types;

pub use client::WorkspaceClient;
pub use error::{ErrorCategory, RemoteError, RemoteOp};
pub use pipeline::{
    BootstrapOptions, BootstrapReport, PlanReport, PlannedAction, ResourcePlan, bootstrap, plan,
};
pub use schema::{
    ChangeReason, LiveSchema, NumberFormat, PropertyChange, PropertyDefinition, PropertyKind,
    Schema, SchemaDiff, diff_schema,
};
pub use types::{
    Block, ChildEntry, ChildListing, CreationSpec, DatabaseSpec, Handle, PageSpec,
    PropertyValue, ResourceKind, RowPage, RowQuery, RowSpec,
};

/// Type alias for a remote call result.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Type alias for a shared workspace client.
pub type DynWorkspace = std::sync::Arc<dyn WorkspaceClient>;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use taskhub_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::client::WorkspaceClient;
    pub use crate::error::{ErrorCategory, RemoteError, RemoteOp};
    pub use crate::reconcile::{
        ProvisionOutcome, Provisioned, SeedOutcome, append_info_blocks, ensure, locate,
        reconcile_schema, seed_if_empty,
    };
    pub use crate::schema::{
        LiveSchema, PropertyDefinition, PropertyKind, Schema, SchemaDiff, diff_schema,
    };
    pub use crate::types::{
        Block, ChildEntry, ChildListing, CreationSpec, DatabaseSpec, Handle, PageSpec,
        PropertyValue, ResourceKind, RowPage, RowQuery, RowSpec,
    };
    pub use crate::{DynWorkspace, RemoteResult};
}
