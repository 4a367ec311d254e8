//! In-memory workspace backend for the Task Hub engine.
//!
//! This crate provides an in-memory implementation of the `WorkspaceClient`
//! trait from `taskhub-core`. It mimics the parts of the Notion model the
//! engine relies on (child listings, store schemas, rows, appended blocks)
//! and counts every call so tests can assert on remote traffic.
//!
//! # Example
//!
//! ```ignore
//! use taskhub_core::{BootstrapOptions, RemoteOp, bootstrap};
//! use taskhub_memory::InMemoryWorkspace;
//!
//! let ws = InMemoryWorkspace::new();
//! let root = ws.insert_root("Root").await;
//! bootstrap(&ws, &root, BootstrapOptions::default()).await?;
//! assert_eq!(ws.stats().get(RemoteOp::CreateDatabase), 2);
//! ```

mod client_impl;
mod stats;
mod workspace;

// Re-export the WorkspaceClient trait for convenience
pub use taskhub_core::{RemoteError, WorkspaceClient};

pub use stats::CallStats;
pub use workspace::{InMemoryWorkspace, WorkspaceOptions};

