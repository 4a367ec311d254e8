//! Reconciliation of remote workspace resources.
//!
//! Each step is safe to rerun after a partial failure, except
//! [`append_info_blocks`], which appends unconditionally:
//! - Locating children by kind and display name
//! - Find-or-create provisioning of pages and stores
//! - Kind-level schema reconciliation
//! - Seeding empty stores

mod content;
mod locate;
mod provision;
mod schema;
mod seed;

pub use content::append_info_blocks;
pub use locate::locate;
pub use provision::{ProvisionOutcome, Provisioned, ensure};
pub use schema::reconcile_schema;
pub use seed::{SeedOutcome, count_rows, fetch_rows, seed_if_empty};
