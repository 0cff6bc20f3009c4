#![forbid(unsafe_code)]
//! salesq-core: shared vocabulary for the report pipeline.
//!
//! Pure data types only: scalar values and row batches, table schemas, the
//! logical/physical plan nodes, run manifests, and stable hashing. No IO and
//! no operator implementations live here.

pub mod config;
pub mod error;
pub mod hash;
pub mod id;
pub mod manifest;
pub mod model;
pub mod plan;
pub mod prelude;
pub mod schema;
pub mod types;

/// Crate version string recorded in run manifests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
