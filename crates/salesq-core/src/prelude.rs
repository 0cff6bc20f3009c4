//! Convenient re-exports for downstream crates.

pub use crate::config::ReportConfig;
pub use crate::error::{Error, Result};
pub use crate::hash::{hash_serde, Hash256};
pub use crate::id::OpId;
pub use crate::manifest::{ManifestId, RunManifest};
pub use crate::plan::{Aggregation, JoinType, LogicalPlan, PhysicalPlan};
pub use crate::schema::{DataType, Field, Schema};
pub use crate::types::{Column, RowBatch, Scalar};
