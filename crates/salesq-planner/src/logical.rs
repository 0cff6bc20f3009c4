//! Logical plan surface re-exported from core.
//!
//! We intentionally alias the core plan AST to avoid duplication/forking.

pub use salesq_core::plan::{Aggregation, JoinType, LogicalPlan};
pub use salesq_core::schema::{DataType, Field, Schema};
