#![forbid(unsafe_code)]
//! salesq-planner: the declarative side of the report.
//!
//! - `report` defines the purchase-quantity query as a `LogicalPlan`.
//! - `rules` applies lightweight plan rewrites.
//! - `lower` assigns `OpId`s and operator *keys* (strings; exec instantiates
//!   concrete operators from the bindings).
//!
//! We reuse `salesq-core::plan::{LogicalPlan, PhysicalPlan}` node enums and
//! deliberately avoid pulling operator implementations in here.

pub mod logical;
pub mod lower;
pub mod physical;
pub mod report;
pub mod rules;

pub use logical::{Aggregation, JoinType, LogicalPlan};
pub use lower::lower_to_physical;
pub use physical::{OperatorBinding, PhysicalProgram};
pub use report::{report_plan, AGE_MAX, AGE_MIN, REPORT_SORT_KEYS};
