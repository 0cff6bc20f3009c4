#![forbid(unsafe_code)]
//! salesq-operators: in-memory relational operators.
//!
//! Design intent:
//! - Pure and synchronous; batches are fully materialized (the datasets the
//!   pipeline handles are small).
//! - Each operator exposes a planning surface (`OpPlan`) with its output
//!   schema so the runtime can verify schema propagation ahead of evaluation.
//! - The relational-algebra solver drives these directly; the declarative
//!   solver reaches them through the exec runtime's operator bindings.

pub mod key;
pub mod plan;
pub mod traits;

pub mod aggregate;
pub mod filter;
pub mod map;
pub mod project;
pub mod sort;

pub mod join;

pub use plan::OpPlan;
pub use traits::{OpError, Operator};
