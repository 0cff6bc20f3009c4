#![forbid(unsafe_code)]
//! salesq-exec: executes physical programs against the store and
//! cross-validates the two report solvers.

pub mod algebra;
pub mod compare;
pub mod query;
pub mod runtime;

pub use algebra::run_report_algebra;
pub use compare::{cross_validate, validate_and_export, Verdict};
pub use query::run_report_query;
pub use runtime::{Engine, ExecError};
