#![forbid(unsafe_code)]
//! salesq: a sales reporting pipeline with two independent solvers.
//!
//! The workspace crates do the actual work; this facade re-exports the
//! public surface so integration tests and benchmarks can reach the whole
//! pipeline through one crate.

pub use salesq_core as core;
pub use salesq_exec as exec;
pub use salesq_io as io;
pub use salesq_operators as operators;
pub use salesq_planner as planner;
pub use salesq_store as store;
