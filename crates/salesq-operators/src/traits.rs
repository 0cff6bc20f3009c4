//! Operator trait + common error type.
//!
//! The exec runtime calls `plan(...)` to obtain an `OpPlan` (output schema),
//! then invokes `eval_batch(...)` bottom-up over the physical tree.

use salesq_core::prelude::Schema;
use salesq_core::types::RowBatch;

use crate::plan::OpPlan;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OpError {
    #[error("planning error: {0}")]
    Plan(String),

    #[error("execution error: {0}")]
    Exec(String),

    #[error("schema error: {0}")]
    Schema(String),
}

/// Trait that all operators must implement.
///
/// Invariants:
/// - `eval_batch` must be deterministic given the same inputs.
/// - The output of `eval_batch` must match the schema `plan` reported for
///   the same input schemas.
pub trait Operator {
    /// Human-readable operator name (stable).
    fn name(&self) -> &'static str;

    /// Given input schemas, return a concrete plan with the output schema.
    fn plan(&self, input_schemas: &[Schema]) -> Result<OpPlan, OpError>;

    /// Evaluate one batch of data.
    ///
    /// For unary ops, pass `inputs[0]`. For binary ops (joins), pass two
    /// inputs: probe side first, build side second.
    fn eval_batch(&self, inputs: &[RowBatch]) -> Result<RowBatch, OpError>;
}
