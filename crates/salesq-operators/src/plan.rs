//! Operator planning surface: `OpPlan`.

use salesq_core::prelude::Schema;
use serde::{Deserialize, Serialize};

/// Operator plan: the schema of the batches the operator will emit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpPlan {
    pub output_schema: Schema,
}

impl OpPlan {
    pub fn new(output_schema: Schema) -> Self {
        Self { output_schema }
    }
}
