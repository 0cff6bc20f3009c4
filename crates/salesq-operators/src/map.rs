//! Map operator: column renaming.

use salesq_core::prelude::Schema;
use salesq_core::types::{Column, RowBatch};

use crate::plan::OpPlan;
use crate::traits::{OpError, Operator};

#[derive(Debug, Default)]
pub struct Map {
    /// Column renames as (old, new) pairs; order preserved for determinism.
    pub renames: Vec<(String, String)>,
}

impl Map {
    fn renamed(&self, name: &str) -> Option<&str> {
        self.renames
            .iter()
            .find(|(old, _)| old == name)
            .map(|(_, new)| new.as_str())
    }
}

impl Operator for Map {
    fn name(&self) -> &'static str {
        "map"
    }

    fn plan(&self, input_schemas: &[Schema]) -> Result<OpPlan, OpError> {
        let mut schema = input_schemas
            .first()
            .ok_or_else(|| OpError::Plan("map expects one input".into()))?
            .clone();

        for field in &mut schema.fields {
            if let Some(new_name) = self.renamed(&field.name) {
                field.name = new_name.to_string();
            }
        }

        Ok(OpPlan::new(schema))
    }

    fn eval_batch(&self, inputs: &[RowBatch]) -> Result<RowBatch, OpError> {
        let input = inputs
            .first()
            .ok_or_else(|| OpError::Exec("missing input".into()))?;

        if self.renames.is_empty() {
            return Ok(input.clone());
        }

        let columns = input
            .columns
            .iter()
            .map(|col| Column {
                name: self
                    .renamed(&col.name)
                    .map(str::to_string)
                    .unwrap_or_else(|| col.name.clone()),
                values: col.values.clone(),
            })
            .collect();

        Ok(RowBatch { columns })
    }
}
