//! Project operator: column subset/reorder.

use salesq_core::prelude::Schema;
use salesq_core::types::RowBatch;

use crate::plan::OpPlan;
use crate::traits::{OpError, Operator};

#[derive(Debug, Default)]
pub struct Project {
    pub columns: Vec<String>,
}

impl Operator for Project {
    fn name(&self) -> &'static str {
        "project"
    }

    fn plan(&self, input_schemas: &[Schema]) -> Result<OpPlan, OpError> {
        let input = input_schemas
            .first()
            .ok_or_else(|| OpError::Plan("project expects one input".into()))?;

        let fields = self
            .columns
            .iter()
            .map(|name| {
                input
                    .field_by_name(name)
                    .cloned()
                    .ok_or_else(|| OpError::Plan(format!("column '{}' not in schema", name)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(OpPlan::new(Schema::new(fields)))
    }

    fn eval_batch(&self, inputs: &[RowBatch]) -> Result<RowBatch, OpError> {
        let input = inputs
            .first()
            .ok_or_else(|| OpError::Exec("missing input".into()))?;

        let columns = self
            .columns
            .iter()
            .map(|name| {
                input
                    .column(name)
                    .cloned()
                    .ok_or_else(|| OpError::Exec(format!("column '{}' not found", name)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RowBatch { columns })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use salesq_core::types::{Column, Scalar};

    #[test]
    fn selects_and_reorders() {
        let project = Project {
            columns: vec!["b".into(), "a".into()],
        };
        let batch = RowBatch {
            columns: vec![
                Column {
                    name: "a".into(),
                    values: vec![Scalar::I64(1)],
                },
                Column {
                    name: "b".into(),
                    values: vec![Scalar::I64(2)],
                },
                Column {
                    name: "c".into(),
                    values: vec![Scalar::I64(3)],
                },
            ],
        };
        let out = project.eval_batch(&[batch]).unwrap();
        assert_eq!(out.column_names(), vec!["b", "a"]);
    }

    #[test]
    fn missing_column_is_an_error() {
        let project = Project {
            columns: vec!["nope".into()],
        };
        let batch = RowBatch { columns: vec![] };
        assert!(project.eval_batch(&[batch]).is_err());
    }
}
