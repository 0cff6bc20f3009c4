//! Sort operator: multi-key ascending sort.

use salesq_core::prelude::Schema;
use salesq_core::types::RowBatch;

use crate::plan::OpPlan;
use crate::traits::{OpError, Operator};

#[derive(Debug, Default)]
pub struct Sort {
    pub by: Vec<String>,
}

impl Operator for Sort {
    fn name(&self) -> &'static str {
        "sort"
    }

    fn plan(&self, input_schemas: &[Schema]) -> Result<OpPlan, OpError> {
        let schema = input_schemas
            .first()
            .ok_or_else(|| OpError::Plan("sort expects one input".into()))?
            .clone();
        for key in &self.by {
            if schema.index_of(key).is_none() {
                return Err(OpError::Plan(format!("sort key '{}' not in schema", key)));
            }
        }
        Ok(OpPlan::new(schema))
    }

    fn eval_batch(&self, inputs: &[RowBatch]) -> Result<RowBatch, OpError> {
        let mut batch = inputs
            .first()
            .ok_or_else(|| OpError::Exec("missing input".into()))?
            .clone();
        batch.sort_by_columns(&self.by).map_err(OpError::Exec)?;
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use salesq_core::types::{Column, Scalar};

    #[test]
    fn sorts_by_declared_keys() {
        let sort = Sort {
            by: vec!["Customer".into(), "Item".into()],
        };
        let batch = RowBatch {
            columns: vec![
                Column {
                    name: "Customer".into(),
                    values: vec![Scalar::I64(3), Scalar::I64(1), Scalar::I64(2)],
                },
                Column {
                    name: "Item".into(),
                    values: vec![
                        Scalar::Str("z".into()),
                        Scalar::Str("x".into()),
                        Scalar::Str("y".into()),
                    ],
                },
            ],
        };
        let out = sort.eval_batch(&[batch]).unwrap();
        assert_eq!(
            out.column("Customer").unwrap().values,
            vec![Scalar::I64(1), Scalar::I64(2), Scalar::I64(3)]
        );
    }
}
