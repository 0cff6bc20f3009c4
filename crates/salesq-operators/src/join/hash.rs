//! Inner hash join.
//!
//! Build side is the second input; probe side is the first. Rows with NULL
//! in any key column never match. When a right key column shares its name
//! with the left key it joins on, the duplicate is dropped from the output
//! (the usual merge-on-key shape for chained joins).

use std::collections::HashMap;

use salesq_core::prelude::Schema;
use salesq_core::types::{Column, RowBatch, Scalar};

use crate::key::RowKey;
use crate::plan::OpPlan;
use crate::traits::{OpError, Operator};

#[derive(Debug, Default)]
pub struct HashJoin {
    /// Equi-join keys as (left column, right column) pairs.
    pub on: Vec<(String, String)>,
}

impl HashJoin {
    /// Right-side columns that are redundant after the join: key columns
    /// whose name equals the left key they are matched against.
    fn dropped_right_columns(&self) -> Vec<&str> {
        self.on
            .iter()
            .filter(|(l, r)| l == r)
            .map(|(_, r)| r.as_str())
            .collect()
    }
}

impl Operator for HashJoin {
    fn name(&self) -> &'static str {
        "join_hash"
    }

    fn plan(&self, input_schemas: &[Schema]) -> Result<OpPlan, OpError> {
        if input_schemas.len() != 2 {
            return Err(OpError::Plan("hash join expects two inputs".into()));
        }
        if self.on.is_empty() {
            return Err(OpError::Plan("hash join requires at least one key".into()));
        }
        let left = &input_schemas[0];
        let right = &input_schemas[1];
        for (l, r) in &self.on {
            if left.index_of(l).is_none() {
                return Err(OpError::Plan(format!("left key '{}' not in schema", l)));
            }
            if right.index_of(r).is_none() {
                return Err(OpError::Plan(format!("right key '{}' not in schema", r)));
            }
        }

        let dropped = self.dropped_right_columns();
        let mut fields = left.fields.clone();
        for f in &right.fields {
            if !dropped.contains(&f.name.as_str()) {
                fields.push(f.clone());
            }
        }
        Ok(OpPlan::new(Schema::new(fields)))
    }

    fn eval_batch(&self, inputs: &[RowBatch]) -> Result<RowBatch, OpError> {
        if inputs.len() != 2 {
            return Err(OpError::Exec("hash join needs two inputs".into()));
        }
        let left = &inputs[0];
        let right = &inputs[1];

        let left_key_idx = key_indices(left, self.on.iter().map(|(l, _)| l.as_str()))?;
        let right_key_idx = key_indices(right, self.on.iter().map(|(_, r)| r.as_str()))?;

        // Build phase: right rows indexed by key.
        let mut table: HashMap<RowKey, Vec<usize>> = HashMap::new();
        for row in 0..right.num_rows() {
            let key_values: Vec<Scalar> = right_key_idx
                .iter()
                .map(|&ci| right.columns[ci].values[row].clone())
                .collect();
            if let Some(key) = RowKey::try_new(key_values) {
                table.entry(key).or_default().push(row);
            }
        }

        // Probe phase: collect matched (left_row, right_row) pairs in left order.
        let mut pairs: Vec<(usize, usize)> = Vec::new();
        for row in 0..left.num_rows() {
            let key_values: Vec<Scalar> = left_key_idx
                .iter()
                .map(|&ci| left.columns[ci].values[row].clone())
                .collect();
            if let Some(key) = RowKey::try_new(key_values) {
                if let Some(matches) = table.get(&key) {
                    for &r in matches {
                        pairs.push((row, r));
                    }
                }
            }
        }

        let dropped = self.dropped_right_columns();
        let mut columns = Vec::with_capacity(left.columns.len() + right.columns.len());
        for col in &left.columns {
            columns.push(Column {
                name: col.name.clone(),
                values: pairs.iter().map(|(l, _)| col.values[*l].clone()).collect(),
            });
        }
        for col in &right.columns {
            if dropped.contains(&col.name.as_str()) {
                continue;
            }
            columns.push(Column {
                name: col.name.clone(),
                values: pairs.iter().map(|(_, r)| col.values[*r].clone()).collect(),
            });
        }

        Ok(RowBatch { columns })
    }
}

fn key_indices<'a>(
    batch: &RowBatch,
    names: impl Iterator<Item = &'a str>,
) -> Result<Vec<usize>, OpError> {
    names
        .map(|name| {
            batch
                .column_index(name)
                .ok_or_else(|| OpError::Exec(format!("join key column '{}' not found", name)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn left() -> RowBatch {
        RowBatch {
            columns: vec![
                Column {
                    name: "customer_id".into(),
                    values: vec![Scalar::I64(1), Scalar::I64(2), Scalar::I64(3)],
                },
                Column {
                    name: "age".into(),
                    values: vec![Scalar::I64(21), Scalar::I64(23), Scalar::I64(35)],
                },
            ],
        }
    }

    fn right() -> RowBatch {
        RowBatch {
            columns: vec![
                Column {
                    name: "sales_id".into(),
                    values: vec![Scalar::I64(101), Scalar::I64(102), Scalar::I64(103)],
                },
                Column {
                    name: "customer_id".into(),
                    values: vec![Scalar::I64(1), Scalar::I64(2), Scalar::I64(9)],
                },
            ],
        }
    }

    #[test]
    fn inner_join_drops_unmatched_rows() {
        let join = HashJoin {
            on: vec![("customer_id".into(), "customer_id".into())],
        };
        let out = join.eval_batch(&[left(), right()]).unwrap();
        assert_eq!(out.num_rows(), 2);
        // duplicate right key column is dropped
        assert_eq!(out.column_names(), vec!["customer_id", "age", "sales_id"]);
        assert_eq!(
            out.column("sales_id").unwrap().values,
            vec![Scalar::I64(101), Scalar::I64(102)]
        );
    }

    #[test]
    fn one_to_many_fans_out() {
        let join = HashJoin {
            on: vec![("customer_id".into(), "customer_id".into())],
        };
        let mut r = right();
        r.columns[0].values.push(Scalar::I64(104));
        r.columns[1].values.push(Scalar::I64(2));
        let out = join.eval_batch(&[left(), r]).unwrap();
        assert_eq!(out.num_rows(), 3);
        let ids: Vec<_> = out.column("customer_id").unwrap().values.clone();
        assert_eq!(ids, vec![Scalar::I64(1), Scalar::I64(2), Scalar::I64(2)]);
    }

    #[test]
    fn null_keys_never_match() {
        let join = HashJoin {
            on: vec![("customer_id".into(), "customer_id".into())],
        };
        let mut l = left();
        l.columns[0].values[0] = Scalar::Null;
        let mut r = right();
        r.columns[1].values[0] = Scalar::Null;
        let out = join.eval_batch(&[l, r]).unwrap();
        assert_eq!(out.num_rows(), 1); // only customer 2 matches
    }

    #[test]
    fn plan_reports_merged_schema() {
        use salesq_core::schema::{DataType, Field, Schema};
        let join = HashJoin {
            on: vec![("customer_id".into(), "customer_id".into())],
        };
        let ls = Schema::new(vec![
            Field::new("customer_id", DataType::Int64, false),
            Field::new("age", DataType::Int64, false),
        ]);
        let rs = Schema::new(vec![
            Field::new("sales_id", DataType::Int64, false),
            Field::new("customer_id", DataType::Int64, false),
        ]);
        let plan = join.plan(&[ls, rs]).unwrap();
        let names: Vec<_> = plan
            .output_schema
            .fields
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["customer_id", "age", "sales_id"]);
    }
}
