//! Grouped aggregation.
//!
//! Groups by one or more columns and sums an integer column. NULL values in
//! the summed column contribute zero (the row still belongs to its group).
//! Rows with a NULL group key are excluded. Groups are emitted in first-seen
//! order; callers that need a canonical order sort afterwards.

use std::collections::HashMap;

use salesq_core::prelude::{Aggregation, Schema};
use salesq_core::schema::{DataType, Field};
use salesq_core::types::{Column, RowBatch, Scalar};

use crate::key::RowKey;
use crate::plan::OpPlan;
use crate::traits::{OpError, Operator};

#[derive(Debug)]
pub struct Aggregate {
    pub group_by: Vec<String>,
    pub agg: Aggregation,
}

impl Aggregate {
    fn sum_column(&self) -> &str {
        match &self.agg {
            Aggregation::Sum(col) => col,
        }
    }
}

impl Operator for Aggregate {
    fn name(&self) -> &'static str {
        "aggregate"
    }

    fn plan(&self, input_schemas: &[Schema]) -> Result<OpPlan, OpError> {
        let input = input_schemas
            .first()
            .ok_or_else(|| OpError::Plan("aggregate expects one input".into()))?;

        let mut fields = Vec::with_capacity(self.group_by.len() + 1);
        for name in &self.group_by {
            let field = input
                .field_by_name(name)
                .ok_or_else(|| OpError::Plan(format!("group key '{}' not in schema", name)))?;
            fields.push(field.clone());
        }
        let sum_col = self.sum_column();
        if input.index_of(sum_col).is_none() {
            return Err(OpError::Plan(format!(
                "sum column '{}' not in schema",
                sum_col
            )));
        }
        // The sum is always a concrete integer, even over a nullable input.
        fields.push(Field::new(sum_col, DataType::Int64, false));
        Ok(OpPlan::new(Schema::new(fields)))
    }

    fn eval_batch(&self, inputs: &[RowBatch]) -> Result<RowBatch, OpError> {
        let input = inputs
            .first()
            .ok_or_else(|| OpError::Exec("missing input".into()))?;

        let group_idx: Vec<usize> = self
            .group_by
            .iter()
            .map(|name| {
                input
                    .column_index(name)
                    .ok_or_else(|| OpError::Exec(format!("group key '{}' not found", name)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let sum_col = self.sum_column();
        let sum_idx = input
            .column_index(sum_col)
            .ok_or_else(|| OpError::Exec(format!("sum column '{}' not found", sum_col)))?;

        // First-seen group order; the map only holds positions into `groups`.
        let mut positions: HashMap<RowKey, usize> = HashMap::new();
        let mut groups: Vec<(RowKey, i64)> = Vec::new();

        for row in 0..input.num_rows() {
            let key_values: Vec<Scalar> = group_idx
                .iter()
                .map(|&ci| input.columns[ci].values[row].clone())
                .collect();
            let Some(key) = RowKey::try_new(key_values) else {
                continue;
            };

            let add = match &input.columns[sum_idx].values[row] {
                Scalar::Null => 0, // missing quantity counts as zero
                Scalar::I64(v) => *v,
                other => {
                    return Err(OpError::Exec(format!(
                        "cannot sum non-integer value {:?} in column '{}'",
                        other, sum_col
                    )))
                }
            };

            match positions.get(&key) {
                Some(&pos) => groups[pos].1 += add,
                None => {
                    positions.insert(key.clone(), groups.len());
                    groups.push((key, add));
                }
            }
        }

        let mut columns: Vec<Column> = self
            .group_by
            .iter()
            .map(|name| Column {
                name: name.clone(),
                values: Vec::with_capacity(groups.len()),
            })
            .collect();
        let mut sums = Column {
            name: sum_col.to_string(),
            values: Vec::with_capacity(groups.len()),
        };

        for (key, total) in groups {
            for (col, value) in columns.iter_mut().zip(key.into_values()) {
                col.values.push(value);
            }
            sums.values.push(Scalar::I64(total));
        }
        columns.push(sums);

        Ok(RowBatch { columns })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn purchases() -> RowBatch {
        RowBatch {
            columns: vec![
                Column {
                    name: "customer_id".into(),
                    values: vec![
                        Scalar::I64(2),
                        Scalar::I64(2),
                        Scalar::I64(1),
                        Scalar::I64(2),
                    ],
                },
                Column {
                    name: "item_name".into(),
                    values: vec![
                        Scalar::Str("x".into()),
                        Scalar::Str("x".into()),
                        Scalar::Str("y".into()),
                        Scalar::Str("z".into()),
                    ],
                },
                Column {
                    name: "quantity".into(),
                    values: vec![
                        Scalar::I64(1),
                        Scalar::Null,
                        Scalar::I64(4),
                        Scalar::I64(2),
                    ],
                },
            ],
        }
    }

    fn agg() -> Aggregate {
        Aggregate {
            group_by: vec!["customer_id".into(), "item_name".into()],
            agg: Aggregation::Sum("quantity".into()),
        }
    }

    #[test]
    fn sums_per_group_with_null_as_zero() {
        let out = agg().eval_batch(&[purchases()]).unwrap();
        assert_eq!(out.num_rows(), 3);
        // (2, x) appears first and sums 1 + NULL = 1
        assert_eq!(out.column("quantity").unwrap().values[0], Scalar::I64(1));
        assert_eq!(out.column("customer_id").unwrap().values[0], Scalar::I64(2));
    }

    #[test]
    fn all_null_group_sums_to_zero_not_dropped() {
        let batch = RowBatch {
            columns: vec![
                Column {
                    name: "customer_id".into(),
                    values: vec![Scalar::I64(7)],
                },
                Column {
                    name: "item_name".into(),
                    values: vec![Scalar::Str("x".into())],
                },
                Column {
                    name: "quantity".into(),
                    values: vec![Scalar::Null],
                },
            ],
        };
        let out = agg().eval_batch(&[batch]).unwrap();
        assert_eq!(out.num_rows(), 1);
        assert_eq!(out.column("quantity").unwrap().values[0], Scalar::I64(0));
    }

    #[test]
    fn plan_output_is_group_keys_plus_integer_sum() {
        use salesq_core::schema::{DataType, Field, Schema};
        let schema = Schema::new(vec![
            Field::new("customer_id", DataType::Int64, false),
            Field::new("item_name", DataType::Utf8, false),
            Field::new("quantity", DataType::Int64, true),
        ]);
        let plan = agg().plan(&[schema]).unwrap();
        let last = plan.output_schema.fields.last().unwrap();
        assert_eq!(last.name, "quantity");
        assert_eq!(last.data_type, DataType::Int64);
        assert!(!last.nullable);
    }
}
