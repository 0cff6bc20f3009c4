//! Filter operator with simple predicate evaluation.
//!
//! Supports conjunctions of comparisons joined with `AND`, each of the form
//! "col OP literal" where OP ∈ {==, !=, <, <=, >, >=}. NULL comparisons are
//! false, so a filter never keeps a row on the strength of a missing value.

use salesq_core::prelude::Schema;
use salesq_core::types::{Column, RowBatch, Scalar};

use crate::plan::OpPlan;
use crate::traits::{OpError, Operator};

#[derive(Debug, Default)]
pub struct Filter {
    /// Predicate expression: "col op literal [AND col op literal ...]"
    pub expr: Option<String>,
}

struct Comparison {
    column: String,
    op: String,
    literal: String,
}

impl Operator for Filter {
    fn name(&self) -> &'static str {
        "filter"
    }

    fn plan(&self, input_schemas: &[Schema]) -> Result<OpPlan, OpError> {
        let schema = input_schemas
            .first()
            .ok_or_else(|| OpError::Plan("filter expects one input".into()))?
            .clone();
        // Validate the expression shape early so bad predicates fail at plan time.
        if let Some(ref expr) = self.expr {
            for clause in parse_conjunction(expr)? {
                if schema.index_of(&clause.column).is_none() {
                    return Err(OpError::Plan(format!(
                        "filter column '{}' not in input schema",
                        clause.column
                    )));
                }
            }
        }
        Ok(OpPlan::new(schema))
    }

    fn eval_batch(&self, inputs: &[RowBatch]) -> Result<RowBatch, OpError> {
        let input = inputs
            .first()
            .ok_or_else(|| OpError::Exec("missing input".into()))?;

        let Some(ref expr) = self.expr else {
            return Ok(input.clone());
        };

        let clauses = parse_conjunction(expr)?;

        // Resolve clause columns once.
        let resolved: Vec<(usize, &Comparison)> = clauses
            .iter()
            .map(|c| {
                input
                    .column_index(&c.column)
                    .map(|idx| (idx, c))
                    .ok_or_else(|| OpError::Exec(format!("column '{}' not found", c.column)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut keep = vec![true; input.num_rows()];
        for (col_idx, clause) in &resolved {
            let col = &input.columns[*col_idx];
            for (i, val) in col.values.iter().enumerate() {
                if keep[i] {
                    keep[i] = eval_comparison(val, &clause.op, &clause.literal)?;
                }
            }
        }

        let mut filtered_cols = Vec::with_capacity(input.columns.len());
        for input_col in &input.columns {
            let values = input_col
                .values
                .iter()
                .enumerate()
                .filter(|(i, _)| keep[*i])
                .map(|(_, v)| v.clone())
                .collect();
            filtered_cols.push(Column {
                name: input_col.name.clone(),
                values,
            });
        }

        Ok(RowBatch {
            columns: filtered_cols,
        })
    }
}

/// Split "a >= 1 AND b < 2" into individual comparisons.
fn parse_conjunction(expr: &str) -> Result<Vec<Comparison>, OpError> {
    expr.split(" AND ").map(parse_comparison).collect()
}

/// Parse a single comparison like "age > 18" or "item_name == x".
fn parse_comparison(expr: &str) -> Result<Comparison, OpError> {
    let ops = ["==", "!=", "<=", ">=", "<", ">"];

    for op in &ops {
        if let Some(pos) = expr.find(op) {
            let column = expr[..pos].trim().to_string();
            let literal = expr[pos + op.len()..].trim().to_string();
            if column.is_empty() || literal.is_empty() {
                break;
            }
            return Ok(Comparison {
                column,
                op: op.to_string(),
                literal,
            });
        }
    }

    Err(OpError::Exec(format!("unparseable predicate: {}", expr)))
}

fn eval_comparison(val: &Scalar, op: &str, literal: &str) -> Result<bool, OpError> {
    use Scalar::*;

    match val {
        Null => Ok(false), // NULL comparisons are false
        I64(i) => {
            let lit = literal
                .parse::<i64>()
                .map_err(|_| OpError::Exec(format!("cannot parse '{}' as i64", literal)))?;
            Ok(match op {
                "==" => *i == lit,
                "!=" => *i != lit,
                "<" => *i < lit,
                "<=" => *i <= lit,
                ">" => *i > lit,
                ">=" => *i >= lit,
                _ => return Err(OpError::Exec(format!("unknown op: {}", op))),
            })
        }
        F64(f) => {
            let lit = literal
                .parse::<f64>()
                .map_err(|_| OpError::Exec(format!("cannot parse '{}' as f64", literal)))?;
            Ok(match op {
                "==" => (*f - lit).abs() < f64::EPSILON,
                "!=" => (*f - lit).abs() >= f64::EPSILON,
                "<" => *f < lit,
                "<=" => *f <= lit,
                ">" => *f > lit,
                ">=" => *f >= lit,
                _ => return Err(OpError::Exec(format!("unknown op: {}", op))),
            })
        }
        Str(s) => Ok(match op {
            "==" => s == literal,
            "!=" => s != literal,
            "<" => s.as_str() < literal,
            "<=" => s.as_str() <= literal,
            ">" => s.as_str() > literal,
            ">=" => s.as_str() >= literal,
            _ => return Err(OpError::Exec(format!("unknown op: {}", op))),
        }),
    }
}
