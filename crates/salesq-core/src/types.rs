//! Scalar values and row batches flowing between operators.
//!
//! Batches are small and fully materialized; the pipeline is single-threaded
//! and synchronous, so there is no streaming or chunking layer.

use serde::{Deserialize, Serialize};

use crate::schema::DataType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Scalar {
    Null,
    I64(i64),
    F64(f64),
    Str(String),
}

impl Scalar {
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Scalar::Null => None,
            Scalar::I64(_) => Some(DataType::Int64),
            Scalar::F64(_) => Some(DataType::Float64),
            Scalar::Str(_) => Some(DataType::Utf8),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }
}

/// Named column of scalars. Row-aligned with its sibling columns in a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<Scalar>,
}

impl Column {
    pub fn len(&self) -> usize {
        self.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Fully materialized set of row-aligned columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowBatch {
    pub columns: Vec<Column>,
}

impl RowBatch {
    pub fn empty() -> Self {
        Self { columns: vec![] }
    }

    pub fn num_rows(&self) -> usize {
        self.columns.first().map(|c| c.len()).unwrap_or(0)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// One row as an owned scalar tuple, in column order.
    pub fn row(&self, idx: usize) -> Vec<Scalar> {
        self.columns
            .iter()
            .map(|c| c.values[idx].clone())
            .collect()
    }

    /// Sort rows by the specified columns (in order), ascending, nulls first.
    ///
    /// Creates a vector of (sort_key_tuple, original_index), sorts it,
    /// then reorders all columns accordingly.
    pub fn sort_by_columns(&mut self, sort_keys: &[String]) -> Result<(), String> {
        let key_indices: Vec<usize> = sort_keys
            .iter()
            .map(|key| {
                self.columns
                    .iter()
                    .position(|c| &c.name == key)
                    .ok_or_else(|| format!("sort key column '{}' not found", key))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let num_rows = self.num_rows();
        if num_rows == 0 {
            return Ok(());
        }

        let mut indices: Vec<(Vec<Scalar>, usize)> = (0..num_rows)
            .map(|row_idx| {
                let sort_tuple: Vec<Scalar> = key_indices
                    .iter()
                    .map(|&col_idx| self.columns[col_idx].values[row_idx].clone())
                    .collect();
                (sort_tuple, row_idx)
            })
            .collect();

        indices.sort_by(|(a, _), (b, _)| scalar_tuple_cmp(a, b));

        for col in &mut self.columns {
            let original = col.values.clone();
            col.values = indices
                .iter()
                .map(|(_, idx)| original[*idx].clone())
                .collect();
        }

        Ok(())
    }
}

/// Compare two scalar tuples lexicographically for sorting.
pub fn scalar_tuple_cmp(a: &[Scalar], b: &[Scalar]) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    for (x, y) in a.iter().zip(b.iter()) {
        match scalar_cmp(x, y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    a.len().cmp(&b.len())
}

/// Compare two scalars for sorting.
///
/// Nulls sort first; mixed types order by variant.
pub fn scalar_cmp(a: &Scalar, b: &Scalar) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    use Scalar::*;

    match (a, b) {
        (Null, Null) => Ordering::Equal,
        (Null, _) => Ordering::Less,
        (_, Null) => Ordering::Greater,
        (I64(x), I64(y)) => x.cmp(y),
        (F64(x), F64(y)) => {
            if x.is_nan() && y.is_nan() {
                Ordering::Equal
            } else if x.is_nan() {
                Ordering::Greater
            } else if y.is_nan() {
                Ordering::Less
            } else {
                x.partial_cmp(y).unwrap_or(Ordering::Equal)
            }
        }
        (Str(x), Str(y)) => x.cmp(y),
        _ => scalar_type_order(a).cmp(&scalar_type_order(b)),
    }
}

fn scalar_type_order(s: &Scalar) -> u8 {
    use Scalar::*;
    match s {
        Null => 0,
        I64(_) => 1,
        F64(_) => 2,
        Str(_) => 3,
    }
}
