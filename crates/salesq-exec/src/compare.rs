//! Cross-validation of the two solver results.
//!
//! Both batches are canonicalized (sorted by the report keys) and compared
//! exactly: column names, column order, row count, and every value including
//! its scalar type. A mismatch is a reported outcome, not a fault.

use std::path::Path;

use salesq_core::hash::{hash_serde, Hash256};
use salesq_core::types::RowBatch;
use salesq_io::DelimitedWriter;

use crate::runtime::ExecError;

#[derive(Debug, Clone)]
pub enum Verdict {
    Match {
        digest: Hash256,
    },
    Mismatch {
        reason: String,
        left_digest: Hash256,
        right_digest: Hash256,
    },
}

impl Verdict {
    pub fn is_match(&self) -> bool {
        matches!(self, Verdict::Match { .. })
    }
}

/// Sort both results by `sort_keys` and compare them exactly.
pub fn cross_validate(
    left: &RowBatch,
    right: &RowBatch,
    sort_keys: &[String],
) -> Result<Verdict, ExecError> {
    let left = canonicalize(left, sort_keys)?;
    let right = canonicalize(right, sort_keys)?;

    let left_digest = hash_serde(&left).map_err(|e| ExecError::Hash(e.to_string()))?;
    let right_digest = hash_serde(&right).map_err(|e| ExecError::Hash(e.to_string()))?;

    match first_difference(&left, &right) {
        None => Ok(Verdict::Match {
            digest: left_digest,
        }),
        Some(reason) => Ok(Verdict::Mismatch {
            reason,
            left_digest,
            right_digest,
        }),
    }
}

/// Cross-validate and export `left` as delimited text on agreement.
///
/// On a mismatch nothing is written; the output path is left untouched.
pub fn validate_and_export(
    left: &RowBatch,
    right: &RowBatch,
    sort_keys: &[String],
    output_path: impl AsRef<Path>,
    delimiter: u8,
) -> Result<Verdict, ExecError> {
    let verdict = cross_validate(left, right, sort_keys)?;
    if verdict.is_match() {
        DelimitedWriter::to_path(output_path, delimiter)?.write_batch(left)?;
    }
    Ok(verdict)
}

fn canonicalize(batch: &RowBatch, sort_keys: &[String]) -> Result<RowBatch, ExecError> {
    let mut batch = batch.clone();
    batch
        .sort_by_columns(sort_keys)
        .map_err(ExecError::Invalid)?;
    Ok(batch)
}

/// Describe the first point where the two batches diverge, if any.
fn first_difference(left: &RowBatch, right: &RowBatch) -> Option<String> {
    if left.columns.len() != right.columns.len() {
        return Some(format!(
            "column count differs: {} vs {}",
            left.columns.len(),
            right.columns.len()
        ));
    }
    for (l, r) in left.columns.iter().zip(right.columns.iter()) {
        if l.name != r.name {
            return Some(format!("column name differs: '{}' vs '{}'", l.name, r.name));
        }
    }
    if left.num_rows() != right.num_rows() {
        return Some(format!(
            "row count differs: {} vs {}",
            left.num_rows(),
            right.num_rows()
        ));
    }
    for (l, r) in left.columns.iter().zip(right.columns.iter()) {
        for (row, (lv, rv)) in l.values.iter().zip(r.values.iter()).enumerate() {
            // Scalar equality is type-sensitive: I64(1) != F64(1.0)
            if lv != rv {
                return Some(format!(
                    "column '{}' row {}: {:?} vs {:?}",
                    l.name, row, lv, rv
                ));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use salesq_core::types::{Column, Scalar};

    fn keys() -> Vec<String> {
        vec!["Customer".into(), "Item".into()]
    }

    fn batch(rows: &[(i64, &str, i64)]) -> RowBatch {
        RowBatch {
            columns: vec![
                Column {
                    name: "Customer".into(),
                    values: rows.iter().map(|(c, _, _)| Scalar::I64(*c)).collect(),
                },
                Column {
                    name: "Item".into(),
                    values: rows
                        .iter()
                        .map(|(_, i, _)| Scalar::Str(i.to_string()))
                        .collect(),
                },
                Column {
                    name: "Quantity".into(),
                    values: rows.iter().map(|(_, _, q)| Scalar::I64(*q)).collect(),
                },
            ],
        }
    }

    #[test]
    fn equal_up_to_ordering_matches() {
        let a = batch(&[(1, "x", 10), (2, "y", 1)]);
        let b = batch(&[(2, "y", 1), (1, "x", 10)]);
        let verdict = cross_validate(&a, &b, &keys()).unwrap();
        assert!(verdict.is_match());
    }

    #[test]
    fn differing_value_is_a_mismatch() {
        let a = batch(&[(1, "x", 10)]);
        let b = batch(&[(1, "x", 11)]);
        match cross_validate(&a, &b, &keys()).unwrap() {
            Verdict::Mismatch {
                reason,
                left_digest,
                right_digest,
            } => {
                assert!(reason.contains("Quantity"));
                assert_ne!(left_digest, right_digest);
            }
            Verdict::Match { .. } => panic!("expected mismatch"),
        }
    }

    #[test]
    fn dtype_difference_is_a_mismatch() {
        let a = batch(&[(1, "x", 10)]);
        let mut b = batch(&[(1, "x", 10)]);
        b.columns[2].values[0] = Scalar::F64(10.0);
        let verdict = cross_validate(&a, &b, &keys()).unwrap();
        assert!(!verdict.is_match());
    }

    fn scratch_out(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join("salesq_compare_tests");
        let _ = std::fs::create_dir_all(&dir);
        let path = dir.join(format!("{}_{}.csv", name, std::process::id()));
        let _ = std::fs::remove_file(&path);
        path
    }

    #[test]
    fn match_writes_the_output_file() {
        let a = batch(&[(1, "x", 10)]);
        let out = scratch_out("on_match");
        let verdict = validate_and_export(&a, &a.clone(), &keys(), &out, b';').unwrap();
        assert!(verdict.is_match());
        let content = std::fs::read_to_string(&out).unwrap();
        assert!(content.starts_with("Customer;Item;Quantity"));
        let _ = std::fs::remove_file(&out);
    }

    #[test]
    fn mismatch_leaves_no_output_file() {
        let a = batch(&[(1, "x", 10)]);
        let b = batch(&[(1, "x", 11)]);
        let out = scratch_out("on_mismatch");
        let verdict = validate_and_export(&a, &b, &keys(), &out, b';').unwrap();
        assert!(!verdict.is_match());
        assert!(!out.exists());
    }

    #[test]
    fn row_count_difference_is_reported() {
        let a = batch(&[(1, "x", 10), (2, "y", 1)]);
        let b = batch(&[(1, "x", 10)]);
        match cross_validate(&a, &b, &keys()).unwrap() {
            Verdict::Mismatch { reason, .. } => assert!(reason.contains("row count")),
            Verdict::Match { .. } => panic!("expected mismatch"),
        }
    }
}
