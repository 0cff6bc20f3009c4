//! Single-file embedded store.
//!
//! `Store::open` loads the file if it exists; `flush` writes the whole
//! database back atomically (temp file + rename). Inserts are validated
//! against the table schema: arity, value types, and nullability.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use salesq_core::schema::{DataType, Schema};
use salesq_core::types::{Column, RowBatch, Scalar};

use crate::error::{Result, StoreError};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TableData {
    schema: Schema,
    rows: Vec<Vec<Scalar>>,
}

pub struct Store {
    path: PathBuf,
    // BTreeMap keeps the on-disk table order deterministic.
    tables: BTreeMap<String, TableData>,
}

impl Store {
    /// Open a store file, loading its tables if the file exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let tables = if path.exists() {
            let bytes = fs::read(&path)?;
            serde_json::from_slice(&bytes)?
        } else {
            BTreeMap::new()
        };
        debug!(path = %path.display(), tables = tables.len(), "opened store");
        Ok(Self { path, tables })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn table_names(&self) -> Vec<&str> {
        self.tables.keys().map(|s| s.as_str()).collect()
    }

    /// Create a table. Fails if a table of the same name already exists;
    /// the fixture builder assumes a fresh target.
    pub fn create_table(&mut self, name: &str, schema: Schema) -> Result<()> {
        if self.tables.contains_key(name) {
            return Err(StoreError::TableExists(name.to_string()));
        }
        debug!(table = name, fields = schema.fields.len(), "created table");
        self.tables.insert(
            name.to_string(),
            TableData {
                schema,
                rows: Vec::new(),
            },
        );
        Ok(())
    }

    /// Append rows to a table, validating each against the schema.
    pub fn insert_rows(&mut self, name: &str, rows: Vec<Vec<Scalar>>) -> Result<()> {
        let table = self
            .tables
            .get_mut(name)
            .ok_or_else(|| StoreError::UnknownTable(name.to_string()))?;

        for row in &rows {
            validate_row(name, &table.schema, row)?;
        }
        debug!(table = name, rows = rows.len(), "inserted rows");
        table.rows.extend(rows);
        Ok(())
    }

    pub fn schema(&self, name: &str) -> Result<&Schema> {
        self.tables
            .get(name)
            .map(|t| &t.schema)
            .ok_or_else(|| StoreError::UnknownTable(name.to_string()))
    }

    /// Materialize the full table as a column-oriented batch.
    pub fn scan(&self, name: &str) -> Result<RowBatch> {
        let table = self
            .tables
            .get(name)
            .ok_or_else(|| StoreError::UnknownTable(name.to_string()))?;

        let mut columns: Vec<Column> = table
            .schema
            .fields
            .iter()
            .map(|f| Column {
                name: f.name.clone(),
                values: Vec::with_capacity(table.rows.len()),
            })
            .collect();

        for row in &table.rows {
            for (col, value) in columns.iter_mut().zip(row.iter()) {
                col.values.push(value.clone());
            }
        }

        Ok(RowBatch { columns })
    }

    /// Persist the database atomically: write a temp file, then rename.
    pub fn flush(&self) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(&self.tables)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, &bytes)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), bytes = bytes.len(), "flushed store");
        Ok(())
    }
}

fn validate_row(table: &str, schema: &Schema, row: &[Scalar]) -> Result<()> {
    if row.len() != schema.fields.len() {
        return Err(StoreError::Schema(format!(
            "table '{}': expected {} values per row, got {}",
            table,
            schema.fields.len(),
            row.len()
        )));
    }
    for (field, value) in schema.fields.iter().zip(row.iter()) {
        match value.data_type() {
            None => {
                if !field.nullable {
                    return Err(StoreError::Schema(format!(
                        "table '{}': column '{}' is not nullable",
                        table, field.name
                    )));
                }
            }
            Some(dt) if dt == field.data_type => {}
            Some(dt) => {
                return Err(StoreError::Schema(format!(
                    "table '{}': column '{}' expects {:?}, got {:?}",
                    table, field.name, field.data_type, dt
                )));
            }
        }
    }
    Ok(())
}
