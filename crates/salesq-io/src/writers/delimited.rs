//! Delimited-text writer for row batches.
//!
//! Writes a header row from the column names, then one record per row. No
//! index column is emitted. The report export uses `;` as the delimiter.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::WriterBuilder;

use salesq_core::types::{RowBatch, Scalar};

use crate::error::Result;

pub struct DelimitedWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl DelimitedWriter<File> {
    pub fn to_path(path: impl AsRef<Path>, delimiter: u8) -> Result<Self> {
        let f = File::create(path)?;
        Ok(Self::to_writer(f, delimiter))
    }
}

impl<W: Write> DelimitedWriter<W> {
    pub fn to_writer(writer: W, delimiter: u8) -> Self {
        Self {
            writer: WriterBuilder::new().delimiter(delimiter).from_writer(writer),
        }
    }

    /// Write header + all rows of the batch, then flush.
    pub fn write_batch(&mut self, batch: &RowBatch) -> Result<()> {
        let header: Vec<&str> = batch.columns.iter().map(|c| c.name.as_str()).collect();
        self.writer.write_record(&header)?;

        for row in 0..batch.num_rows() {
            let record: Vec<String> = batch
                .columns
                .iter()
                .map(|c| render_scalar(&c.values[row]))
                .collect();
            self.writer.write_record(&record)?;
        }

        self.writer.flush()?;
        Ok(())
    }
}

fn render_scalar(v: &Scalar) -> String {
    match v {
        Scalar::Null => String::new(),
        Scalar::I64(i) => i.to_string(),
        Scalar::F64(f) => f.to_string(),
        Scalar::Str(s) => s.clone(),
    }
}
