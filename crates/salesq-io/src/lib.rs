#![forbid(unsafe_code)]
//! salesq-io: writers for exporting report batches.

pub mod error;
pub mod writers;

pub use error::{IoError, Result};
pub use writers::delimited::DelimitedWriter;
