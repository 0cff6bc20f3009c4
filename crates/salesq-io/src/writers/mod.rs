//! Batch writers.

pub mod delimited;
