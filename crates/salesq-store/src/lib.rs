#![forbid(unsafe_code)]
//! salesq-store: a single-file embedded table store.
//!
//! The whole database lives in one JSON-encoded file: table schemas plus
//! row-oriented data. Tables are created once and rows are append-only;
//! nothing in the pipeline updates or deletes.

pub mod error;
pub mod fixture;
pub mod store;

pub use error::{Result, StoreError};
pub use fixture::build_fixture;
pub use store::Store;
