//! Pipeline configuration that downstream crates can serialize/deserialize.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Path of the single-file embedded database.
    pub db_path: String,

    /// Path of the delimited report written on successful cross-validation.
    pub output_path: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            db_path: "assessment_data.db".to_string(),
            output_path: "test_output.csv".to_string(),
        }
    }
}

impl ReportConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `SALESQ_DB_PATH`: database file path
    /// - `SALESQ_OUTPUT_PATH`: report output file path
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("SALESQ_DB_PATH") {
            cfg.db_path = s;
        }

        if let Ok(s) = std::env::var("SALESQ_OUTPUT_PATH") {
            cfg.output_path = s;
        }

        cfg
    }
}
