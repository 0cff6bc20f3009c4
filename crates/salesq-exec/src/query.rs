//! Declarative-query solver.
//!
//! Expresses the report once as a logical plan, optimizes and lowers it, and
//! executes it through the runtime engine.

use tracing::debug;

use salesq_core::manifest::RunManifest;
use salesq_core::types::RowBatch;

use salesq_planner::{lower_to_physical, report_plan, rules};
use salesq_store::Store;

use crate::runtime::{Engine, ExecError};

pub fn run_report_query(store: &Store) -> Result<(RowBatch, RunManifest), ExecError> {
    let plan = rules::optimize(report_plan());
    let program = lower_to_physical(&plan).map_err(|e| ExecError::Invalid(e.to_string()))?;
    let (batch, manifest) = Engine::new(store).run(&program)?;
    debug!(
        rows = batch.num_rows(),
        plan_hash = %manifest.plan_hash,
        "declarative solver finished"
    );
    Ok((batch, manifest))
}
