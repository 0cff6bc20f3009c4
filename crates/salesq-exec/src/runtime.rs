//! Runtime: execute a `PhysicalProgram` against the store.
//!
//! - Instantiates operators from the program's bindings by key.
//! - Evaluates the physical tree bottom-up (single-threaded; the pipeline has
//!   no concurrency).
//! - Verifies each operator's planned output schema against the schema the
//!   planner recorded on the physical node.
//! - Emits a `RunManifest` with stable plan and result digests.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;
use tracing::trace;

use salesq_core::hash::{hash_serde, Hash256};
use salesq_core::manifest::RunManifest;
use salesq_core::plan::PhysicalPlan;
use salesq_core::prelude::Schema;
use salesq_core::types::RowBatch;

use salesq_operators::aggregate::Aggregate;
use salesq_operators::filter::Filter;
use salesq_operators::join::HashJoin;
use salesq_operators::map::Map;
use salesq_operators::plan::OpPlan;
use salesq_operators::project::Project;
use salesq_operators::sort::Sort;
use salesq_operators::traits::{OpError, Operator};

use salesq_planner::physical::PhysicalProgram;
use salesq_store::{Store, StoreError};

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("operator exec: {0}")]
    Operator(#[from] OpError),
    #[error("store: {0}")]
    Store(#[from] StoreError),
    #[error("export: {0}")]
    Export(#[from] salesq_io::IoError),
    #[error("invalid plan: {0}")]
    Invalid(String),
    #[error("hashing error: {0}")]
    Hash(String),
}

/// Engine borrows the store for the duration of a run; nothing is mutated.
pub struct Engine<'a> {
    store: &'a Store,
}

impl<'a> Engine<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Execute a prepared `PhysicalProgram` and return the result batch plus
    /// a manifest with plan/result digests.
    pub fn run(&self, program: &PhysicalProgram) -> Result<(RowBatch, RunManifest), ExecError> {
        let plan_hash = hash_serde(&program.plan).map_err(|e| ExecError::Hash(e.to_string()))?;
        let bindings_hash =
            hash_serde(&program.bindings).map_err(|e| ExecError::Hash(e.to_string()))?;
        let plan_hash = xor_hashes(plan_hash, bindings_hash);

        // Instantiate operator table keyed by OpId.
        let mut ops: HashMap<u64, Box<dyn Operator + 'a>> = HashMap::new();
        for (op_id, binding) in &program.bindings {
            let config = &binding.config;
            let inst: Box<dyn Operator + 'a> = match binding.key.as_str() {
                "scan" => {
                    let table = config
                        .get("table")
                        .and_then(|v| v.as_str())
                        .unwrap_or("")
                        .to_string();
                    Box::new(ScanOp {
                        store: self.store,
                        table,
                    })
                }
                "filter" => {
                    let mut op = Filter::default();
                    if let Some(expr) = config.get("expr").and_then(|v| v.as_str()) {
                        op.expr = Some(expr.to_string());
                    }
                    Box::new(op)
                }
                "join_hash" => {
                    let mut op = HashJoin::default();
                    if let Some(on) = config.get("on").and_then(|v| v.as_array()) {
                        op.on = on
                            .iter()
                            .filter_map(|v| {
                                let pair = v.as_array()?;
                                if pair.len() == 2 {
                                    Some((
                                        pair[0].as_str()?.to_string(),
                                        pair[1].as_str()?.to_string(),
                                    ))
                                } else {
                                    None
                                }
                            })
                            .collect();
                    }
                    Box::new(op)
                }
                "aggregate" => {
                    let group_by = config
                        .get("group_by")
                        .and_then(|v| v.as_array())
                        .map(|cols| {
                            cols.iter()
                                .filter_map(|v| v.as_str().map(|s| s.to_string()))
                                .collect()
                        })
                        .unwrap_or_default();
                    let agg = config
                        .get("agg")
                        .cloned()
                        .ok_or_else(|| ExecError::Invalid("aggregate without agg".into()))
                        .and_then(|v| {
                            serde_json::from_value(v)
                                .map_err(|e| ExecError::Invalid(e.to_string()))
                        })?;
                    Box::new(Aggregate { group_by, agg })
                }
                "map" => {
                    let mut op = Map::default();
                    if let Some(renames) = config.get("renames").and_then(|v| v.as_array()) {
                        op.renames = renames
                            .iter()
                            .filter_map(|v| {
                                let pair = v.as_array()?;
                                if pair.len() == 2 {
                                    Some((
                                        pair[0].as_str()?.to_string(),
                                        pair[1].as_str()?.to_string(),
                                    ))
                                } else {
                                    None
                                }
                            })
                            .collect();
                    }
                    Box::new(op)
                }
                "project" => {
                    let mut op = Project::default();
                    if let Some(cols) = config.get("columns").and_then(|v| v.as_array()) {
                        op.columns = cols
                            .iter()
                            .filter_map(|v| v.as_str().map(|s| s.to_string()))
                            .collect();
                    }
                    Box::new(op)
                }
                "sort" => {
                    let mut op = Sort::default();
                    if let Some(keys) = config.get("by").and_then(|v| v.as_array()) {
                        op.by = keys
                            .iter()
                            .filter_map(|v| v.as_str().map(|s| s.to_string()))
                            .collect();
                    }
                    Box::new(op)
                }
                other => {
                    return Err(ExecError::Invalid(format!(
                        "unknown operator key '{other}'"
                    )))
                }
            };
            ops.insert(op_id.get(), inst);
        }

        let now_ms = now_millis();
        let result = self.eval(&program.plan, &ops)?;
        let result_digest =
            hash_serde(&result).map_err(|e| ExecError::Hash(e.to_string()))?;

        let manifest =
            RunManifest::new(plan_hash, now_ms).finish(now_millis(), Some(result_digest));
        Ok((result, manifest))
    }

    fn eval(
        &self,
        node: &PhysicalPlan,
        ops: &HashMap<u64, Box<dyn Operator + 'a>>,
    ) -> Result<RowBatch, ExecError> {
        let op = ops
            .get(&node.op().get())
            .ok_or_else(|| ExecError::Invalid(format!("no operator bound for {}", node.op())))?;

        let (inputs, input_schemas): (Vec<RowBatch>, Vec<Schema>) = match node {
            PhysicalPlan::Source { .. } => (vec![], vec![]),
            PhysicalPlan::Unary { input, .. } => {
                let schema = input.schema().clone();
                (vec![self.eval(input, ops)?], vec![schema])
            }
            PhysicalPlan::Binary { left, right, .. } => {
                let schemas = vec![left.schema().clone(), right.schema().clone()];
                (
                    vec![self.eval(left, ops)?, self.eval(right, ops)?],
                    schemas,
                )
            }
        };

        // Schema propagation check: the operator's own plan must agree with
        // what the planner recorded on this node.
        let op_plan: OpPlan = op.plan(&input_schemas)?;
        if &op_plan.output_schema != node.schema() {
            return Err(ExecError::Invalid(format!(
                "schema mismatch at {} ({}): planner recorded {:?}, operator reports {:?}",
                node.op(),
                op.name(),
                node.schema(),
                op_plan.output_schema
            )));
        }

        let out = op.eval_batch(&inputs)?;
        trace!(op = %node.op(), name = op.name(), rows = out.num_rows(), "evaluated node");
        Ok(out)
    }
}

// --- helpers ---

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

fn xor_hashes(a: Hash256, b: Hash256) -> Hash256 {
    let mut out = [0u8; 32];
    for i in 0..32 {
        out[i] = a.0[i] ^ b.0[i];
    }
    Hash256(out)
}

// --- source operator bound to the store ---

struct ScanOp<'a> {
    store: &'a Store,
    table: String,
}

impl<'a> Operator for ScanOp<'a> {
    fn name(&self) -> &'static str {
        "scan"
    }

    fn plan(&self, _input_schemas: &[Schema]) -> Result<OpPlan, OpError> {
        let schema = self
            .store
            .schema(&self.table)
            .map_err(|e| OpError::Plan(e.to_string()))?;
        Ok(OpPlan::new(schema.clone()))
    }

    fn eval_batch(&self, _inputs: &[RowBatch]) -> Result<RowBatch, OpError> {
        self.store
            .scan(&self.table)
            .map_err(|e| OpError::Exec(e.to_string()))
    }
}
