//! Relational-algebra solver.
//!
//! Computes the same report as the declarative solver, but by loading every
//! table fully and driving the operator implementations directly: three
//! chained inner joins, the age filter, a grouped sum with NULL counted as
//! zero, the nonzero filter, renames, and the canonical sort.

use tracing::debug;

use salesq_core::model;
use salesq_core::plan::Aggregation;
use salesq_core::types::RowBatch;

use salesq_operators::aggregate::Aggregate;
use salesq_operators::filter::Filter;
use salesq_operators::join::HashJoin;
use salesq_operators::map::Map;
use salesq_operators::project::Project;
use salesq_operators::sort::Sort;
use salesq_operators::traits::Operator;

use salesq_planner::report::{AGE_MAX, AGE_MIN, REPORT_COLUMNS, REPORT_SORT_KEYS};
use salesq_store::Store;

use crate::runtime::ExecError;

pub fn run_report_algebra(store: &Store) -> Result<RowBatch, ExecError> {
    let customers = store.scan(model::CUSTOMER)?;
    let sales = store.scan(model::SALES)?;
    let orders = store.scan(model::ORDERS)?;
    let items = store.scan(model::ITEMS)?;

    let join = |on: &str| HashJoin {
        on: vec![(on.to_string(), on.to_string())],
    };

    // Customer ⋈ Sales ⋈ Orders ⋈ Items
    let merged = join("customer_id").eval_batch(&[customers, sales])?;
    let merged = join("sales_id").eval_batch(&[merged, orders])?;
    let merged = join("item_id").eval_batch(&[merged, items])?;

    let in_age_range = Filter {
        expr: Some(format!("age >= {} AND age <= {}", AGE_MIN, AGE_MAX)),
    }
    .eval_batch(&[merged])?;

    let totals = Aggregate {
        group_by: vec!["customer_id".into(), "age".into(), "item_name".into()],
        agg: Aggregation::Sum("quantity".into()),
    }
    .eval_batch(&[in_age_range])?;

    let nonzero = Filter {
        expr: Some("quantity > 0".into()),
    }
    .eval_batch(&[totals])?;

    let renamed = Map {
        renames: vec![
            ("customer_id".into(), "Customer".into()),
            ("age".into(), "Age".into()),
            ("item_name".into(), "Item".into()),
            ("quantity".into(), "Quantity".into()),
        ],
    }
    .eval_batch(&[nonzero])?;

    let projected = Project {
        columns: REPORT_COLUMNS.iter().map(|s| s.to_string()).collect(),
    }
    .eval_batch(&[renamed])?;

    let sorted = Sort {
        by: REPORT_SORT_KEYS.iter().map(|s| s.to_string()).collect(),
    }
    .eval_batch(&[projected])?;

    debug!(rows = sorted.num_rows(), "algebra solver finished");
    Ok(sorted)
}
