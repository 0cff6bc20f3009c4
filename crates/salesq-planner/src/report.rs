//! The purchase-quantity report expressed as one logical plan.
//!
//! Per-customer per-item total quantity for customers aged 18..=35, with
//! zero-total groups discarded and NULL quantities counted as zero, sorted by
//! customer then item name. Output columns: Customer, Age, Item, Quantity.

use salesq_core::model;
use salesq_core::plan::{Aggregation, JoinType, LogicalPlan};

/// Inclusive age range of the report.
pub const AGE_MIN: i64 = 18;
pub const AGE_MAX: i64 = 35;

/// Canonical ordering of the report output.
pub const REPORT_SORT_KEYS: [&str; 2] = ["Customer", "Item"];

/// Output column names in order.
pub const REPORT_COLUMNS: [&str; 4] = ["Customer", "Age", "Item", "Quantity"];

/// Build the report query: Customer ⋈ Sales ⋈ Orders ⋈ Items, age filter,
/// grouped sum, nonzero filter, renames, canonical sort.
pub fn report_plan() -> LogicalPlan {
    let scan = |table: &str, schema| LogicalPlan::Scan {
        table: table.to_string(),
        schema,
    };

    let joined = LogicalPlan::Join {
        left: Box::new(LogicalPlan::Join {
            left: Box::new(LogicalPlan::Join {
                left: Box::new(scan(model::CUSTOMER, model::customer_schema())),
                right: Box::new(scan(model::SALES, model::sales_schema())),
                on: vec![("customer_id".into(), "customer_id".into())],
                join_type: JoinType::Inner,
            }),
            right: Box::new(scan(model::ORDERS, model::orders_schema())),
            on: vec![("sales_id".into(), "sales_id".into())],
            join_type: JoinType::Inner,
        }),
        right: Box::new(scan(model::ITEMS, model::items_schema())),
        on: vec![("item_id".into(), "item_id".into())],
        join_type: JoinType::Inner,
    };

    let in_age_range = LogicalPlan::Filter {
        input: Box::new(joined),
        expr: format!("age >= {} AND age <= {}", AGE_MIN, AGE_MAX),
    };

    let totals = LogicalPlan::Aggregate {
        input: Box::new(in_age_range),
        group_by: vec!["customer_id".into(), "age".into(), "item_name".into()],
        agg: Aggregation::Sum("quantity".into()),
    };

    let nonzero = LogicalPlan::Filter {
        input: Box::new(totals),
        expr: "quantity > 0".into(),
    };

    let renamed = LogicalPlan::Map {
        input: Box::new(nonzero),
        renames: vec![
            ("customer_id".into(), "Customer".into()),
            ("age".into(), "Age".into()),
            ("item_name".into(), "Item".into()),
            ("quantity".into(), "Quantity".into()),
        ],
    };

    let projected = LogicalPlan::Project {
        input: Box::new(renamed),
        columns: REPORT_COLUMNS.iter().map(|s| s.to_string()).collect(),
    };

    LogicalPlan::Sort {
        input: Box::new(projected),
        by: REPORT_SORT_KEYS.iter().map(|s| s.to_string()).collect(),
    }
}
