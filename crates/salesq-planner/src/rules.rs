//! Simple optimization rules.

use crate::logical::LogicalPlan;

/// Apply a sequence of lightweight rewrites to the logical plan.
pub fn optimize(plan: LogicalPlan) -> LogicalPlan {
    fuse_filters(plan)
}

/// Fuse adjacent filters: Filter(Filter(x, a), b) → Filter(x, "a AND b").
///
/// Safe because filter predicates are pure conjunctions; fusing preserves
/// both result and evaluation order.
fn fuse_filters(plan: LogicalPlan) -> LogicalPlan {
    use LogicalPlan::*;

    match plan {
        Filter { input, expr } => {
            let input = fuse_filters(*input);
            match input {
                Filter {
                    input: inner,
                    expr: inner_expr,
                } => Filter {
                    input: inner,
                    expr: format!("{} AND {}", inner_expr, expr),
                },
                other => Filter {
                    input: Box::new(other),
                    expr,
                },
            }
        }
        Join {
            left,
            right,
            on,
            join_type,
        } => Join {
            left: Box::new(fuse_filters(*left)),
            right: Box::new(fuse_filters(*right)),
            on,
            join_type,
        },
        Aggregate {
            input,
            group_by,
            agg,
        } => Aggregate {
            input: Box::new(fuse_filters(*input)),
            group_by,
            agg,
        },
        Map { input, renames } => Map {
            input: Box::new(fuse_filters(*input)),
            renames,
        },
        Project { input, columns } => Project {
            input: Box::new(fuse_filters(*input)),
            columns,
        },
        Sort { input, by } => Sort {
            input: Box::new(fuse_filters(*input)),
            by,
        },
        Scan { .. } => plan,
    }
}
