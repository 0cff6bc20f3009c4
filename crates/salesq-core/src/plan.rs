//! Logical and physical plan representations.
//!
//! The planner produces a `LogicalPlan` (what to compute), then a
//! `PhysicalPlan` that binds concrete operator instances by `OpId`.

use serde::{Deserialize, Serialize};

use crate::id::OpId;
use crate::schema::Schema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinType {
    Inner,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Aggregation {
    /// Sum of the named column; NULL contributes zero.
    Sum(String),
}

/// High-level logical nodes (scan → transforms).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LogicalPlan {
    Scan {
        table: String,
        schema: Schema,
    },
    Filter {
        input: Box<LogicalPlan>,
        /// Conjunction of `col OP literal` comparisons joined with `AND`.
        expr: String,
    },
    Join {
        left: Box<LogicalPlan>,
        right: Box<LogicalPlan>,
        on: Vec<(String, String)>,
        join_type: JoinType,
    },
    Aggregate {
        input: Box<LogicalPlan>,
        group_by: Vec<String>,
        agg: Aggregation,
    },
    Map {
        input: Box<LogicalPlan>,
        /// Column renames as (old, new) pairs.
        renames: Vec<(String, String)>,
    },
    Project {
        input: Box<LogicalPlan>,
        columns: Vec<String>,
    },
    Sort {
        input: Box<LogicalPlan>,
        by: Vec<String>,
    },
}

/// Physical nodes bind to operator IDs (resolved by the exec runtime).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PhysicalPlan {
    Source {
        op: OpId,
        schema: Schema,
    },
    Unary {
        op: OpId,
        input: Box<PhysicalPlan>,
        schema: Schema,
    },
    Binary {
        op: OpId,
        left: Box<PhysicalPlan>,
        right: Box<PhysicalPlan>,
        schema: Schema,
    },
}

impl LogicalPlan {
    /// Returns the number of inputs for this node.
    pub fn inputs(&self) -> usize {
        use LogicalPlan::*;
        match self {
            Scan { .. } => 0,
            Filter { .. } | Aggregate { .. } | Map { .. } | Project { .. } | Sort { .. } => 1,
            Join { .. } => 2,
        }
    }
}

impl PhysicalPlan {
    pub fn op(&self) -> OpId {
        use PhysicalPlan::*;
        match self {
            Source { op, .. } | Unary { op, .. } | Binary { op, .. } => *op,
        }
    }

    pub fn schema(&self) -> &Schema {
        use PhysicalPlan::*;
        match self {
            Source { schema, .. } | Unary { schema, .. } | Binary { schema, .. } => schema,
        }
    }
}
