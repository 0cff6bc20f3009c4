//! Lowering: logical plan → physical tree + operator bindings.
//!
//! Assigns an `OpId` per node, records the operator key and its JSON config,
//! and propagates output schemas bottom-up so the runtime can verify them.

use std::collections::BTreeMap;

use serde_json::json;

use salesq_core::error::{Error, Result};
use salesq_core::id::OpId;
use salesq_core::plan::{Aggregation, LogicalPlan, PhysicalPlan};
use salesq_core::schema::{DataType, Field, Schema};

use crate::physical::{OperatorBinding, PhysicalProgram};

pub fn lower_to_physical(plan: &LogicalPlan) -> Result<PhysicalProgram> {
    let mut lowering = Lowering::default();
    let tree = lowering.lower(plan)?;
    Ok(PhysicalProgram::new(tree, lowering.bindings))
}

#[derive(Default)]
struct Lowering {
    next_op: u64,
    bindings: BTreeMap<OpId, OperatorBinding>,
}

impl Lowering {
    fn bind(&mut self, key: &str, config: serde_json::Value) -> OpId {
        let op = OpId::new(self.next_op);
        self.next_op += 1;
        self.bindings.insert(
            op,
            OperatorBinding {
                key: key.to_string(),
                config,
            },
        );
        op
    }

    fn lower(&mut self, plan: &LogicalPlan) -> Result<PhysicalPlan> {
        match plan {
            LogicalPlan::Scan { table, schema } => {
                let op = self.bind("scan", json!({ "table": table }));
                Ok(PhysicalPlan::Source {
                    op,
                    schema: schema.clone(),
                })
            }
            LogicalPlan::Filter { input, expr } => {
                let child = self.lower(input)?;
                let schema = child.schema().clone();
                let op = self.bind("filter", json!({ "expr": expr }));
                Ok(PhysicalPlan::Unary {
                    op,
                    input: Box::new(child),
                    schema,
                })
            }
            LogicalPlan::Join {
                left, right, on, ..
            } => {
                let l = self.lower(left)?;
                let r = self.lower(right)?;
                let schema = join_schema(l.schema(), r.schema(), on);
                let on_json: Vec<_> = on.iter().map(|(a, b)| json!([a, b])).collect();
                let op = self.bind("join_hash", json!({ "on": on_json, "join_type": "inner" }));
                Ok(PhysicalPlan::Binary {
                    op,
                    left: Box::new(l),
                    right: Box::new(r),
                    schema,
                })
            }
            LogicalPlan::Aggregate {
                input,
                group_by,
                agg,
            } => {
                let child = self.lower(input)?;
                let schema = aggregate_schema(child.schema(), group_by, agg)?;
                let op = self.bind(
                    "aggregate",
                    json!({ "group_by": group_by, "agg": agg }),
                );
                Ok(PhysicalPlan::Unary {
                    op,
                    input: Box::new(child),
                    schema,
                })
            }
            LogicalPlan::Map { input, renames } => {
                let child = self.lower(input)?;
                let mut schema = child.schema().clone();
                for field in &mut schema.fields {
                    if let Some((_, new)) = renames.iter().find(|(old, _)| old == &field.name) {
                        field.name = new.clone();
                    }
                }
                let renames_json: Vec<_> =
                    renames.iter().map(|(a, b)| json!([a, b])).collect();
                let op = self.bind("map", json!({ "renames": renames_json }));
                Ok(PhysicalPlan::Unary {
                    op,
                    input: Box::new(child),
                    schema,
                })
            }
            LogicalPlan::Project { input, columns } => {
                let child = self.lower(input)?;
                let fields = columns
                    .iter()
                    .map(|name| {
                        child
                            .schema()
                            .field_by_name(name)
                            .cloned()
                            .ok_or_else(|| {
                                Error::Plan(format!("project column '{}' not in schema", name))
                            })
                    })
                    .collect::<Result<Vec<_>>>()?;
                let op = self.bind("project", json!({ "columns": columns }));
                Ok(PhysicalPlan::Unary {
                    op,
                    input: Box::new(child),
                    schema: Schema::new(fields),
                })
            }
            LogicalPlan::Sort { input, by } => {
                let child = self.lower(input)?;
                let schema = child.schema().clone();
                let op = self.bind("sort", json!({ "by": by }));
                Ok(PhysicalPlan::Unary {
                    op,
                    input: Box::new(child),
                    schema,
                })
            }
        }
    }
}

/// Join output schema: left fields, then right fields minus the key columns
/// that duplicate a left key of the same name.
fn join_schema(left: &Schema, right: &Schema, on: &[(String, String)]) -> Schema {
    let dropped: Vec<&str> = on
        .iter()
        .filter(|(l, r)| l == r)
        .map(|(_, r)| r.as_str())
        .collect();
    let mut fields = left.fields.clone();
    for f in &right.fields {
        if !dropped.contains(&f.name.as_str()) {
            fields.push(f.clone());
        }
    }
    Schema::new(fields)
}

fn aggregate_schema(input: &Schema, group_by: &[String], agg: &Aggregation) -> Result<Schema> {
    let mut fields = Vec::with_capacity(group_by.len() + 1);
    for name in group_by {
        let field = input
            .field_by_name(name)
            .cloned()
            .ok_or_else(|| Error::Plan(format!("group key '{}' not in schema", name)))?;
        fields.push(field);
    }
    let Aggregation::Sum(col) = agg;
    if input.index_of(col).is_none() {
        return Err(Error::Plan(format!("sum column '{}' not in schema", col)));
    }
    fields.push(Field::new(col.clone(), DataType::Int64, false));
    Ok(Schema::new(fields))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::report_plan;
    use crate::rules::optimize;

    #[test]
    fn report_plan_lowers_with_one_binding_per_node() {
        let program = lower_to_physical(&optimize(report_plan())).unwrap();
        // 4 scans + 3 joins + 2 filters + aggregate + map + project + sort
        assert_eq!(program.bindings.len(), 13);

        let mut keys: Vec<&str> = program.bindings.values().map(|b| b.key.as_str()).collect();
        keys.sort();
        assert_eq!(keys.iter().filter(|k| **k == "scan").count(), 4);
        assert_eq!(keys.iter().filter(|k| **k == "join_hash").count(), 3);
        assert_eq!(keys.iter().filter(|k| **k == "filter").count(), 2);
    }

    #[test]
    fn root_schema_is_the_report_shape() {
        let program = lower_to_physical(&report_plan()).unwrap();
        let names: Vec<_> = program
            .plan
            .schema()
            .fields
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["Customer", "Age", "Item", "Quantity"]);
    }

    #[test]
    fn join_schema_drops_duplicate_right_key() {
        use salesq_core::model;
        let schema = join_schema(
            &model::customer_schema(),
            &model::sales_schema(),
            &[("customer_id".into(), "customer_id".into())],
        );
        let names: Vec<_> = schema.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["customer_id", "age", "sales_id"]);
    }
}
