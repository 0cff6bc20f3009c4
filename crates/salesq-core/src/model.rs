//! The relational model of the sales dataset.
//!
//! Four tables: Customer 1—N Sales 1—N Orders N—1 Items. Every Orders row
//! references an existing Sales and Items row; every Sales row references an
//! existing Customer. Rows are immutable once inserted.

use crate::schema::{DataType, Field, Schema};

pub const CUSTOMER: &str = "Customer";
pub const SALES: &str = "Sales";
pub const ITEMS: &str = "Items";
pub const ORDERS: &str = "Orders";

pub fn customer_schema() -> Schema {
    Schema::new(vec![
        Field::new("customer_id", DataType::Int64, false),
        Field::new("age", DataType::Int64, false),
    ])
}

pub fn sales_schema() -> Schema {
    Schema::new(vec![
        Field::new("sales_id", DataType::Int64, false),
        Field::new("customer_id", DataType::Int64, false),
    ])
}

pub fn items_schema() -> Schema {
    Schema::new(vec![
        Field::new("item_id", DataType::Int64, false),
        Field::new("item_name", DataType::Utf8, false),
    ])
}

pub fn orders_schema() -> Schema {
    Schema::new(vec![
        Field::new("order_id", DataType::Int64, false),
        Field::new("sales_id", DataType::Int64, false),
        Field::new("item_id", DataType::Int64, false),
        // quantity may be absent; missing values count as zero when summed
        Field::new("quantity", DataType::Int64, true),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_quantity_is_nullable() {
        for schema in [customer_schema(), sales_schema(), items_schema()] {
            assert!(schema.fields.iter().all(|f| !f.nullable));
        }
        let orders = orders_schema();
        for f in &orders.fields {
            assert_eq!(f.nullable, f.name == "quantity");
        }
    }
}
