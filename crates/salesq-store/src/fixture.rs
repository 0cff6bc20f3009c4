//! Deterministic fixture dataset used to validate both solver strategies.
//!
//! Four customers cover the interesting report cases: a mid-range age with a
//! large single order, one purchase of each item, the upper age boundary, and
//! an over-age customer that the report must exclude.

use tracing::info;

use salesq_core::model;
use salesq_core::types::Scalar;

use crate::error::Result;
use crate::store::Store;

fn i(v: i64) -> Scalar {
    Scalar::I64(v)
}

fn s(v: &str) -> Scalar {
    Scalar::Str(v.to_string())
}

/// Create the four tables and insert the fixed dataset.
///
/// Assumes a fresh target: fails with `StoreError::TableExists` if any of the
/// tables is already present. Flushes the store on success.
pub fn build_fixture(store: &mut Store) -> Result<()> {
    store.create_table(model::CUSTOMER, model::customer_schema())?;
    store.create_table(model::SALES, model::sales_schema())?;
    store.create_table(model::ITEMS, model::items_schema())?;
    store.create_table(model::ORDERS, model::orders_schema())?;

    store.insert_rows(
        model::ITEMS,
        vec![
            vec![i(1), s("x")],
            vec![i(2), s("y")],
            vec![i(3), s("z")],
        ],
    )?;

    // 21-year-old customer with a single order of quantity 10.
    store.insert_rows(model::CUSTOMER, vec![vec![i(1), i(21)]])?;
    store.insert_rows(model::SALES, vec![vec![i(101), i(1)]])?;
    store.insert_rows(model::ORDERS, vec![vec![i(1001), i(101), i(1), i(10)]])?;

    // 23-year-old customer with one purchase of each item.
    store.insert_rows(model::CUSTOMER, vec![vec![i(2), i(23)]])?;
    store.insert_rows(model::SALES, vec![vec![i(102), i(2)]])?;
    store.insert_rows(
        model::ORDERS,
        vec![
            vec![i(1002), i(102), i(1), i(1)],
            vec![i(1003), i(102), i(2), i(1)],
            vec![i(1004), i(102), i(3), i(1)],
        ],
    )?;

    // Customer on the upper age boundary (35 is still in range).
    store.insert_rows(model::CUSTOMER, vec![vec![i(3), i(35)]])?;
    store.insert_rows(model::SALES, vec![vec![i(103), i(3)]])?;
    store.insert_rows(model::ORDERS, vec![vec![i(1005), i(103), i(3), i(2)]])?;

    // Over-age customer; must be filtered out regardless of order volume.
    store.insert_rows(model::CUSTOMER, vec![vec![i(4), i(40)]])?;
    store.insert_rows(model::SALES, vec![vec![i(104), i(4)]])?;
    store.insert_rows(model::ORDERS, vec![vec![i(1006), i(104), i(1), i(5)]])?;

    store.flush()?;
    info!(path = %store.path().display(), "fixture database created");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;

    fn fresh_store(name: &str) -> Store {
        let dir = std::env::temp_dir().join("salesq_fixture_tests");
        let _ = std::fs::create_dir_all(&dir);
        let path = dir.join(format!("{}_{}.db", name, std::process::id()));
        let _ = std::fs::remove_file(&path);
        Store::open(path).unwrap()
    }

    #[test]
    fn fixture_populates_all_tables() {
        let mut store = fresh_store("populate");
        build_fixture(&mut store).unwrap();
        assert_eq!(store.scan(model::CUSTOMER).unwrap().num_rows(), 4);
        assert_eq!(store.scan(model::SALES).unwrap().num_rows(), 4);
        assert_eq!(store.scan(model::ITEMS).unwrap().num_rows(), 3);
        assert_eq!(store.scan(model::ORDERS).unwrap().num_rows(), 6);
        let _ = std::fs::remove_file(store.path());
    }

    #[test]
    fn fixture_fails_on_non_fresh_target() {
        let mut store = fresh_store("stale");
        build_fixture(&mut store).unwrap();
        let err = build_fixture(&mut store).unwrap_err();
        assert!(matches!(err, StoreError::TableExists(_)));
        let _ = std::fs::remove_file(store.path());
    }
}
