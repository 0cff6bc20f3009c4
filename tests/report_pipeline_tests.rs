//! End-to-end pipeline tests: fixture dataset through both solvers,
//! cross-validation, and the delimited export.


use std::fs;

use salesq_exec::{cross_validate, run_report_algebra, run_report_query, validate_and_export};
use salesq_io::DelimitedWriter;
use salesq_planner::REPORT_SORT_KEYS;
use test_support::{fixture_store, report_rows, temp_out_path};

fn sort_keys() -> Vec<String> {
    REPORT_SORT_KEYS.iter().map(|s| s.to_string()).collect()
}

#[test]
fn query_solver_produces_expected_report() {
    let store = fixture_store("query_solver_expected");
    let (batch, manifest) = run_report_query(&store).unwrap();

    assert_eq!(
        report_rows(&batch),
        vec![
            (1, 21, "x".to_string(), 10),
            (2, 23, "x".to_string(), 1),
            (2, 23, "y".to_string(), 1),
            (2, 23, "z".to_string(), 1),
            (3, 35, "z".to_string(), 2),
        ]
    );
    assert!(manifest.result_digest.is_some());
    assert!(manifest.finished_ms >= manifest.started_ms);
}

#[test]
fn algebra_solver_produces_expected_report() {
    let store = fixture_store("algebra_solver_expected");
    let batch = run_report_algebra(&store).unwrap();

    assert_eq!(
        report_rows(&batch),
        vec![
            (1, 21, "x".to_string(), 10),
            (2, 23, "x".to_string(), 1),
            (2, 23, "y".to_string(), 1),
            (2, 23, "z".to_string(), 1),
            (3, 35, "z".to_string(), 2),
        ]
    );
}

#[test]
fn customer_outside_age_range_is_excluded() {
    // Customer 4 is 40 and buys item 1; no row for them may appear.
    let store = fixture_store("age_range_exclusion");
    let (batch, _) = run_report_query(&store).unwrap();

    for (customer, age, _, _) in report_rows(&batch) {
        assert_ne!(customer, 4);
        assert!((18..=35).contains(&age));
    }
}

#[test]
fn solvers_agree_on_fixture() {
    let store = fixture_store("solvers_agree_fixture");
    let (query_batch, _) = run_report_query(&store).unwrap();
    let algebra_batch = run_report_algebra(&store).unwrap();

    let verdict = cross_validate(&query_batch, &algebra_batch, &sort_keys()).unwrap();
    assert!(verdict.is_match(), "verdict: {:?}", verdict);
}

#[test]
fn tampered_result_is_detected() {
    use salesq_core::types::Scalar;

    let store = fixture_store("tampered_result");
    let (query_batch, _) = run_report_query(&store).unwrap();
    let mut tampered = query_batch.clone();
    tampered.columns[3].values[0] = Scalar::I64(999);

    let verdict = cross_validate(&query_batch, &tampered, &sort_keys()).unwrap();
    assert!(!verdict.is_match());
}

#[test]
fn mismatch_suppresses_the_export() {
    use salesq_core::types::Scalar;

    let store = fixture_store("mismatch_no_export");
    let (query_batch, _) = run_report_query(&store).unwrap();
    let mut tampered = query_batch.clone();
    tampered.columns[3].values[0] = Scalar::I64(999);

    let out = temp_out_path("mismatch_no_export");
    let verdict =
        validate_and_export(&query_batch, &tampered, &sort_keys(), &out, b';').unwrap();
    assert!(!verdict.is_match());
    assert!(!out.exists());
}

#[test]
fn export_writes_semicolon_delimited_csv() {
    let store = fixture_store("export_csv");
    let (batch, _) = run_report_query(&store).unwrap();

    let out = temp_out_path("export_csv");
    let mut writer = DelimitedWriter::to_path(&out, b';').unwrap();
    writer.write_batch(&batch).unwrap();

    let content = fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], "Customer;Age;Item;Quantity");
    assert_eq!(lines[1], "1;21;x;10");
    assert_eq!(lines[2], "2;23;x;1");
    assert_eq!(lines[5], "3;35;z;2");
}

#[test]
fn report_is_sorted_by_customer_then_item() {
    let store = fixture_store("report_sort_order");
    let (batch, _) = run_report_query(&store).unwrap();

    let rows = report_rows(&batch);
    let mut sorted = rows.clone();
    sorted.sort_by(|a, b| (a.0, &a.2).cmp(&(b.0, &b.2)));
    assert_eq!(rows, sorted);
}
