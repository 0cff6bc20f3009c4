//! salesq CLI: build the fixture dataset, run both report solvers,
//! cross-validate, and export the report on success.

use clap::Parser;
use std::path::PathBuf;

use salesq_core::config::ReportConfig;
use salesq_core::types::{RowBatch, Scalar};
use salesq_exec::{run_report_algebra, run_report_query, validate_and_export, Verdict};
use salesq_planner::REPORT_SORT_KEYS;
use salesq_store::{build_fixture, Store};

const REPORT_DELIMITER: u8 = b';';

#[derive(Parser)]
#[command(name = "salesq")]
#[command(about = "Cross-validated customer purchase quantity report", long_about = None)]
struct Cli {
    /// Database file path (overrides SALESQ_DB_PATH)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Report output file path (overrides SALESQ_OUTPUT_PATH)
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = ReportConfig::from_env();
    apply_overrides(&mut config, &cli);

    // 1. Fixture: assumes a fresh target, fails if the tables already exist.
    let mut store = Store::open(&config.db_path)?;
    build_fixture(&mut store)?;
    println!("Database '{}' created with test data.", config.db_path);

    // 2. Declarative-query solver.
    println!("\nRunning declarative solver...");
    let (query_result, manifest) = run_report_query(&store)?;
    print!("{}", render_batch(&query_result));

    // 3. Relational-algebra solver.
    println!("\nRunning algebra solver...");
    let algebra_result = run_report_algebra(&store)?;
    print!("{}", render_batch(&algebra_result));

    // 4. Cross-validate, export only on agreement.
    let sort_keys: Vec<String> = REPORT_SORT_KEYS.iter().map(|s| s.to_string()).collect();
    match validate_and_export(
        &query_result,
        &algebra_result,
        &sort_keys,
        &config.output_path,
        REPORT_DELIMITER,
    )? {
        Verdict::Match { digest } => {
            println!("\n✓ Both solvers agree.");
            println!("  Result digest: {}", digest);
            println!("  Plan hash: {}", manifest.plan_hash);
            println!("  Output saved in {}", config.output_path);
        }
        Verdict::Mismatch {
            reason,
            left_digest,
            right_digest,
        } => {
            // A mismatch is a reported outcome, not a process fault.
            println!("\n✗ Solvers disagree: {}", reason);
            println!("  declarative: {}", left_digest);
            println!("  algebra:     {}", right_digest);
            println!("  No output written.");
        }
    }

    Ok(())
}

fn apply_overrides(config: &mut ReportConfig, cli: &Cli) {
    if let Some(db) = &cli.db {
        config.db_path = db.display().to_string();
    }
    if let Some(out) = &cli.out {
        config.output_path = out.display().to_string();
    }
}

/// Plain column-aligned rendering for console output.
fn render_batch(batch: &RowBatch) -> String {
    let mut widths: Vec<usize> = batch.columns.iter().map(|c| c.name.len()).collect();
    let mut rows: Vec<Vec<String>> = Vec::with_capacity(batch.num_rows());
    for row in 0..batch.num_rows() {
        let cells: Vec<String> = batch
            .columns
            .iter()
            .map(|c| match &c.values[row] {
                Scalar::Null => String::new(),
                Scalar::I64(i) => i.to_string(),
                Scalar::F64(f) => f.to_string(),
                Scalar::Str(s) => s.clone(),
            })
            .collect();
        for (w, cell) in widths.iter_mut().zip(cells.iter()) {
            *w = (*w).max(cell.len());
        }
        rows.push(cells);
    }

    let mut out = String::new();
    for (i, col) in batch.columns.iter().enumerate() {
        out.push_str(&format!("{:>width$}  ", col.name, width = widths[i]));
    }
    out.push('\n');
    for cells in rows {
        for (i, cell) in cells.iter().enumerate() {
            out.push_str(&format!("{:>width$}  ", cell, width = widths[i]));
        }
        out.push('\n');
    }
    out
}
