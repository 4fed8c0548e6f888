//! rsd-gen: headless dataset generator.
//!
//! Usage:
//!   rsd-gen --seed 42 --rows 500 --out synthetic_RSD_dataset.csv
//!   rsd-gen --seed 42 --db datasets.db --row-seeding per-row
//!   rsd-gen --summary-json

use anyhow::{bail, Result};
use rsd_core::{
    export::write_csv_file,
    rng::RowSeeding,
    store::DatasetStore,
    summary::DatasetSummary,
    DatasetEngine, DatasetTable, RunConfig,
};
use std::env;
use std::path::Path;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let defaults = RunConfig::default();
    let seed = parse_arg(&args, "--seed", defaults.seed);
    let rows = parse_arg(&args, "--rows", defaults.rows);
    let summary_json = args.iter().any(|a| a == "--summary-json");
    let out = flag_value(&args, "--out").unwrap_or("synthetic_RSD_dataset.csv");
    let db = flag_value(&args, "--db");
    let row_seeding = match flag_value(&args, "--row-seeding") {
        None => defaults.row_seeding,
        Some(s) => match RowSeeding::parse(s) {
            Some(mode) => mode,
            None => bail!("unknown --row-seeding '{s}' (expected shared or per-row)"),
        },
    };

    let run = RunConfig::new(seed, rows).with_row_seeding(row_seeding);

    if !summary_json {
        println!("Synthetic RSD dataset generator");
        println!("  seed:         {seed}");
        println!("  rows:         {rows}");
        println!("  row seeding:  {}", row_seeding.as_str());
        println!("  out:          {out}");
        println!("  db:           {}", db.unwrap_or("(none)"));
        println!();
    }

    // Validation happens here, before any row is drawn.
    let engine = DatasetEngine::new(run)?;
    let table = engine.generate()?;
    let summary =
        DatasetSummary::from_table(&table, engine.model().audit.low_credibility_threshold);

    for warning in summary.calibration_warnings() {
        log::warn!("calibration: {warning}");
    }

    write_csv_file(&table, Path::new(out))?;

    if let Some(db) = db {
        persist(db, &table, &summary)?;
    }

    if summary_json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
        println!();
        println!("Saved to {out}");
    }
    Ok(())
}

fn persist(db: &str, table: &DatasetTable, summary: &DatasetSummary) -> Result<()> {
    let store = if db == ":memory:" {
        DatasetStore::in_memory()?
    } else {
        DatasetStore::open(db)?
    };
    store.migrate()?;

    let run_id = format!("rsd-{}-{}", table.run.seed, uuid::Uuid::new_v4());
    let started_at = chrono::Utc::now().to_rfc3339();
    store.insert_run(&run_id, &table.run, env!("CARGO_PKG_VERSION"), &started_at)?;
    store.save_table(&run_id, table)?;
    store.save_summary(&run_id, summary)?;

    let violations = store.invariant_violation_count(&run_id)?;
    if violations > 0 {
        bail!("run {run_id}: {violations} stored rows break a row invariant");
    }
    log::info!("persisted run {run_id} ({} rows) to {db}", table.len());
    Ok(())
}

fn print_summary(s: &DatasetSummary) {
    println!("=== DATASET SUMMARY ===");
    println!("  shape:           ({}, {})", s.rows, s.columns);
    println!("  AI decision:     approve {} / deny {}", s.ai_approved, s.ai_denied);
    println!("  final decision:  approve {} / deny {}", s.final_approved, s.final_denied);
    println!("  approval rate:   {:.1}%", s.approval_rate * 100.0);
    println!("  human reviewed:  {} ({} overridden)", s.human_reviewed, s.human_overrides);
    println!();
    println!("=== APPROVAL RATE BY COUNTRY (final decision) ===");
    for (country, rate) in &s.approval_rate_by_country {
        println!("  {country:<12} {rate:.2}");
    }
    println!();
    println!("  appeals filed:       {}", s.appeals_filed);
    println!("  appeals overturned:  {}", s.appeals_overturned);
    println!();
    println!("=== BIAS FLAG DISTRIBUTION ===");
    for (flag, n) in &s.bias_flags {
        println!("  {flag:<9} {n}");
    }
    println!();
    println!("  trauma rate:                    {:.1}%", s.trauma_rate * 100.0);
    println!("  trauma with credibility < 0.5:  {}", s.trauma_with_low_credibility);
}

fn parse_arg<T: std::str::FromStr + Copy + std::fmt::Display>(
    args: &[String],
    flag: &str,
    default: T,
) -> T {
    match flag_value(args, flag) {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            log::warn!("ignoring {flag} '{raw}': not a valid value, using {default}");
            default
        }),
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_arg_reads_flag_value() {
        let a = args(&["rsd-gen", "--rows", "120", "--seed", "7"]);
        assert_eq!(parse_arg(&a, "--rows", 500u32), 120);
        assert_eq!(parse_arg(&a, "--seed", 42u64), 7);
    }

    #[test]
    fn unparsable_value_falls_back_to_default() {
        let a = args(&["rsd-gen", "--rows", "abc"]);
        assert_eq!(parse_arg(&a, "--rows", 500u32), 500);
        assert_eq!(parse_arg(&a, "--seed", 42u64), 42);
    }
}
