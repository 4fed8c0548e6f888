//! Aggregate calibration of the published model.
//!
//! Statistical checks: bands are wide enough for sampling noise at the
//! given row counts, narrow enough to catch a broken weight table.

use rsd_core::{
    generate,
    summary::DatasetSummary,
    types::{BiasFlag, Decision},
    ApplicantRecord, RunConfig,
};

fn summary(seed: u64, rows: u32) -> DatasetSummary {
    let table = generate(RunConfig::new(seed, rows)).expect("generate");
    DatasetSummary::from_table(&table, 0.5)
}

#[test]
fn default_run_hits_teaching_targets() {
    let s = summary(42, 500);
    // Seed 42 lands at 49.0% on this stream; the model mean is about 51.5%.
    assert!(
        (0.49..=0.59).contains(&s.approval_rate),
        "approval rate {:.3}",
        s.approval_rate
    );
    assert!(
        (0.01..=0.08).contains(&s.non_binary_share),
        "non-binary share {:.3}",
        s.non_binary_share
    );
    assert!(
        (0.05..=0.15).contains(&s.review_share()),
        "review share {:.3}",
        s.review_share()
    );
}

#[test]
fn pooled_runs_converge_on_targets() {
    let (mut rows, mut approved, mut non_binary, mut reviewed) = (0usize, 0usize, 0f64, 0usize);
    for seed in 42..52 {
        let s = summary(seed, 500);
        rows += s.rows;
        approved += s.final_approved;
        non_binary += s.non_binary_share * s.rows as f64;
        reviewed += s.human_reviewed;
    }
    let n = rows as f64;
    let approval = approved as f64 / n;
    assert!((0.48..=0.58).contains(&approval), "pooled approval {approval:.3}");
    assert!((0.03..=0.05).contains(&(non_binary / n)), "pooled non-binary {:.4}", non_binary / n);
    let review = reviewed as f64 / n;
    assert!((0.085..=0.115).contains(&review), "pooled review {review:.4}");
}

#[test]
fn venezuela_approves_less_than_syria() {
    let (mut syria, mut venezuela) = (0.0, 0.0);
    for seed in 1..=5 {
        let s = summary(seed, 500);
        syria += s.approval_rate_by_country["Syria"];
        venezuela += s.approval_rate_by_country["Venezuela"];
    }
    assert!(syria > venezuela, "syria {syria:.3} vs venezuela {venezuela:.3}");
}

#[test]
fn trauma_with_low_credibility_is_present() {
    let s = summary(42, 500);
    assert!(s.trauma_with_low_credibility > 0);
    assert!(s.bias_flags["moderate"] + s.bias_flags["severe"] > 0);
}

fn elevated(r: &ApplicantRecord) -> bool {
    (r.reported_trauma && r.credibility_score < 0.5)
        || (r.nexus_established && r.final_decision == Decision::Deny)
}

#[test]
fn elevated_rows_carry_more_bias_flags() {
    let (mut hit, mut hit_flagged, mut rest, mut rest_flagged) = (0usize, 0usize, 0usize, 0usize);
    for seed in 1..=10 {
        let table = generate(RunConfig::new(seed, 500)).expect("generate");
        for r in &table.records {
            let flagged = (r.bias_flag != BiasFlag::None) as usize;
            if elevated(r) {
                hit += 1;
                hit_flagged += flagged;
            } else {
                rest += 1;
                rest_flagged += flagged;
            }
        }
    }
    let elevated_share = hit_flagged as f64 / hit as f64;
    let baseline_share = rest_flagged as f64 / rest as f64;
    assert!(
        (0.25..=0.35).contains(&baseline_share),
        "baseline moderate/severe share {baseline_share:.3}"
    );
    assert!(
        elevated_share > baseline_share + 0.15,
        "elevated {elevated_share:.3} vs baseline {baseline_share:.3}"
    );
}
