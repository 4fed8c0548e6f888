//! Aggregate report over a generated table.
//!
//! Used by the runner for its end-of-run printout and stored alongside
//! the run record. Calibration targets are the documented teaching
//! targets; missing them is reported, not fatal.

use crate::{
    table::{ApplicantRecord, DatasetTable, COLUMNS},
    types::{AppealOutcome, BiasFlag, Decision, Gender},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const TARGET_APPROVAL_RATE: f64 = 0.54;
pub const APPROVAL_RATE_TOLERANCE: f64 = 0.06;
pub const TARGET_NON_BINARY_SHARE: f64 = 0.04;
pub const NON_BINARY_TOLERANCE: f64 = 0.02;
pub const TARGET_REVIEW_SHARE: f64 = 0.10;
pub const REVIEW_TOLERANCE: f64 = 0.03;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub rows: usize,
    pub columns: usize,
    pub ai_approved: usize,
    pub ai_denied: usize,
    pub final_approved: usize,
    pub final_denied: usize,
    pub approval_rate: f64,
    /// Final approval rate per origin, keyed by label (sorted).
    pub approval_rate_by_country: BTreeMap<String, f64>,
    pub human_reviewed: usize,
    pub human_overrides: usize,
    pub appeals_filed: usize,
    pub appeals_overturned: usize,
    pub bias_flags: BTreeMap<String, usize>,
    pub trauma_rate: f64,
    pub trauma_with_low_credibility: usize,
    pub non_binary_share: f64,
}

impl DatasetSummary {
    /// `low_credibility` is the audit threshold; credibility strictly below counts.
    pub fn from_table(table: &DatasetTable, low_credibility: f64) -> Self {
        let records = &table.records;
        let rows = records.len();
        let share = |n: usize| if rows == 0 { 0.0 } else { n as f64 / rows as f64 };
        let count = |pred: fn(&ApplicantRecord) -> bool| count_where(records, pred);

        let ai_approved = count(|r| r.ai_decision == Decision::Approve);
        let final_approved = count(|r| r.final_decision == Decision::Approve);

        let mut by_country: BTreeMap<String, (usize, usize)> = BTreeMap::new();
        for r in records {
            let entry = by_country
                .entry(r.country_of_origin.as_str().to_string())
                .or_default();
            entry.0 += 1;
            entry.1 += (r.final_decision == Decision::Approve) as usize;
        }
        let approval_rate_by_country = by_country
            .into_iter()
            .map(|(country, (n, approved))| (country, approved as f64 / n as f64))
            .collect();

        let mut bias_flags: BTreeMap<String, usize> = BiasFlag::ALL
            .iter()
            .map(|f| (f.as_str().to_string(), 0))
            .collect();
        for r in records {
            *bias_flags.entry(r.bias_flag.as_str().to_string()).or_default() += 1;
        }

        Self {
            rows,
            columns: COLUMNS.len(),
            ai_approved,
            ai_denied: rows - ai_approved,
            final_approved,
            final_denied: rows - final_approved,
            approval_rate: share(final_approved),
            approval_rate_by_country,
            human_reviewed: count(|r| r.human_reviewed),
            human_overrides: count(|r| r.human_override),
            appeals_filed: count(|r| r.appealed),
            appeals_overturned: count(|r| r.appeal_outcome == AppealOutcome::Overturned),
            bias_flags,
            trauma_rate: share(count(|r| r.reported_trauma)),
            trauma_with_low_credibility: count_where(records, |r| {
                r.reported_trauma && r.credibility_score < low_credibility
            }),
            non_binary_share: share(count(|r| r.gender == Gender::NonBinary)),
        }
    }

    pub fn review_share(&self) -> f64 {
        if self.rows == 0 {
            0.0
        } else {
            self.human_reviewed as f64 / self.rows as f64
        }
    }

    /// Human-readable notes for every calibration target the table misses.
    pub fn calibration_warnings(&self) -> Vec<String> {
        let checks = [
            ("approval rate", self.approval_rate, TARGET_APPROVAL_RATE, APPROVAL_RATE_TOLERANCE),
            ("non-binary share", self.non_binary_share, TARGET_NON_BINARY_SHARE, NON_BINARY_TOLERANCE),
            ("human review share", self.review_share(), TARGET_REVIEW_SHARE, REVIEW_TOLERANCE),
        ];
        checks
            .iter()
            .filter(|(_, actual, target, tol)| (actual - target).abs() > *tol)
            .map(|(name, actual, target, tol)| {
                format!(
                    "{name} {:.1}% outside target {:.1}% ± {:.1}",
                    actual * 100.0,
                    target * 100.0,
                    tol * 100.0
                )
            })
            .collect()
    }
}

fn count_where(records: &[ApplicantRecord], pred: impl Fn(&ApplicantRecord) -> bool) -> usize {
    records.iter().filter(|r| pred(r)).count()
}
