//! Table assembly: one ApplicantRecord per id, fixed column order.
//!
//! A record can only be built from all four stage outputs, so a row
//! cannot exist with a stage missing or run out of order.

use crate::{
    audit::AuditOutcome,
    config::RunConfig,
    decision::DecisionOutcome,
    sampler::ApplicantInputs,
    scoring::ApplicantScores,
    types::{
        bool_label, AppealOutcome, ApplicantId, BiasFlag, Country, Decision, EducationLevel,
        Gender, LanguageProficiency, PersecutionGround, PersecutionType,
    },
};
use serde::{Deserialize, Serialize};

/// Output column order. Never reorder: downstream notebooks index by it.
pub const COLUMNS: [&str; 26] = [
    // Applicant inputs
    "id",
    "country_of_origin",
    "gender",
    "age",
    "education_level",
    "language_proficiency",
    "family_size",
    "prior_camp_years",
    "persecution_ground",
    "persecution_type",
    "nexus_established",
    "state_protection_score",
    "internal_relocation_possible",
    "reported_trauma",
    // Scores
    "credibility_score",
    "risk_score",
    "risk_score_uncapped",
    "integration_score",
    // System process
    "AI_decision",
    "human_reviewed",
    "human_override",
    "final_decision",
    "processing_time_days",
    // Outcomes
    "appealed",
    "appeal_outcome",
    "bias_flag",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantRecord {
    pub id: ApplicantId,
    pub country_of_origin: Country,
    pub gender: Gender,
    pub age: u32,
    pub education_level: EducationLevel,
    pub language_proficiency: LanguageProficiency,
    pub family_size: u32,
    pub prior_camp_years: u32,
    pub persecution_ground: PersecutionGround,
    pub persecution_type: PersecutionType,
    pub nexus_established: bool,
    pub state_protection_score: f64,
    pub internal_relocation_possible: bool,
    pub reported_trauma: bool,
    pub credibility_score: f64,
    pub risk_score: f64,
    pub risk_score_uncapped: f64,
    pub integration_score: f64,
    #[serde(rename = "AI_decision")]
    pub ai_decision: Decision,
    pub human_reviewed: bool,
    pub human_override: bool,
    pub final_decision: Decision,
    pub processing_time_days: u32,
    pub appealed: bool,
    pub appeal_outcome: AppealOutcome,
    pub bias_flag: BiasFlag,
}

impl ApplicantRecord {
    pub fn assemble(
        inputs: ApplicantInputs,
        scores: ApplicantScores,
        decision: DecisionOutcome,
        audit: AuditOutcome,
    ) -> Self {
        Self {
            id: inputs.id,
            country_of_origin: inputs.country_of_origin,
            gender: inputs.gender,
            age: inputs.age,
            education_level: inputs.education_level,
            language_proficiency: inputs.language_proficiency,
            family_size: inputs.family_size,
            prior_camp_years: inputs.prior_camp_years,
            persecution_ground: inputs.persecution_ground,
            persecution_type: inputs.persecution_type,
            nexus_established: inputs.nexus_established,
            state_protection_score: inputs.state_protection_score,
            internal_relocation_possible: inputs.internal_relocation_possible,
            reported_trauma: inputs.reported_trauma,
            credibility_score: scores.credibility_score,
            risk_score: scores.risk_score,
            risk_score_uncapped: scores.risk_score_uncapped,
            integration_score: scores.integration_score,
            ai_decision: decision.ai_decision,
            human_reviewed: decision.human_reviewed,
            human_override: decision.human_override,
            final_decision: decision.final_decision,
            processing_time_days: decision.processing_time_days,
            appealed: audit.appealed,
            appeal_outcome: audit.appeal_outcome,
            bias_flag: audit.bias_flag,
        }
    }

    /// Cells in COLUMNS order, using the table's text encodings.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.country_of_origin.as_str().to_string(),
            self.gender.as_str().to_string(),
            self.age.to_string(),
            self.education_level.as_str().to_string(),
            self.language_proficiency.as_str().to_string(),
            self.family_size.to_string(),
            self.prior_camp_years.to_string(),
            self.persecution_ground.as_str().to_string(),
            self.persecution_type.as_str().to_string(),
            bool_label(self.nexus_established).to_string(),
            format_float(self.state_protection_score),
            bool_label(self.internal_relocation_possible).to_string(),
            bool_label(self.reported_trauma).to_string(),
            format_float(self.credibility_score),
            format_float(self.risk_score),
            format_float(self.risk_score_uncapped),
            format_float(self.integration_score),
            self.ai_decision.as_str().to_string(),
            bool_label(self.human_reviewed).to_string(),
            bool_label(self.human_override).to_string(),
            self.final_decision.as_str().to_string(),
            self.processing_time_days.to_string(),
            bool_label(self.appealed).to_string(),
            self.appeal_outcome.as_str().to_string(),
            self.bias_flag.as_str().to_string(),
        ]
    }
}

/// Shortest round-trip representation; integral values keep a trailing ".0"
/// so 1.0 reads as a float, not a count.
pub fn format_float(value: f64) -> String {
    format!("{value:?}")
}

/// The completed dataset, rows in increasing id order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetTable {
    pub run: RunConfig,
    pub records: Vec<ApplicantRecord>,
}

impl DatasetTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn columns(&self) -> &'static [&'static str] {
        &COLUMNS
    }

    pub fn rows(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        self.records.iter().map(ApplicantRecord::to_row)
    }
}
