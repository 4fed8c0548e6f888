//! Run and model configuration.
//!
//! RULE: Only the seed, row count and row seeding mode are runtime
//! parameters. Every distribution parameter, effect table and threshold
//! lives in ModelConfig::standard() and is fixed at compile time, so the
//! documented approval-rate targets hold for every run.
//!
//! ModelConfig::validate() runs once before any row is generated.
//! A malformed table aborts the whole run; it never surfaces per row.

use crate::{
    error::{GenError, GenResult},
    rng::RowSeeding,
    types::{
        BiasFlag, Country, EducationLevel, Gender, LanguageProficiency, PersecutionGround,
        PersecutionType,
    },
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;

/// Tolerance for weight vectors summing to 1.0.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_ROWS: u32 = 500;

// ── Run configuration ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    pub seed: u64,
    pub rows: u32,
    pub row_seeding: RowSeeding,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            rows: DEFAULT_ROWS,
            row_seeding: RowSeeding::Shared,
        }
    }
}

impl RunConfig {
    pub fn new(seed: u64, rows: u32) -> Self {
        Self { seed, rows, ..Self::default() }
    }

    pub fn with_row_seeding(mut self, row_seeding: RowSeeding) -> Self {
        self.row_seeding = row_seeding;
        self
    }

    pub fn validate(&self) -> GenResult<()> {
        if self.rows == 0 {
            return Err(GenError::EmptyTable);
        }
        Ok(())
    }
}

// ── Parameter primitives ──────────────────────────────────────────

/// Inclusive integer range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntRange {
    pub min: u32,
    pub max: u32,
}

impl IntRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    fn validate(&self, field: &'static str) -> GenResult<()> {
        if self.min > self.max {
            return Err(GenError::InvertedRange { field, min: self.min, max: self.max });
        }
        Ok(())
    }
}

/// Saturating clamp interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClipBounds {
    pub lo: f64,
    pub hi: f64,
}

impl ClipBounds {
    pub const UNIT: ClipBounds = ClipBounds { lo: 0.0, hi: 1.0 };

    /// Never panics; on misordered bounds the upper bound wins.
    pub fn apply(&self, value: f64) -> f64 {
        value.max(self.lo).min(self.hi)
    }

    fn validate(&self, field: &'static str) -> GenResult<()> {
        // NaN bounds also fail here.
        if !(self.lo <= self.hi) {
            return Err(GenError::MisorderedClip { field, lo: self.lo, hi: self.hi });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalParams {
    pub mean: f64,
    pub std_dev: f64,
}

impl NormalParams {
    fn validate(&self, field: &'static str) -> GenResult<()> {
        if !self.mean.is_finite() {
            return Err(GenError::InvalidParameter { field, value: self.mean });
        }
        if !self.std_dev.is_finite() || self.std_dev < 0.0 {
            return Err(GenError::InvalidParameter { field, value: self.std_dev });
        }
        Ok(())
    }
}

// ── Stage tables ──────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct TraumaConfig {
    /// Conflict-heavy origins with the elevated base rate.
    pub high_rate_countries: Vec<Country>,
    pub high_rate: f64,
    pub base_rate: f64,
    /// Persecution types that add `type_uplift` on top of the base rate.
    pub uplift_types: Vec<PersecutionType>,
    pub type_uplift: f64,
    pub cap: f64,
}

#[derive(Debug, Clone)]
pub struct IntakeConfig {
    pub countries: Vec<Country>,
    pub gender_weights: Vec<(Gender, f64)>,
    pub age: IntRange,
    pub education_weights: Vec<(EducationLevel, f64)>,
    pub language_weights: Vec<(LanguageProficiency, f64)>,
    pub family_size: IntRange,
    pub prior_camp_years: IntRange,
    pub persecution_grounds: Vec<PersecutionGround>,
    pub persecution_types: Vec<PersecutionType>,
    pub nexus_probability: f64,
    pub state_protection: NormalParams,
    /// Floor above zero so no applicant has an artifactual exact-zero score.
    pub state_protection_clip: ClipBounds,
    pub internal_relocation_probability: f64,
    pub trauma: TraumaConfig,
}

#[derive(Debug, Clone)]
pub struct ScoringConfig {
    pub credibility_noise: NormalParams,
    pub language_effects: HashMap<LanguageProficiency, f64>,
    pub education_effects: HashMap<EducationLevel, f64>,
    pub trauma_penalty: f64,
    pub country_base_risk: HashMap<Country, f64>,
    pub gender_effects: HashMap<Gender, f64>,
    pub persecution_effects: HashMap<PersecutionType, f64>,
    pub risk_noise: NormalParams,
    pub integration_credibility_weight: f64,
    pub integration_age_weight: f64,
    pub integration_age_pivot: f64,
    pub integration_noise_weight: f64,
    pub score_clip: ClipBounds,
}

#[derive(Debug, Clone)]
pub struct DecisionConfig {
    pub risk_weight: f64,
    pub credibility_weight: f64,
    pub nexus_weight: f64,
    pub state_protection_weight: f64,
    /// Composite must be strictly above this.
    pub approve_threshold: f64,
    /// Credibility must be strictly above this.
    pub min_credibility: f64,
    pub review_probability: f64,
    pub override_probability: f64,
    pub base_processing_days: IntRange,
    pub review_delay_days: IntRange,
}

#[derive(Debug, Clone)]
pub struct AuditConfig {
    pub appeal_probability: f64,
    pub overturn_probability: f64,
    /// Credibility strictly below this counts as low.
    pub low_credibility_threshold: f64,
    pub baseline_bias_weights: Vec<(BiasFlag, f64)>,
    pub trauma_low_credibility_bias_weights: Vec<(BiasFlag, f64)>,
    pub nexus_denied_bias_weights: Vec<(BiasFlag, f64)>,
}

/// Every fixed constant the pipeline reads.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub intake: IntakeConfig,
    pub scoring: ScoringConfig,
    pub decision: DecisionConfig,
    pub audit: AuditConfig,
}

impl ModelConfig {
    /// The published model. Changing any value here changes every dataset.
    pub fn standard() -> Self {
        let intake = IntakeConfig {
            countries: Country::ALL.to_vec(),
            gender_weights: vec![
                (Gender::Male, 0.48),
                (Gender::Female, 0.48),
                (Gender::NonBinary, 0.04),
            ],
            age: IntRange::new(18, 64),
            education_weights: vec![
                (EducationLevel::None, 0.1),
                (EducationLevel::Primary, 0.3),
                (EducationLevel::Secondary, 0.4),
                (EducationLevel::Tertiary, 0.2),
            ],
            language_weights: vec![
                (LanguageProficiency::None, 0.05),
                (LanguageProficiency::Basic, 0.25),
                (LanguageProficiency::Intermediate, 0.4),
                (LanguageProficiency::Advanced, 0.2),
                (LanguageProficiency::Fluent, 0.1),
            ],
            family_size: IntRange::new(1, 6),
            prior_camp_years: IntRange::new(0, 9),
            persecution_grounds: PersecutionGround::ALL.to_vec(),
            persecution_types: PersecutionType::ALL.to_vec(),
            nexus_probability: 0.7,
            state_protection: NormalParams { mean: 0.3, std_dev: 0.15 },
            state_protection_clip: ClipBounds { lo: 0.05, hi: 1.0 },
            internal_relocation_probability: 0.4,
            trauma: TraumaConfig {
                high_rate_countries: vec![
                    Country::Syria,
                    Country::Afghanistan,
                    Country::Eritrea,
                    Country::Somalia,
                ],
                high_rate: 0.65,
                base_rate: 0.40,
                uplift_types: vec![PersecutionType::SexualViolence, PersecutionType::Detention],
                type_uplift: 0.15,
                cap: 1.0,
            },
        };

        let scoring = ScoringConfig {
            credibility_noise: NormalParams { mean: 0.65, std_dev: 0.15 },
            language_effects: [
                (LanguageProficiency::None, -0.20),
                (LanguageProficiency::Basic, -0.10),
                (LanguageProficiency::Intermediate, 0.0),
                (LanguageProficiency::Advanced, 0.05),
                (LanguageProficiency::Fluent, 0.10),
            ]
            .into(),
            education_effects: [
                (EducationLevel::None, -0.10),
                (EducationLevel::Primary, 0.0),
                (EducationLevel::Secondary, 0.05),
                (EducationLevel::Tertiary, 0.10),
            ]
            .into(),
            trauma_penalty: -0.08,
            country_base_risk: [
                (Country::Syria, 0.85),
                (Country::Afghanistan, 0.80),
                (Country::Sudan, 0.75),
                (Country::Myanmar, 0.70),
                (Country::Eritrea, 0.70),
                (Country::Venezuela, 0.55),
                (Country::Iraq, 0.65),
                (Country::Somalia, 0.78),
            ]
            .into(),
            gender_effects: [
                (Gender::Male, 0.0),
                (Gender::Female, 0.08),
                (Gender::NonBinary, 0.06),
            ]
            .into(),
            persecution_effects: [
                (PersecutionType::SexualViolence, 0.15),
                (PersecutionType::Violence, 0.10),
                (PersecutionType::Detention, 0.05),
                (PersecutionType::Threats, 0.0),
                (PersecutionType::Discrimination, -0.05),
            ]
            .into(),
            risk_noise: NormalParams { mean: 0.0, std_dev: 0.05 },
            integration_credibility_weight: 0.4,
            integration_age_weight: 0.2,
            integration_age_pivot: 35.0,
            integration_noise_weight: 0.4,
            score_clip: ClipBounds::UNIT,
        };

        let decision = DecisionConfig {
            risk_weight: 0.45,
            credibility_weight: 0.30,
            nexus_weight: 0.15,
            state_protection_weight: 0.10,
            approve_threshold: 0.62,
            min_credibility: 0.50,
            review_probability: 0.10,
            override_probability: 0.50,
            // Half-open in days: 30..120 and 20..60.
            base_processing_days: IntRange::new(30, 119),
            review_delay_days: IntRange::new(20, 59),
        };

        let audit = AuditConfig {
            appeal_probability: 0.30,
            overturn_probability: 0.40,
            low_credibility_threshold: 0.50,
            baseline_bias_weights: vec![
                (BiasFlag::None, 0.70),
                (BiasFlag::Moderate, 0.20),
                (BiasFlag::Severe, 0.10),
            ],
            trauma_low_credibility_bias_weights: vec![
                (BiasFlag::None, 0.40),
                (BiasFlag::Moderate, 0.40),
                (BiasFlag::Severe, 0.20),
            ],
            nexus_denied_bias_weights: vec![
                (BiasFlag::None, 0.50),
                (BiasFlag::Moderate, 0.35),
                (BiasFlag::Severe, 0.15),
            ],
        };

        Self { intake, scoring, decision, audit }
    }

    /// Check every table and bound. Called once per run, before row 1.
    pub fn validate(&self) -> GenResult<()> {
        let i = &self.intake;
        non_empty("countries", &i.countries)?;
        non_empty("persecution_grounds", &i.persecution_grounds)?;
        non_empty("persecution_types", &i.persecution_types)?;
        weights_sum_to_one("gender", &i.gender_weights)?;
        weights_sum_to_one("education_level", &i.education_weights)?;
        weights_sum_to_one("language_proficiency", &i.language_weights)?;
        i.age.validate("age")?;
        i.family_size.validate("family_size")?;
        i.prior_camp_years.validate("prior_camp_years")?;
        probability("nexus_established", i.nexus_probability)?;
        probability("internal_relocation_possible", i.internal_relocation_probability)?;
        i.state_protection.validate("state_protection_score")?;
        i.state_protection_clip.validate("state_protection_score")?;
        probability("trauma.high_rate", i.trauma.high_rate)?;
        probability("trauma.base_rate", i.trauma.base_rate)?;
        probability("trauma.cap", i.trauma.cap)?;

        let s = &self.scoring;
        s.credibility_noise.validate("credibility_noise")?;
        s.risk_noise.validate("risk_noise")?;
        s.score_clip.validate("score_clip")?;
        complete("language_effects", &s.language_effects, &LanguageProficiency::ALL, |k| k.as_str())?;
        complete("education_effects", &s.education_effects, &EducationLevel::ALL, |k| k.as_str())?;
        complete("country_base_risk", &s.country_base_risk, &Country::ALL, |k| k.as_str())?;
        complete("gender_effects", &s.gender_effects, &Gender::ALL, |k| k.as_str())?;
        complete("persecution_effects", &s.persecution_effects, &PersecutionType::ALL, |k| k.as_str())?;
        if !(s.integration_age_pivot > 0.0) {
            return Err(GenError::InvalidParameter {
                field: "integration_age_pivot",
                value: s.integration_age_pivot,
            });
        }

        let d = &self.decision;
        probability("human_reviewed", d.review_probability)?;
        probability("human_override", d.override_probability)?;
        d.base_processing_days.validate("processing_time_days")?;
        d.review_delay_days.validate("review_delay_days")?;
        if d.review_delay_days.min == 0 {
            // Review must strictly lengthen processing.
            return Err(GenError::InvalidParameter { field: "review_delay_days.min", value: 0.0 });
        }

        let a = &self.audit;
        probability("appealed", a.appeal_probability)?;
        probability("appeal_outcome", a.overturn_probability)?;
        weights_sum_to_one("bias_flag.baseline", &a.baseline_bias_weights)?;
        weights_sum_to_one("bias_flag.trauma_low_credibility", &a.trauma_low_credibility_bias_weights)?;
        weights_sum_to_one("bias_flag.nexus_denied", &a.nexus_denied_bias_weights)?;
        Ok(())
    }
}

fn probability(field: &'static str, value: f64) -> GenResult<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(GenError::InvalidProbability { field, value });
    }
    Ok(())
}

fn weights_sum_to_one<T>(field: &'static str, table: &[(T, f64)]) -> GenResult<()> {
    for (_, w) in table {
        probability(field, *w)?;
    }
    let sum: f64 = table.iter().map(|(_, w)| w).sum();
    if table.is_empty() || (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(GenError::InvalidWeights { field, sum });
    }
    Ok(())
}

fn non_empty<T>(field: &'static str, items: &[T]) -> GenResult<()> {
    if items.is_empty() {
        return Err(GenError::InvalidWeights { field, sum: 0.0 });
    }
    Ok(())
}

fn complete<K: Eq + Hash>(
    field: &'static str,
    table: &HashMap<K, f64>,
    keys: &[K],
    label: impl Fn(&K) -> &'static str,
) -> GenResult<()> {
    match keys.iter().find(|k| !table.contains_key(*k)) {
        Some(k) => Err(GenError::IncompleteTable { field, missing: label(k) }),
        None => Ok(()),
    }
}
