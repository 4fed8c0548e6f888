//! Intake stage: draws the applicant's input fields.
//!
//! DRAW ORDER (fixed, never reordered — reordering changes every dataset):
//!   country, gender, age, education, language, family size,
//!   camp years, ground, type, nexus, state protection,
//!   internal relocation, trauma.

use crate::{
    config::{IntakeConfig, TraumaConfig},
    rng::DatasetRng,
    types::{
        ApplicantId, Country, EducationLevel, Gender, LanguageProficiency, PersecutionGround,
        PersecutionType,
    },
};
use serde::{Deserialize, Serialize};

/// The fifteen intake columns. Produced once; never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantInputs {
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
}

/// Expects an IntakeConfig from a validated ModelConfig.
pub fn sample_applicant(id: ApplicantId, cfg: &IntakeConfig, rng: &mut DatasetRng) -> ApplicantInputs {
    let country_of_origin = rng.pick_uniform(&cfg.countries);
    let gender = rng.pick_weighted(&cfg.gender_weights);
    let age = rng.uniform_int(cfg.age.min, cfg.age.max);
    let education_level = rng.pick_weighted(&cfg.education_weights);
    let language_proficiency = rng.pick_weighted(&cfg.language_weights);
    let family_size = rng.uniform_int(cfg.family_size.min, cfg.family_size.max);
    let prior_camp_years = rng.uniform_int(cfg.prior_camp_years.min, cfg.prior_camp_years.max);
    let persecution_ground = rng.pick_uniform(&cfg.persecution_grounds);
    let persecution_type = rng.pick_uniform(&cfg.persecution_types);
    let nexus_established = rng.chance(cfg.nexus_probability);

    let raw_protection = rng.normal(cfg.state_protection.mean, cfg.state_protection.std_dev);
    let state_protection_score = cfg.state_protection_clip.apply(raw_protection);

    let internal_relocation_possible = rng.chance(cfg.internal_relocation_probability);

    let p_trauma = trauma_probability(&cfg.trauma, country_of_origin, persecution_type);
    let reported_trauma = rng.chance(p_trauma);

    ApplicantInputs {
        id,
        country_of_origin,
        gender,
        age,
        education_level,
        language_proficiency,
        family_size,
        prior_camp_years,
        persecution_ground,
        persecution_type,
        nexus_established,
        state_protection_score,
        internal_relocation_possible,
        reported_trauma,
    }
}

/// Trauma rate conditioned on origin and persecution type.
pub fn trauma_probability(cfg: &TraumaConfig, country: Country, ptype: PersecutionType) -> f64 {
    let base = if cfg.high_rate_countries.contains(&country) {
        cfg.high_rate
    } else {
        cfg.base_rate
    };
    if cfg.uplift_types.contains(&ptype) {
        (base + cfg.type_uplift).min(cfg.cap)
    } else {
        base
    }
}
