//! Score stage: credibility, risk and integration.
//!
//! Each score is a fixed linear formula over intake fields plus exactly
//! one fresh noise draw. Results are clipped, never resampled.
//! The `*_with_noise` functions are the pure formulas; the sampling
//! wrappers only add the draw.

use crate::{config::ScoringConfig, rng::DatasetRng, sampler::ApplicantInputs};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ApplicantScores {
    pub credibility_score: f64,
    pub risk_score: f64,
    /// Pre-clip risk. Kept so the saturation at 1.0 stays visible.
    pub risk_score_uncapped: f64,
    pub integration_score: f64,
}

/// Run the three scorers in column order: credibility, risk, integration.
/// Expects a ScoringConfig from a validated ModelConfig.
pub fn score_applicant(
    inputs: &ApplicantInputs,
    cfg: &ScoringConfig,
    rng: &mut DatasetRng,
) -> ApplicantScores {
    let credibility_score = credibility_score(inputs, cfg, rng);
    let (risk_score_uncapped, risk_score) = risk_score(inputs, cfg, rng);
    let integration_score = integration_score(inputs, credibility_score, cfg, rng);
    ApplicantScores {
        credibility_score,
        risk_score,
        risk_score_uncapped,
        integration_score,
    }
}

pub fn credibility_score(inputs: &ApplicantInputs, cfg: &ScoringConfig, rng: &mut DatasetRng) -> f64 {
    let base = rng.normal(cfg.credibility_noise.mean, cfg.credibility_noise.std_dev);
    credibility_with_noise(inputs, cfg, base)
}

/// `base` is the Normal(0.65, 0.15) draw.
pub fn credibility_with_noise(inputs: &ApplicantInputs, cfg: &ScoringConfig, base: f64) -> f64 {
    let lang = effect(&cfg.language_effects, &inputs.language_proficiency);
    let edu = effect(&cfg.education_effects, &inputs.education_level);
    let trauma = if inputs.reported_trauma { cfg.trauma_penalty } else { 0.0 };
    cfg.score_clip.apply(base + lang + edu + trauma)
}

/// Returns (uncapped, capped).
pub fn risk_score(inputs: &ApplicantInputs, cfg: &ScoringConfig, rng: &mut DatasetRng) -> (f64, f64) {
    let noise = rng.normal(cfg.risk_noise.mean, cfg.risk_noise.std_dev);
    risk_with_noise(inputs, cfg, noise)
}

pub fn risk_with_noise(inputs: &ApplicantInputs, cfg: &ScoringConfig, noise: f64) -> (f64, f64) {
    let uncapped = effect(&cfg.country_base_risk, &inputs.country_of_origin)
        + effect(&cfg.gender_effects, &inputs.gender)
        + effect(&cfg.persecution_effects, &inputs.persecution_type)
        + noise;
    (uncapped, cfg.score_clip.apply(uncapped))
}

pub fn integration_score(
    inputs: &ApplicantInputs,
    credibility: f64,
    cfg: &ScoringConfig,
    rng: &mut DatasetRng,
) -> f64 {
    let noise = rng.next_f64();
    integration_with_noise(inputs, credibility, cfg, noise)
}

/// `noise` is a uniform [0, 1) draw independent of the credibility draw.
pub fn integration_with_noise(
    inputs: &ApplicantInputs,
    credibility: f64,
    cfg: &ScoringConfig,
    noise: f64,
) -> f64 {
    let age_gap = (inputs.age as f64 - cfg.integration_age_pivot).abs() / cfg.integration_age_pivot;
    let raw = cfg.integration_credibility_weight * credibility
        + cfg.integration_age_weight * (1.0 - age_gap)
        + cfg.integration_noise_weight * noise;
    cfg.score_clip.apply(raw)
}

// Tables are checked complete by ModelConfig::validate.
fn effect<K: Eq + std::hash::Hash>(table: &std::collections::HashMap<K, f64>, key: &K) -> f64 {
    table.get(key).copied().unwrap_or_default()
}
