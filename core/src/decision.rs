//! Decision stage: composite score, AI gate, human review and override.
//!
//! RULES:
//!   - The AI gate has three hard conjuncts: composite > threshold,
//!     credibility > minimum, nexus established. All comparisons are strict.
//!   - An override can only happen on a reviewed case.
//!   - final_decision differs from AI_decision exactly when overridden.
//!   - Review always adds a positive delay to processing time.

use crate::{
    config::DecisionConfig,
    rng::DatasetRng,
    sampler::ApplicantInputs,
    scoring::ApplicantScores,
    types::Decision,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecisionOutcome {
    pub composite_score: f64,
    pub ai_decision: Decision,
    pub human_reviewed: bool,
    pub human_override: bool,
    pub final_decision: Decision,
    pub processing_time_days: u32,
}

/// Weighted combination of risk, credibility, nexus and state protection.
pub fn composite_score(
    cfg: &DecisionConfig,
    risk: f64,
    credibility: f64,
    nexus_established: bool,
    state_protection: f64,
) -> f64 {
    let nexus = if nexus_established { 1.0 } else { 0.0 };
    cfg.risk_weight * risk
        + cfg.credibility_weight * credibility
        + cfg.nexus_weight * nexus
        + cfg.state_protection_weight * (1.0 - state_protection)
}

pub fn ai_decision(cfg: &DecisionConfig, composite: f64, credibility: f64, nexus_established: bool) -> Decision {
    if composite > cfg.approve_threshold && credibility > cfg.min_credibility && nexus_established {
        Decision::Approve
    } else {
        Decision::Deny
    }
}

/// Draw order: review, override (only if reviewed), base days, delay (only if reviewed).
pub fn decide(
    inputs: &ApplicantInputs,
    scores: &ApplicantScores,
    cfg: &DecisionConfig,
    rng: &mut DatasetRng,
) -> DecisionOutcome {
    let composite = composite_score(
        cfg,
        scores.risk_score,
        scores.credibility_score,
        inputs.nexus_established,
        inputs.state_protection_score,
    );
    let ai = ai_decision(cfg, composite, scores.credibility_score, inputs.nexus_established);

    let human_reviewed = rng.chance(cfg.review_probability);
    let human_override = human_reviewed && rng.chance(cfg.override_probability);
    let final_decision = if human_override { ai.flipped() } else { ai };

    let base_days = rng.uniform_int(cfg.base_processing_days.min, cfg.base_processing_days.max);
    let review_delay = if human_reviewed {
        rng.uniform_int(cfg.review_delay_days.min, cfg.review_delay_days.max)
    } else {
        0
    };

    if human_override {
        log::debug!(
            "applicant={} decision: reviewer overrode {} -> {}",
            inputs.id,
            ai.as_str(),
            final_decision.as_str()
        );
    }

    DecisionOutcome {
        composite_score: composite,
        ai_decision: ai,
        human_reviewed,
        human_override,
        final_decision,
        processing_time_days: base_days + review_delay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelConfig;
    use crate::scoring::tests::applicant;

    fn cfg() -> DecisionConfig {
        ModelConfig::standard().decision
    }

    #[test]
    fn composite_weights() {
        let s = composite_score(&cfg(), 1.0, 1.0, true, 0.0);
        assert!((s - 1.0).abs() < 1e-12);
        let s = composite_score(&cfg(), 0.8, 0.6, false, 0.3);
        assert!((s - (0.36 + 0.18 + 0.07)).abs() < 1e-12, "got {s}");
    }

    #[test]
    fn nexus_gate_is_absolute() {
        let c = cfg();
        let s = composite_score(&c, 0.99, 0.99, false, 0.05);
        assert!(s > c.approve_threshold);
        assert_eq!(ai_decision(&c, s, 0.99, false), Decision::Deny);
    }

    #[test]
    fn credibility_boundary_is_excluded() {
        let c = cfg();
        assert_eq!(ai_decision(&c, 0.95, 0.50, true), Decision::Deny);
        assert_eq!(ai_decision(&c, 0.95, 0.5000001, true), Decision::Approve);
    }

    #[test]
    fn composite_boundary_is_excluded() {
        let c = cfg();
        assert_eq!(ai_decision(&c, 0.62, 0.9, true), Decision::Deny);
    }

    #[test]
    fn override_flips_and_requires_review() {
        let c = cfg();
        let a = applicant();
        let scores = ApplicantScores {
            credibility_score: 0.8,
            risk_score: 0.9,
            risk_score_uncapped: 0.9,
            integration_score: 0.5,
        };
        let mut rng = DatasetRng::new(42);
        let mut overrides = 0;
        for _ in 0..2_000 {
            let d = decide(&a, &scores, &c, &mut rng);
            assert_eq!(d.ai_decision, Decision::Approve);
            assert!(!d.human_override || d.human_reviewed);
            assert_eq!(d.final_decision != d.ai_decision, d.human_override);
            if d.human_reviewed {
                assert!(d.processing_time_days >= 30 + 20);
            } else {
                assert!((30..=119).contains(&d.processing_time_days));
            }
            overrides += d.human_override as u32;
        }
        assert!(overrides > 0, "some reviewed cases should be overridden");
    }

    #[test]
    fn certain_review_always_delays() {
        let mut c = cfg();
        c.review_probability = 1.0;
        c.override_probability = 0.0;
        let mut rng = DatasetRng::new(1);
        let scores = ApplicantScores {
            credibility_score: 0.4,
            risk_score: 0.5,
            risk_score_uncapped: 0.5,
            integration_score: 0.5,
        };
        for _ in 0..200 {
            let d = decide(&applicant(), &scores, &c, &mut rng);
            assert!(d.human_reviewed && !d.human_override);
            assert!(d.processing_time_days >= 50 && d.processing_time_days <= 119 + 59);
        }
    }
}
