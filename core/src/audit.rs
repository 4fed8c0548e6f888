//! Outcome and audit stage: appeals and the fairness-audit bias flag.
//!
//! The bias flag is drawn last. It reads upstream fields and never
//! changes them.

use crate::{
    config::AuditConfig,
    decision::DecisionOutcome,
    rng::DatasetRng,
    sampler::ApplicantInputs,
    scoring::ApplicantScores,
    types::{AppealOutcome, BiasFlag, Decision},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditOutcome {
    pub appealed: bool,
    pub appeal_outcome: AppealOutcome,
    pub bias_flag: BiasFlag,
}

/// Which weight profile the bias flag was drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiasProfile {
    Baseline,
    TraumaLowCredibility,
    NexusDenied,
}

/// Trauma with low credibility wins when both elevated conditions hold.
pub fn bias_profile(
    cfg: &AuditConfig,
    inputs: &ApplicantInputs,
    credibility: f64,
    final_decision: Decision,
) -> BiasProfile {
    if inputs.reported_trauma && credibility < cfg.low_credibility_threshold {
        BiasProfile::TraumaLowCredibility
    } else if inputs.nexus_established && final_decision == Decision::Deny {
        BiasProfile::NexusDenied
    } else {
        BiasProfile::Baseline
    }
}

impl AuditConfig {
    pub fn bias_weights(&self, profile: BiasProfile) -> &[(BiasFlag, f64)] {
        match profile {
            BiasProfile::Baseline => &self.baseline_bias_weights,
            BiasProfile::TraumaLowCredibility => &self.trauma_low_credibility_bias_weights,
            BiasProfile::NexusDenied => &self.nexus_denied_bias_weights,
        }
    }
}

/// Draw order: appeal (deny only), outcome (appealed only), bias flag.
pub fn audit(
    inputs: &ApplicantInputs,
    scores: &ApplicantScores,
    decision: &DecisionOutcome,
    cfg: &AuditConfig,
    rng: &mut DatasetRng,
) -> AuditOutcome {
    let appealed = decision.final_decision == Decision::Deny && rng.chance(cfg.appeal_probability);

    let appeal_outcome = if !appealed {
        AppealOutcome::NotApplicable
    } else if rng.chance(cfg.overturn_probability) {
        AppealOutcome::Overturned
    } else {
        AppealOutcome::Upheld
    };

    let profile = bias_profile(cfg, inputs, scores.credibility_score, decision.final_decision);
    let bias_flag = rng.pick_weighted(cfg.bias_weights(profile));

    AuditOutcome {
        appealed,
        appeal_outcome,
        bias_flag,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelConfig;
    use crate::scoring::tests::applicant;

    fn decision(final_decision: Decision) -> DecisionOutcome {
        DecisionOutcome {
            composite_score: 0.5,
            ai_decision: final_decision,
            human_reviewed: false,
            human_override: false,
            final_decision,
            processing_time_days: 60,
        }
    }

    fn scores(credibility: f64) -> ApplicantScores {
        ApplicantScores {
            credibility_score: credibility,
            risk_score: 0.7,
            risk_score_uncapped: 0.7,
            integration_score: 0.5,
        }
    }

    #[test]
    fn approved_cases_never_appeal() {
        let cfg = ModelConfig::standard().audit;
        let mut rng = DatasetRng::new(42);
        for _ in 0..1_000 {
            let out = audit(&applicant(), &scores(0.8), &decision(Decision::Approve), &cfg, &mut rng);
            assert!(!out.appealed);
            assert_eq!(out.appeal_outcome, AppealOutcome::NotApplicable);
        }
    }

    #[test]
    fn appeal_outcome_set_iff_appealed() {
        let cfg = ModelConfig::standard().audit;
        let mut rng = DatasetRng::new(7);
        let mut appeals = 0;
        for _ in 0..1_000 {
            let out = audit(&applicant(), &scores(0.8), &decision(Decision::Deny), &cfg, &mut rng);
            assert_eq!(out.appealed, out.appeal_outcome != AppealOutcome::NotApplicable);
            appeals += out.appealed as u32;
        }
        assert!((200..400).contains(&appeals), "appeal count {appeals}");
    }

    #[test]
    fn trauma_with_low_credibility_takes_precedence() {
        let cfg = ModelConfig::standard().audit;
        let mut a = applicant();
        a.reported_trauma = true;
        a.nexus_established = true;
        assert_eq!(bias_profile(&cfg, &a, 0.49, Decision::Deny), BiasProfile::TraumaLowCredibility);
        assert_eq!(bias_profile(&cfg, &a, 0.50, Decision::Deny), BiasProfile::NexusDenied);
        assert_eq!(bias_profile(&cfg, &a, 0.50, Decision::Approve), BiasProfile::Baseline);
    }

    #[test]
    fn elevated_profiles_shift_mass_from_none() {
        let cfg = ModelConfig::standard().audit;
        let none_weight = |p: BiasProfile| {
            cfg.bias_weights(p)
                .iter()
                .find(|(f, _)| *f == BiasFlag::None)
                .map(|(_, w)| *w)
                .unwrap_or(0.0)
        };
        let baseline = none_weight(BiasProfile::Baseline);
        assert!(none_weight(BiasProfile::TraumaLowCredibility) < baseline);
        assert!(none_weight(BiasProfile::NexusDenied) < baseline);
    }

    fn none_share(inputs: &ApplicantInputs, credibility: f64, final_decision: Decision) -> f64 {
        let cfg = ModelConfig::standard().audit;
        let mut rng = DatasetRng::new(42);
        let draws = 20_000;
        let none = (0..draws)
            .filter(|_| {
                let out = audit(inputs, &scores(credibility), &decision(final_decision), &cfg, &mut rng);
                out.bias_flag == BiasFlag::None
            })
            .count();
        none as f64 / draws as f64
    }

    #[test]
    fn drawn_flags_follow_the_profile_weights() {
        let mut baseline = applicant();
        baseline.nexus_established = false;
        let mut trauma = applicant();
        trauma.reported_trauma = true;
        trauma.nexus_established = false;
        let nexus_denied = applicant();

        let base = none_share(&baseline, 0.8, Decision::Deny);
        let low_cred = none_share(&trauma, 0.4, Decision::Approve);
        let denied = none_share(&nexus_denied, 0.8, Decision::Deny);

        assert!((base - 0.70).abs() < 0.02, "baseline none share {base:.3}");
        assert!((low_cred - 0.40).abs() < 0.02, "trauma low-credibility none share {low_cred:.3}");
        assert!((denied - 0.50).abs() < 0.02, "nexus denied none share {denied:.3}");
        assert!(low_cred < base && denied < base);
    }
}
