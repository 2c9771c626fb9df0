//! Fairness Audit Engine — independent, composable bias detectors over the
//! normalized profile, aggregated into an overall fairness score.
//!
//! Status thresholds are fixed policy, not learned: fail below 60, warning
//! below 85, pass otherwise. The overall score is the unweighted mean of the
//! detector scores, rounded half-up.

pub mod detectors;

use std::collections::BTreeMap;

use crate::config::EngineConfig;
use crate::models::profile::Profile;
use crate::models::report::{AuditResult, AuditStatus, DetectorResult};

pub const FAIL_BELOW: u32 = 60;
pub const WARN_BELOW: u32 = 85;

/// What a single detector found: a 0–100 score (higher is cleaner) and the
/// concrete flags that drove any penalty.
#[derive(Debug, Clone)]
pub struct Finding {
    pub score: u32,
    pub flags: Vec<String>,
}

/// One bias dimension. Detectors are pure functions of the profile and run
/// independently of each other.
pub trait BiasDetector: Send + Sync {
    fn category(&self) -> &'static str;
    fn detect(&self, profile: &Profile) -> Finding;
    /// Template for the recommendation emitted when this detector does not
    /// pass, parameterized by the flags found.
    fn recommendation(&self, flags: &[String]) -> String;
}

pub fn status_for(score: u32) -> AuditStatus {
    if score < FAIL_BELOW {
        AuditStatus::Fail
    } else if score < WARN_BELOW {
        AuditStatus::Warning
    } else {
        AuditStatus::Pass
    }
}

pub struct FairnessAuditor {
    detectors: Vec<Box<dyn BiasDetector>>,
}

impl FairnessAuditor {
    pub fn new(detectors: Vec<Box<dyn BiasDetector>>) -> Self {
        Self { detectors }
    }

    /// The standard four-detector auditor.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(vec![
            Box::new(detectors::GenderBiasDetector::new(config.gender_penalty)),
            Box::new(detectors::AgeBiasDetector::new(
                config.age_penalty,
                config.age_lookback_years,
            )),
            Box::new(detectors::CulturalBiasDetector::new(
                config.cultural_penalty,
            )),
            Box::new(detectors::SocioeconomicBiasDetector::new(
                config.socioeconomic_penalty,
                config.prestige_ratio_limit,
            )),
        ])
    }

    pub fn audit(&self, profile: &Profile) -> AuditResult {
        let mut categories = BTreeMap::new();
        let mut recommendations = Vec::new();

        for detector in &self.detectors {
            let finding = detector.detect(profile);
            let status = status_for(finding.score);

            if status != AuditStatus::Pass {
                recommendations.push(detector.recommendation(&finding.flags));
            }

            let details = if finding.flags.is_empty() {
                format!("No {} signals detected.", detector.category())
            } else {
                format!(
                    "{} signal(s): {}.",
                    finding.flags.len(),
                    finding.flags.join(", ")
                )
            };

            categories.insert(
                detector.category().to_string(),
                DetectorResult {
                    score: finding.score,
                    status,
                    details,
                    flags: finding.flags,
                },
            );
        }

        let overall = if categories.is_empty() {
            100
        } else {
            let sum: u32 = categories.values().map(|r| r.score).sum();
            (f64::from(sum) / categories.len() as f64).round() as u32
        };

        AuditResult {
            categories,
            overall,
            recommendations,
        }
    }
}
