//! Engagement prediction — a pure score of how likely the candidate is to
//! finish a recommended activity.
//!
//! The model sits behind a trait so the ranking logic never couples to one
//! technology: anything satisfying (features, difficulty) → [0, 100] is an
//! acceptable implementation, including a trained model.

use crate::models::profile::Profile;
use crate::models::report::GapPriority;

/// Candidate-side features for engagement prediction.
#[derive(Debug, Clone, Copy)]
pub struct CandidateFeatures {
    /// Completion-history proxy in [0, 1].
    pub prior_completion_rate: f64,
    /// Priority of the gap the activity closes.
    pub priority: GapPriority,
}

impl CandidateFeatures {
    /// Derives features from the profile. Without activity telemetry the
    /// completion proxy comes from finished-credential evidence —
    /// certifications and quantified achievements.
    pub fn from_profile(profile: &Profile, priority: GapPriority) -> Self {
        let evidence = profile.certifications.len() + profile.quantified_achievements();
        Self {
            prior_completion_rate: (0.4 + evidence as f64 * 0.1).min(1.0),
            priority,
        }
    }
}

/// Contract: pure function, no hidden state mutated per call.
pub trait EngagementModel: Send + Sync {
    fn predict(&self, features: &CandidateFeatures, difficulty: u8) -> f64;
}

/// Default model: historical completion rate by difficulty tier blended with
/// the candidate's own completion proxy, plus a modest boost for
/// higher-priority gaps (motivation follows urgency).
pub struct CompletionRateModel {
    /// Observed completion rates for difficulty tiers 1–5.
    completion_by_difficulty: [f64; 5],
}

impl Default for CompletionRateModel {
    fn default() -> Self {
        Self {
            completion_by_difficulty: [0.92, 0.84, 0.71, 0.55, 0.38],
        }
    }
}

impl EngagementModel for CompletionRateModel {
    fn predict(&self, features: &CandidateFeatures, difficulty: u8) -> f64 {
        let tier = usize::from(difficulty.clamp(1, 5)) - 1;
        let base = self.completion_by_difficulty[tier];
        let boost = match features.priority {
            GapPriority::High => 10.0,
            GapPriority::Medium => 5.0,
            GapPriority::Low => 0.0,
        };
        (70.0 * base + 30.0 * features.prior_completion_rate.clamp(0.0, 1.0) + boost)
            .clamp(0.0, 100.0)
    }
}
