//! Scoring Engine — Strength / Relevance / Completeness sub-scores and a
//! weighted composite, each carrying an explanation generated from the same
//! inputs that produced the number.
//!
//! Rounding policy: every published score is rounded half-up to one decimal
//! via `round1`, applied when a category lands in the breakdown and again on
//! the composite. This is the one rounding rule for the whole engine.

pub mod relevance;
pub mod strength;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::embedding::EmbeddingProvider;
use crate::errors::EngineError;
use crate::models::profile::Profile;
use crate::models::report::{CategoryScore, ScoreBreakdown};
use crate::models::role::RoleProfile;
use crate::taxonomy::SkillId;

/// Composite weights, expressed as shares of 100.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CompositeWeights {
    pub strength: u32,
    pub relevance: u32,
    pub completeness: u32,
}

impl Default for CompositeWeights {
    fn default() -> Self {
        Self {
            strength: 40,
            relevance: 35,
            completeness: 25,
        }
    }
}

impl CompositeWeights {
    pub fn validate(&self) -> Result<(), EngineError> {
        let sum = self.strength + self.relevance + self.completeness;
        if sum != 100 {
            return Err(EngineError::InvalidWeights { sum });
        }
        Ok(())
    }
}

/// Round half-up to one decimal.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub struct ScoringEngine {
    weights: CompositeWeights,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl ScoringEngine {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            weights: CompositeWeights::default(),
            embedder,
        }
    }

    pub fn with_weights(embedder: Arc<dyn EmbeddingProvider>, weights: CompositeWeights) -> Self {
        Self { weights, embedder }
    }

    /// Scores a profile against a target role. Deterministic for fixed
    /// inputs, taxonomy and embeddings; fails fast on invalid weights.
    pub async fn score(
        &self,
        profile: &Profile,
        role: &RoleProfile,
    ) -> Result<ScoreBreakdown, EngineError> {
        self.weights.validate()?;

        let (strength, strength_explanation) = strength::strength_score(profile);
        let (completeness, completeness_explanation) = completeness_score(profile, role);
        let relevance = relevance::relevance_score(self.embedder.as_ref(), profile, role).await?;

        let strength = round1(strength);
        let completeness = round1(completeness);
        let relevance_score = round1(relevance.score);

        let composite = weighted_composite(
            strength,
            relevance_score,
            completeness,
            &self.weights,
        );

        let mut categories = BTreeMap::new();
        categories.insert(
            "strength".to_string(),
            CategoryScore {
                score: strength,
                weight: self.weights.strength,
                explanation: strength_explanation,
            },
        );
        categories.insert(
            "relevance".to_string(),
            CategoryScore {
                score: relevance_score,
                weight: self.weights.relevance,
                explanation: relevance.explanation,
            },
        );
        categories.insert(
            "completeness".to_string(),
            CategoryScore {
                score: completeness,
                weight: self.weights.completeness,
                explanation: completeness_explanation,
            },
        );

        let warnings = relevance.warning.into_iter().collect();

        Ok(ScoreBreakdown {
            categories,
            composite,
            warnings,
        })
    }
}

/// Weighted average of already-rounded category scores, rounded once more.
pub(crate) fn weighted_composite(
    strength: f64,
    relevance: f64,
    completeness: f64,
    weights: &CompositeWeights,
) -> f64 {
    round1(
        (strength * weights.strength as f64
            + relevance * weights.relevance as f64
            + completeness * weights.completeness as f64)
            / 100.0,
    )
}

/// Completeness = essential skills present / essential skills required.
/// An empty essential set is vacuously complete — an explicit policy, not an
/// error.
pub(crate) fn completeness_score(profile: &Profile, role: &RoleProfile) -> (f64, String) {
    let essential: Vec<&SkillId> = role.essential().collect();
    if essential.is_empty() {
        return (
            100.0,
            format!(
                "No essential skills defined for role '{}'; vacuously complete.",
                role.name
            ),
        );
    }

    let missing: Vec<&str> = essential
        .iter()
        .filter(|id| !profile.has_skill(id))
        .map(|id| id.as_str())
        .collect();
    let present = essential.len() - missing.len();
    let score = present as f64 / essential.len() as f64 * 100.0;

    let explanation = if missing.is_empty() {
        format!(
            "Completeness {:.1}%: all {} essential skills present.",
            round1(score),
            essential.len()
        )
    } else {
        format!(
            "Completeness {:.1}%: {present} of {} essential skills present; missing: {}.",
            round1(score),
            essential.len(),
            missing.join(", ")
        )
    };
    (score, explanation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::HashedBagOfWords;
    use crate::models::profile::SkillClaim;
    use crate::models::role::{Requirement, RequiredSkill};
    use uuid::Uuid;

    fn make_profile(skills: &[&str]) -> Profile {
        Profile {
            id: Uuid::new_v4(),
            summary: Some("Analytics engineer working with python and sql".to_string()),
            experience: vec![],
            education: vec![],
            skills: skills
                .iter()
                .map(|id| SkillClaim {
                    id: SkillId::new(*id),
                    proficiency: None,
                })
                .collect(),
            certifications: vec![],
        }
    }

    fn make_role(essential: &[&str], desirable: &[&str]) -> RoleProfile {
        let mut required: Vec<RequiredSkill> = essential
            .iter()
            .map(|id| RequiredSkill {
                id: SkillId::new(*id),
                requirement: Requirement::Essential,
            })
            .collect();
        required.extend(desirable.iter().map(|id| RequiredSkill {
            id: SkillId::new(*id),
            requirement: Requirement::Desirable,
        }));
        RoleProfile {
            name: "Data Scientist".to_string(),
            description: "python machine learning statistics".to_string(),
            required,
            embedding: vec![],
        }
    }

    #[test]
    fn test_invalid_weights_rejected() {
        let weights = CompositeWeights {
            strength: 40,
            relevance: 35,
            completeness: 35,
        };
        let err = weights.validate().unwrap_err();
        assert!(matches!(err, EngineError::InvalidWeights { sum: 110 }));
    }

    #[test]
    fn test_default_weights_sum_to_100() {
        CompositeWeights::default().validate().unwrap();
    }

    #[test]
    fn test_weighted_composite_matches_worked_example() {
        // 0.40×80 + 0.35×60 + 0.25×33.3 = 61.325 → 61.3
        let composite = weighted_composite(80.0, 60.0, 33.3, &CompositeWeights::default());
        assert!((composite - 61.3).abs() < 1e-9, "got {composite}");
    }

    #[test]
    fn test_round1_is_half_up() {
        assert_eq!(round1(61.325), 61.3);
        assert_eq!(round1(61.35), 61.4);
        assert_eq!(round1(0.05), 0.1);
    }

    #[test]
    fn test_completeness_vacuous_when_no_essentials() {
        let profile = make_profile(&[]);
        let role = make_role(&[], &["sql"]);
        let (score, explanation) = completeness_score(&profile, &role);
        assert_eq!(score, 100.0);
        assert!(explanation.contains("vacuously complete"));
    }

    #[test]
    fn test_completeness_one_third_with_missing_named() {
        let profile = make_profile(&["python", "pandas", "sql"]);
        let role = make_role(&["python", "machine_learning", "deep_learning"], &["sql"]);
        let (score, explanation) = completeness_score(&profile, &role);
        assert!((score - 100.0 / 3.0).abs() < 1e-9);
        assert!(explanation.contains("1 of 3"));
        assert!(explanation.contains("machine_learning"));
        assert!(explanation.contains("deep_learning"));
        assert!(!explanation.contains("sql"), "desirable skills never gate completeness");
    }

    #[tokio::test]
    async fn test_score_breakdown_weights_sum_and_composite_range() {
        let engine = ScoringEngine::new(Arc::new(HashedBagOfWords::default()));
        let profile = make_profile(&["python", "sql"]);
        let mut role = make_role(&["python", "machine_learning"], &[]);
        role.embedding = vec![0.1; 256];

        let breakdown = engine.score(&profile, &role).await.unwrap();
        assert_eq!(breakdown.weight_sum(), 100);
        assert!(breakdown.composite >= 0.0 && breakdown.composite <= 100.0);
        assert_eq!(breakdown.categories.len(), 3);
        for category in breakdown.categories.values() {
            assert!(category.score >= 0.0 && category.score <= 100.0);
            assert!(!category.explanation.is_empty());
        }
    }

    #[tokio::test]
    async fn test_score_is_deterministic() {
        let engine = ScoringEngine::new(Arc::new(HashedBagOfWords::default()));
        let profile = make_profile(&["python"]);
        let mut role = make_role(&["python"], &[]);
        role.embedding = vec![0.2; 256];

        let first = engine.score(&profile, &role).await.unwrap();
        let second = engine.score(&profile, &role).await.unwrap();
        assert_eq!(first.composite, second.composite);
        assert_eq!(
            first.categories.get("relevance").unwrap().score,
            second.categories.get("relevance").unwrap().score
        );
    }

    #[tokio::test]
    async fn test_score_with_invalid_weights_fails() {
        let engine = ScoringEngine::with_weights(
            Arc::new(HashedBagOfWords::default()),
            CompositeWeights {
                strength: 50,
                relevance: 50,
                completeness: 50,
            },
        );
        let profile = make_profile(&[]);
        let role = make_role(&[], &[]);
        let err = engine.score(&profile, &role).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidWeights { .. }));
    }
}
