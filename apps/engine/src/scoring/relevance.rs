//! Relevance sub-score — cosine similarity between an embedding of the
//! profile text and the role embedding.
//!
//! When the embedding provider exceeds its bound the score degrades to a
//! keyword-overlap heuristic over the role description, and the degradation
//! is recorded as a warning on the breakdown — never hidden.

use std::collections::BTreeSet;

use tracing::warn;

use crate::embedding::{cosine_similarity, tokenize, EmbeddingProvider};
use crate::errors::EngineError;
use crate::models::profile::Profile;
use crate::models::role::RoleProfile;

use super::round1;

pub struct RelevanceOutcome {
    pub score: f64,
    pub explanation: String,
    pub warning: Option<String>,
}

pub async fn relevance_score(
    embedder: &dyn EmbeddingProvider,
    profile: &Profile,
    role: &RoleProfile,
) -> Result<RelevanceOutcome, EngineError> {
    let text = profile.free_text();

    match embedder.embed(&text).await {
        Ok(vector) => {
            let cosine = cosine_similarity(&vector, &role.embedding);
            // Negative cosine maps to 0: opposed text is simply irrelevant.
            let score = (f64::from(cosine.max(0.0)) * 100.0).clamp(0.0, 100.0);
            Ok(RelevanceOutcome {
                score,
                explanation: format!(
                    "Relevance {:.1}%: cosine similarity {:.3} between profile text and \
                     the '{}' role embedding.",
                    round1(score),
                    cosine,
                    role.name,
                ),
                warning: None,
            })
        }
        Err(EngineError::UpstreamTimeout {
            service,
            timeout_ms,
        }) => {
            warn!("{service} call exceeded {timeout_ms}ms; degrading relevance to keyword overlap");
            let (score, matched, total) = keyword_overlap(&text, &role.description);
            Ok(RelevanceOutcome {
                score,
                explanation: format!(
                    "Relevance {:.1}% (keyword overlap): {matched} of {total} role terms \
                     found in the profile.",
                    round1(score),
                ),
                warning: Some(format!(
                    "Embedding call exceeded {timeout_ms}ms; relevance degraded to keyword overlap."
                )),
            })
        }
        Err(other) => Err(other),
    }
}

/// Share of role-description terms present in the profile text, ×100.
fn keyword_overlap(profile_text: &str, role_description: &str) -> (f64, usize, usize) {
    let profile_tokens: BTreeSet<String> = tokenize(profile_text).into_iter().collect();
    let role_tokens: BTreeSet<String> = tokenize(role_description).into_iter().collect();
    if role_tokens.is_empty() {
        return (0.0, 0, 0);
    }
    let matched = role_tokens
        .iter()
        .filter(|token| profile_tokens.contains(*token))
        .count();
    let score = matched as f64 / role_tokens.len() as f64 * 100.0;
    (score, matched, role_tokens.len())
}
