//! Embedding provider — the single entry point for semantic vectors.
//!
//! The provider is a trait object so the engine never couples to one
//! embedding technology: the HTTP client talks to an external service with a
//! bounded timeout, and the hashed bag-of-words provider gives a fully
//! deterministic offline fallback for tests and air-gapped runs.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::EngineError;

#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embeds a text into a fixed-length vector. Implementations must be
    /// pure with respect to their input; a stalled upstream call surfaces as
    /// `EngineError::UpstreamTimeout` rather than blocking the request.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EngineError>;
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

/// HTTP embedding client. One call per request, no automatic retries —
/// retry policy belongs to the caller.
pub struct HttpEmbeddingClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    timeout_ms: u64,
}

impl HttpEmbeddingClient {
    pub fn new(endpoint: String, api_key: Option<String>, timeout_ms: u64) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_millis(timeout_ms))
                .build()
                .expect("Failed to build HTTP client"),
            endpoint,
            api_key,
            timeout_ms,
        }
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EngineError> {
        let mut request = self.client.post(&self.endpoint).json(&EmbedRequest { input: text });
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                EngineError::UpstreamTimeout {
                    service: "embedding",
                    timeout_ms: self.timeout_ms,
                }
            } else {
                EngineError::Upstream {
                    service: "embedding",
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EngineError::Upstream {
                service: "embedding",
                message: format!("status {status}: {body}"),
            });
        }

        let parsed: EmbedResponse = response.json().await.map_err(|e| EngineError::Upstream {
            service: "embedding",
            message: format!("malformed response: {e}"),
        })?;

        debug!("Embedding call succeeded ({} dims)", parsed.embedding.len());
        Ok(parsed.embedding)
    }
}

/// Deterministic offline provider: tokens are hashed into a fixed number of
/// buckets and the result is L2-normalized. Crude semantically, but pure and
/// reproducible — identical inputs always produce identical vectors.
pub struct HashedBagOfWords {
    dims: usize,
}

impl HashedBagOfWords {
    pub fn new(dims: usize) -> Self {
        Self { dims }
    }
}

impl Default for HashedBagOfWords {
    fn default() -> Self {
        Self::new(256)
    }
}

#[async_trait]
impl EmbeddingProvider for HashedBagOfWords {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EngineError> {
        let mut vector = vec![0.0f32; self.dims];
        for token in tokenize(text) {
            let mut hasher = DefaultHasher::new();
            token.hash(&mut hasher);
            let bucket = (hasher.finish() as usize) % self.dims;
            vector[bucket] += 1.0;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }
        Ok(vector)
    }
}

/// Lowercase alphanumeric tokens of length > 1.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.len() > 1)
        .map(|token| token.to_string())
        .collect()
}

/// Cosine similarity in [-1, 1]. Mismatched lengths or zero vectors yield 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|v| v * v).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hashed_bag_of_words_is_deterministic() {
        let provider = HashedBagOfWords::default();
        let a = provider.embed("python machine learning").await.unwrap();
        let b = provider.embed("python machine learning").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_similar_texts_score_higher_than_unrelated() {
        let provider = HashedBagOfWords::default();
        let ml = provider
            .embed("python machine learning models")
            .await
            .unwrap();
        let ml2 = provider
            .embed("machine learning models in python")
            .await
            .unwrap();
        let cooking = provider.embed("sourdough bread baking").await.unwrap();

        assert!(cosine_similarity(&ml, &ml2) > cosine_similarity(&ml, &cooking));
    }

    #[test]
    fn test_cosine_identical_vectors_is_one() {
        let v = vec![1.0, 2.0, 3.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_handles_degenerate_inputs() {
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }

    #[test]
    fn test_cosine_opposed_vectors_is_negative() {
        assert!(cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) < 0.0);
    }

    #[test]
    fn test_tokenize_strips_punctuation_and_short_tokens() {
        assert_eq!(
            tokenize("ML, Python 3 — and SQL!"),
            vec!["ml", "python", "and", "sql"]
        );
    }
}
