use std::str::FromStr;

use anyhow::{Context, Result};

/// Engine configuration loaded from environment variables.
///
/// Every tunable the design leaves open is an explicit, env-overridable
/// constant here rather than a hidden literal: the fuzzy match threshold,
/// the bias penalty tables, the BFS hop bound, and the embedding timeout
/// all have documented defaults.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Directory holding taxonomy.json, roles.json and graph.json.
    pub data_dir: String,
    /// Optional embedding service endpoint. When unset the engine uses the
    /// deterministic offline provider.
    pub embed_endpoint: Option<String>,
    pub embed_api_key: Option<String>,
    /// Bound on a single embedding call; exceeding it degrades relevance
    /// scoring instead of blocking the request.
    pub embed_timeout_ms: u64,
    /// Minimum normalized edit-similarity for a fuzzy skill match.
    pub fuzzy_match_threshold: f64,
    /// Two fuzzy candidates within this band of each other are ambiguous
    /// and resolve to no match.
    pub fuzzy_ambiguity_band: f64,
    /// Hop bound for shortest-path queries on the knowledge graph.
    pub max_path_hops: usize,
    /// Graduation years older than this many years flag the age detector.
    pub age_lookback_years: i32,
    /// Penalty per flagged term, per detector.
    pub gender_penalty: u32,
    pub age_penalty: u32,
    pub cultural_penalty: u32,
    pub socioeconomic_penalty: u32,
    /// Prestige-to-achievement signal ratio above which the socioeconomic
    /// detector starts penalizing.
    pub prestige_ratio_limit: f64,
    /// Proficiency level a skill gap aims for.
    pub target_proficiency: u8,
    pub rust_log: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            embed_endpoint: None,
            embed_api_key: None,
            embed_timeout_ms: 3_000,
            fuzzy_match_threshold: 0.85,
            fuzzy_ambiguity_band: 0.02,
            max_path_hops: 6,
            age_lookback_years: 20,
            gender_penalty: 15,
            age_penalty: 20,
            cultural_penalty: 15,
            socioeconomic_penalty: 20,
            prestige_ratio_limit: 0.5,
            target_proficiency: 70,
            rust_log: "info".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Self::default();
        Ok(EngineConfig {
            data_dir: std::env::var("DATA_DIR").unwrap_or(defaults.data_dir),
            embed_endpoint: std::env::var("EMBED_ENDPOINT").ok(),
            embed_api_key: std::env::var("EMBED_API_KEY").ok(),
            embed_timeout_ms: env_parse("EMBED_TIMEOUT_MS", defaults.embed_timeout_ms)?,
            fuzzy_match_threshold: env_parse(
                "FUZZY_MATCH_THRESHOLD",
                defaults.fuzzy_match_threshold,
            )?,
            fuzzy_ambiguity_band: env_parse("FUZZY_AMBIGUITY_BAND", defaults.fuzzy_ambiguity_band)?,
            max_path_hops: env_parse("MAX_PATH_HOPS", defaults.max_path_hops)?,
            age_lookback_years: env_parse("AGE_LOOKBACK_YEARS", defaults.age_lookback_years)?,
            gender_penalty: env_parse("GENDER_PENALTY", defaults.gender_penalty)?,
            age_penalty: env_parse("AGE_PENALTY", defaults.age_penalty)?,
            cultural_penalty: env_parse("CULTURAL_PENALTY", defaults.cultural_penalty)?,
            socioeconomic_penalty: env_parse(
                "SOCIOECONOMIC_PENALTY",
                defaults.socioeconomic_penalty,
            )?,
            prestige_ratio_limit: env_parse("PRESTIGE_RATIO_LIMIT", defaults.prestige_ratio_limit)?,
            target_proficiency: env_parse("TARGET_PROFICIENCY", defaults.target_proficiency)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
        })
    }
}

fn env_parse<T: FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' is not a valid value")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_constants() {
        let config = EngineConfig::default();
        assert!((config.fuzzy_match_threshold - 0.85).abs() < f64::EPSILON);
        assert_eq!(config.max_path_hops, 6);
        assert_eq!(config.target_proficiency, 70);
        assert_eq!(config.age_lookback_years, 20);
    }
}
