use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use engine::config::EngineConfig;
use engine::embedding::{EmbeddingProvider, HashedBagOfWords, HttpEmbeddingClient};
use engine::engine::Engine;
use engine::models::profile::RawProfile;

const USAGE: &str = "usage: engine <profile.json> <target-role> [current-role]";

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (defaults apply for anything unset)
    let config = EngineConfig::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Waypoint engine v{}", env!("CARGO_PKG_VERSION"));

    // Pick the embedding provider: HTTP when configured, offline otherwise
    let embedder: Arc<dyn EmbeddingProvider> = match &config.embed_endpoint {
        Some(endpoint) => {
            info!(
                "Embedding provider: {endpoint} (timeout {}ms)",
                config.embed_timeout_ms
            );
            Arc::new(HttpEmbeddingClient::new(
                endpoint.clone(),
                config.embed_api_key.clone(),
                config.embed_timeout_ms,
            ))
        }
        None => {
            info!("No embedding endpoint configured; using offline provider");
            Arc::new(HashedBagOfWords::default())
        }
    };

    let waypoint = Engine::bootstrap(&config, embedder).await?;
    info!("Roles available: {}", waypoint.roles().names().join(", "));

    let mut args = std::env::args().skip(1);
    let profile_path: PathBuf = args.next().context(USAGE)?.into();
    let target_role = args.next().context(USAGE)?;

    let raw_profile: RawProfile = serde_json::from_str(
        &std::fs::read_to_string(&profile_path)
            .with_context(|| format!("Failed to read profile '{}'", profile_path.display()))?,
    )
    .context("Malformed profile JSON")?;

    // Default the current role to the most recent experience title
    let current_role = args.next().unwrap_or_else(|| {
        raw_profile
            .experience
            .first()
            .map(|entry| entry.title.clone())
            .unwrap_or_else(|| "Current role".to_string())
    });

    let evaluation = waypoint
        .evaluate(raw_profile, &current_role, &target_role)
        .await?;

    println!("{}", serde_json::to_string_pretty(&evaluation)?);
    Ok(())
}
