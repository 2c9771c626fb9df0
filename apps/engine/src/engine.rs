//! Pipeline facade — wires the component engines together over shared
//! read-only state and runs one full evaluation per call.
//!
//! All state here is immutable after bootstrap (the graph store swaps whole
//! snapshots), so evaluations for different profiles run fully in parallel
//! with no coordination.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::audit::FairnessAuditor;
use crate::catalog::{self, RoleCatalog};
use crate::config::EngineConfig;
use crate::embedding::EmbeddingProvider;
use crate::errors::EngineError;
use crate::graph::ingest;
use crate::graph::store::GraphStore;
use crate::models::profile::RawProfile;
use crate::models::report::{
    AuditResult, Recommendations, Roadmap, ScoreBreakdown, SkillGap,
};
use crate::recommend::engagement::CompletionRateModel;
use crate::recommend::RecommendationEngine;
use crate::roadmap::build_roadmap;
use crate::scoring::ScoringEngine;
use crate::taxonomy::SkillTaxonomy;

/// Everything one evaluation produces — plain structured records for the
/// transport layer to serialize however it likes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    pub role: String,
    pub score: ScoreBreakdown,
    pub audit: AuditResult,
    pub gaps: Vec<SkillGap>,
    pub recommendations: Recommendations,
    pub roadmap: Roadmap,
    pub unrecognized_skills: Vec<String>,
}

pub struct Engine {
    taxonomy: Arc<SkillTaxonomy>,
    graph: Arc<GraphStore>,
    roles: RoleCatalog,
    scorer: ScoringEngine,
    auditor: FairnessAuditor,
    recommender: RecommendationEngine,
}

impl Engine {
    /// Loads the catalogs from the configured data directory and wires the
    /// component engines. Role records shipping without an embedding get one
    /// computed from their description at load time.
    pub async fn bootstrap(
        config: &EngineConfig,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> anyhow::Result<Self> {
        let dir = Path::new(&config.data_dir);

        let taxonomy = Arc::new(catalog::load_taxonomy(
            &dir.join("taxonomy.json"),
            config.fuzzy_match_threshold,
            config.fuzzy_ambiguity_band,
        )?);
        let mut roles = catalog::load_roles(&dir.join("roles.json"))?;
        for role in roles.roles_mut() {
            if role.embedding.is_empty() {
                role.embedding = embedder.embed(&role.description).await?;
            }
        }
        let graph = ingest::load_graph(&dir.join("graph.json"), config.max_path_hops)?;

        info!(
            "Engine ready: {} skills, {} roles, {} graph nodes",
            taxonomy.len(),
            roles.len(),
            graph.node_count()
        );

        Ok(Self::assemble(
            taxonomy,
            GraphStore::new(graph),
            roles,
            config,
            embedder,
        ))
    }

    /// Direct wiring for callers that already hold the static state.
    pub fn assemble(
        taxonomy: Arc<SkillTaxonomy>,
        graph: GraphStore,
        roles: RoleCatalog,
        config: &EngineConfig,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Self {
        Self {
            taxonomy,
            graph: Arc::new(graph),
            roles,
            scorer: ScoringEngine::new(embedder),
            auditor: FairnessAuditor::from_config(config),
            recommender: RecommendationEngine::new(
                config.target_proficiency,
                Arc::new(CompletionRateModel::default()),
            ),
        }
    }

    pub fn roles(&self) -> &RoleCatalog {
        &self.roles
    }

    /// The graph store, for callers that refresh the snapshot.
    pub fn graph(&self) -> Arc<GraphStore> {
        self.graph.clone()
    }

    /// Runs the full pipeline for one candidate: normalize, then score,
    /// audit, gap analysis and recommendations, then the roadmap.
    ///
    /// Unrecognized skills never abort the evaluation — they are excluded
    /// from scoring and surfaced as warnings.
    pub async fn evaluate(
        &self,
        raw: RawProfile,
        current_role: &str,
        target_role: &str,
    ) -> Result<Evaluation, EngineError> {
        let role = self.roles.get(target_role)?;
        let (profile, unrecognized) = raw.resolve(&self.taxonomy);
        let snapshot = self.graph.snapshot();

        let mut score = self.scorer.score(&profile, role).await?;
        for skill in &unrecognized {
            score
                .warnings
                .push(format!("Unrecognized skill '{skill}' excluded from scoring."));
        }

        let audit = self.auditor.audit(&profile);
        let gaps = self.recommender.analyze_gaps(&profile, role, &snapshot);
        let recommendations =
            self.recommender
                .recommend(&profile, role, &snapshot, &self.taxonomy);
        let roadmap = build_roadmap(current_role, &role.name, &gaps, &snapshot)?;

        info!(
            "Evaluated profile {} against '{}': composite {:.1}, {} gaps",
            profile.id,
            role.name,
            score.composite,
            gaps.len()
        );

        Ok(Evaluation {
            role: role.name.clone(),
            score,
            audit,
            gaps,
            recommendations,
            roadmap,
            unrecognized_skills: unrecognized,
        })
    }
}
