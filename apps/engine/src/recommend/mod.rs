//! Gap & Recommendation Engine — skill gaps ordered by priority and graph
//! centrality, micro-projects and courses ranked off the knowledge graph,
//! and imperative next steps for the top gaps.

pub mod engagement;

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use tracing::debug;

use crate::graph::{KnowledgeGraph, NodeType, Relationship};
use crate::models::profile::Profile;
use crate::models::report::{
    GapPriority, RankedCourse, RankedProject, Recommendations, SkillGap,
};
use crate::models::role::{Requirement, RoleProfile};
use crate::taxonomy::{SkillId, SkillTaxonomy};

use engagement::{CandidateFeatures, EngagementModel};

/// Essential skills below this proficiency downgrade from "covered" to a
/// medium-priority gap.
const MEDIUM_PRIORITY_CUTOFF: u8 = 50;
const NEXT_STEPS_COUNT: usize = 3;
const MAX_RANKED_ITEMS: usize = 5;
const COURSE_SKILL_WEIGHT: f64 = 0.6;
const COURSE_TEXT_WEIGHT: f64 = 0.4;

pub struct RecommendationEngine {
    target_proficiency: u8,
    model: Arc<dyn EngagementModel>,
}

impl RecommendationEngine {
    pub fn new(target_proficiency: u8, model: Arc<dyn EngagementModel>) -> Self {
        Self {
            target_proficiency,
            model,
        }
    }

    /// Computes ordered skill gaps for a profile against a target role.
    ///
    /// Priority: essential & absent → high; essential below the proficiency
    /// cutoff → medium; desirable & missing-or-low → low. Within a priority,
    /// skills that are prerequisites for the most other required skills rank
    /// first; remaining ties break by id. Deterministic for fixed inputs.
    pub fn analyze_gaps(
        &self,
        profile: &Profile,
        role: &RoleProfile,
        graph: &KnowledgeGraph,
    ) -> Vec<SkillGap> {
        let mut gaps: Vec<SkillGap> = Vec::new();
        let mut seen: BTreeSet<SkillId> = BTreeSet::new();

        for required in &role.required {
            if !seen.insert(required.id.clone()) {
                continue;
            }
            let present = profile.has_skill(&required.id);
            let proficiency = profile.proficiency(&required.id);

            let slot = match required.requirement {
                Requirement::Essential => {
                    if !present {
                        Some((GapPriority::High, 0))
                    } else {
                        match proficiency {
                            Some(level) if level < MEDIUM_PRIORITY_CUTOFF => {
                                Some((GapPriority::Medium, level))
                            }
                            _ => None,
                        }
                    }
                }
                Requirement::Desirable => {
                    if !present {
                        Some((GapPriority::Low, 0))
                    } else {
                        match proficiency {
                            Some(level) if level < MEDIUM_PRIORITY_CUTOFF => {
                                Some((GapPriority::Low, level))
                            }
                            _ => None,
                        }
                    }
                }
            };

            if let Some((priority, current_level)) = slot {
                gaps.push(SkillGap {
                    skill: required.id.clone(),
                    priority,
                    current_level,
                    target_level: self.target_proficiency.max(current_level),
                });
            }
        }

        let required_ids: Vec<SkillId> =
            role.required.iter().map(|skill| skill.id.clone()).collect();
        let centrality: HashMap<SkillId, usize> = gaps
            .iter()
            .map(|gap| {
                (
                    gap.skill.clone(),
                    graph.prerequisite_centrality(&gap.skill, &required_ids),
                )
            })
            .collect();

        gaps.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then_with(|| centrality[&b.skill].cmp(&centrality[&a.skill]))
                .then_with(|| a.skill.cmp(&b.skill))
        });

        debug!("Gap analysis for role '{}': {} gaps", role.name, gaps.len());
        gaps
    }

    /// Ranks micro-projects and courses for the profile's gaps and renders
    /// next steps for the highest-priority ones.
    pub fn recommend(
        &self,
        profile: &Profile,
        role: &RoleProfile,
        graph: &KnowledgeGraph,
        taxonomy: &SkillTaxonomy,
    ) -> Recommendations {
        let gaps = self.analyze_gaps(profile, role, graph);
        let gap_ids: BTreeSet<&str> = gaps.iter().map(|gap| gap.skill.as_str()).collect();

        let micro_projects = self.rank_projects(profile, &gaps, &gap_ids, graph);
        let courses = self.rank_courses(&gaps, &gap_ids, graph, taxonomy);
        let next_steps = self.next_steps(&gaps, &micro_projects, &courses, graph, taxonomy);

        Recommendations {
            micro_projects,
            courses,
            next_steps,
        }
    }

    /// Projects connected to a gap skill via `teaches`, scored by
    /// (skill match count) × (engagement prediction), ties broken by shorter
    /// estimated time then id.
    fn rank_projects(
        &self,
        profile: &Profile,
        gaps: &[SkillGap],
        gap_ids: &BTreeSet<&str>,
        graph: &KnowledgeGraph,
    ) -> Vec<RankedProject> {
        let mut ranked: Vec<RankedProject> = Vec::new();
        let mut seen: BTreeSet<String> = BTreeSet::new();

        for gap in gaps {
            let features = CandidateFeatures::from_profile(profile, gap.priority);
            let Ok(candidates) = graph.incoming(gap.skill.as_str(), Relationship::Teaches) else {
                continue; // skill absent from the graph — nothing to rank
            };
            for candidate_id in candidates {
                if !seen.insert(candidate_id.clone()) {
                    continue; // first (highest-priority) gap keeps the candidate
                }
                let Some(node) = graph.node(&candidate_id) else {
                    continue;
                };
                if node.node_type != NodeType::Project {
                    continue;
                }

                let taught = graph
                    .neighbors(&candidate_id, Some(Relationship::Teaches))
                    .unwrap_or_default();
                let skills_matched = taught
                    .iter()
                    .filter(|skill| gap_ids.contains(skill.as_str()))
                    .count();
                let difficulty = node.attributes.difficulty.unwrap_or(3);
                let engagement = self.model.predict(&features, difficulty);

                ranked.push(RankedProject {
                    id: candidate_id,
                    title: node.label.clone(),
                    skills_matched,
                    engagement,
                    score: skills_matched as f64 * engagement,
                    estimated_days: node.attributes.estimated_days.unwrap_or(0),
                });
            }
        }

        ranked.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.estimated_days.cmp(&b.estimated_days))
                .then_with(|| a.id.cmp(&b.id))
        });
        ranked.truncate(MAX_RANKED_ITEMS);
        ranked
    }

    /// Courses connected via `teaches`, scored by a blend of skill overlap
    /// and description similarity to the gap's skill.
    fn rank_courses(
        &self,
        gaps: &[SkillGap],
        gap_ids: &BTreeSet<&str>,
        graph: &KnowledgeGraph,
        taxonomy: &SkillTaxonomy,
    ) -> Vec<RankedCourse> {
        let mut ranked: Vec<RankedCourse> = Vec::new();
        let mut best: HashMap<String, f64> = HashMap::new();

        for gap in gaps {
            let Ok(candidates) = graph.incoming(gap.skill.as_str(), Relationship::Teaches) else {
                continue;
            };
            let skill_text = format!(
                "{} {}",
                taxonomy.display_name(&gap.skill).unwrap_or(gap.skill.as_str()),
                taxonomy.description(&gap.skill).unwrap_or_default(),
            );

            for candidate_id in candidates {
                let Some(node) = graph.node(&candidate_id) else {
                    continue;
                };
                if node.node_type != NodeType::Course {
                    continue;
                }

                let taught = graph
                    .neighbors(&candidate_id, Some(Relationship::Teaches))
                    .unwrap_or_default();
                let matched = taught
                    .iter()
                    .filter(|skill| gap_ids.contains(skill.as_str()))
                    .count();
                let overlap = matched as f64 / gap_ids.len().max(1) as f64;

                let course_text = format!(
                    "{} {}",
                    node.label,
                    node.attributes.description.as_deref().unwrap_or_default(),
                );
                let similarity = lexical_overlap(&course_text, &skill_text);

                let match_score =
                    COURSE_SKILL_WEIGHT * overlap + COURSE_TEXT_WEIGHT * similarity;

                let entry = best.entry(candidate_id.clone()).or_insert(-1.0);
                if match_score > *entry {
                    *entry = match_score;
                    ranked.retain(|course| course.id != candidate_id);
                    ranked.push(RankedCourse {
                        id: candidate_id,
                        title: node.label.clone(),
                        provider: node
                            .attributes
                            .provider
                            .clone()
                            .unwrap_or_else(|| "unknown".to_string()),
                        hours: node.attributes.hours.unwrap_or(0),
                        match_score,
                    });
                }
            }
        }

        ranked.sort_by(|a, b| {
            b.match_score
                .partial_cmp(&a.match_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.hours.cmp(&b.hours))
                .then_with(|| a.id.cmp(&b.id))
        });
        ranked.truncate(MAX_RANKED_ITEMS);
        ranked
    }

    /// Imperative actions for the top-N gaps, each naming the best-ranked
    /// course or project that teaches the skill.
    fn next_steps(
        &self,
        gaps: &[SkillGap],
        projects: &[RankedProject],
        courses: &[RankedCourse],
        graph: &KnowledgeGraph,
        taxonomy: &SkillTaxonomy,
    ) -> Vec<String> {
        gaps.iter()
            .take(NEXT_STEPS_COUNT)
            .map(|gap| {
                let label = taxonomy
                    .display_name(&gap.skill)
                    .unwrap_or(gap.skill.as_str());
                let teachers = graph
                    .incoming(gap.skill.as_str(), Relationship::Teaches)
                    .unwrap_or_default();

                if let Some(course) = courses.iter().find(|c| teachers.contains(&c.id)) {
                    format!(
                        "Close the {label} gap: take '{}' ({}, {}h).",
                        course.title, course.provider, course.hours
                    )
                } else if let Some(project) = projects.iter().find(|p| teachers.contains(&p.id))
                {
                    format!(
                        "Close the {label} gap: build '{}' (~{} days).",
                        project.title, project.estimated_days
                    )
                } else {
                    format!(
                        "Develop {label} through deliberate practice and a small portfolio \
                         project."
                    )
                }
            })
            .collect()
    }
}

/// Share of query-text tokens covered by the document text, in [0, 1].
fn lexical_overlap(document: &str, query: &str) -> f64 {
    let document_tokens: BTreeSet<String> =
        crate::embedding::tokenize(document).into_iter().collect();
    let query_tokens: BTreeSet<String> = crate::embedding::tokenize(query).into_iter().collect();
    if query_tokens.is_empty() {
        return 0.0;
    }
    let matched = query_tokens
        .iter()
        .filter(|token| document_tokens.contains(*token))
        .count();
    matched as f64 / query_tokens.len() as f64
}
