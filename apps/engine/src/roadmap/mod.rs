//! Roadmap Generator — buckets skill gaps into time-boxed milestones between
//! a current and a target role.
//!
//! Assignment honors the knowledge graph's `prerequisite` edges: a gap never
//! lands in an earlier milestone than any gap that is its prerequisite. A
//! prerequisite cycle is bad graph data and fails loudly with
//! `CyclicDependency` instead of being silently broken.

use std::collections::HashMap;

use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use tracing::debug;

use crate::errors::EngineError;
use crate::graph::{KnowledgeGraph, Relationship};
use crate::models::report::{GapPriority, Milestone, MonthWindow, Roadmap, SkillGap};
use crate::taxonomy::SkillId;

/// Fixed milestone template: (start month, end month, title).
const MILESTONE_TEMPLATE: &[(u32, u32, &str)] = &[
    (0, 3, "Foundations"),
    (3, 6, "Core skills"),
    (6, 12, "Applied practice"),
    (12, 18, "Stretch goals"),
];

pub fn build_roadmap(
    current_role: &str,
    target_role: &str,
    gaps: &[SkillGap],
    graph: &KnowledgeGraph,
) -> Result<Roadmap, EngineError> {
    if gaps.is_empty() {
        // The roadmap is never empty: with nothing to close, the plan is to
        // consolidate.
        let (start, end, _) = MILESTONE_TEMPLATE[0];
        return Ok(Roadmap {
            from_role: current_role.to_string(),
            to_role: target_role.to_string(),
            milestones: vec![Milestone {
                title: "Consolidate".to_string(),
                window: MonthWindow { start, end },
                tasks: vec![format!(
                    "No skill gaps toward {target_role}; deepen existing skills with \
                     advanced projects."
                )],
                skills: vec![],
            }],
            total_months: end,
        });
    }

    let buckets = assign_buckets(gaps, graph)?;

    let mut milestones = Vec::new();
    for (slot, (start, end, title)) in MILESTONE_TEMPLATE.iter().enumerate() {
        // Preserve the ranked gap order within each milestone.
        let slot_gaps: Vec<&SkillGap> = gaps
            .iter()
            .filter(|gap| buckets[&gap.skill] == slot)
            .collect();
        if slot_gaps.is_empty() {
            continue;
        }

        let tasks = slot_gaps.iter().map(|gap| task_for(gap)).collect();
        milestones.push(Milestone {
            title: (*title).to_string(),
            window: MonthWindow {
                start: *start,
                end: *end,
            },
            tasks,
            skills: slot_gaps.iter().map(|gap| gap.skill.clone()).collect(),
        });
    }

    let total_months = milestones
        .last()
        .map(|milestone| milestone.window.end)
        .unwrap_or(0);

    debug!(
        "Roadmap {} -> {}: {} milestones over {total_months} months",
        current_role,
        target_role,
        milestones.len()
    );

    Ok(Roadmap {
        from_role: current_role.to_string(),
        to_role: target_role.to_string(),
        milestones,
        total_months,
    })
}

/// Assigns each gap a milestone slot: the priority-preferred slot, pushed
/// later until no prerequisite lands after its dependent. Fails with
/// `CyclicDependency` on a prerequisite cycle among the gap skills.
fn assign_buckets(
    gaps: &[SkillGap],
    graph: &KnowledgeGraph,
) -> Result<HashMap<SkillId, usize>, EngineError> {
    let mut dependencies = DiGraph::<SkillId, ()>::new();
    let mut index: HashMap<&SkillId, NodeIndex> = HashMap::new();

    for gap in gaps {
        index
            .entry(&gap.skill)
            .or_insert_with(|| dependencies.add_node(gap.skill.clone()));
    }
    for a in gaps {
        for b in gaps {
            if a.skill != b.skill
                && graph.has_edge(a.skill.as_str(), b.skill.as_str(), Relationship::Prerequisite)
            {
                dependencies.add_edge(index[&a.skill], index[&b.skill], ());
            }
        }
    }

    let order = toposort(&dependencies, None)
        .map_err(|_| EngineError::CyclicDependency(cycle_members(&dependencies)))?;

    let priorities: HashMap<&SkillId, GapPriority> =
        gaps.iter().map(|gap| (&gap.skill, gap.priority)).collect();

    let last_slot = MILESTONE_TEMPLATE.len() - 1;
    let mut buckets: HashMap<SkillId, usize> = HashMap::new();

    for ix in order {
        let skill = dependencies[ix].clone();
        let preferred = match priorities[&skill] {
            GapPriority::High => 0,
            GapPriority::Medium => 1,
            GapPriority::Low => 2,
        };
        // Never earlier than any prerequisite already placed.
        let floor = dependencies
            .neighbors_directed(ix, Direction::Incoming)
            .map(|prereq| buckets[&dependencies[prereq]])
            .max()
            .unwrap_or(0);
        buckets.insert(skill, preferred.max(floor).min(last_slot));
    }

    Ok(buckets)
}

fn cycle_members(dependencies: &DiGraph<SkillId, ()>) -> Vec<String> {
    let mut members: Vec<String> = tarjan_scc(dependencies)
        .into_iter()
        .find(|scc| scc.len() > 1)
        .map(|scc| {
            scc.into_iter()
                .map(|ix| dependencies[ix].to_string())
                .collect()
        })
        .unwrap_or_default();
    members.sort();
    members
}

fn task_for(gap: &SkillGap) -> String {
    if gap.current_level == 0 {
        format!(
            "Learn {} from the ground up (target level {}).",
            gap.skill, gap.target_level
        )
    } else {
        format!(
            "Strengthen {} from level {} to {}.",
            gap.skill, gap.current_level, gap.target_level
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{EdgeRecord, NodeAttributes, NodeRecord, NodeType};

    fn skill_node(id: &str) -> NodeRecord {
        NodeRecord {
            id: id.to_string(),
            node_type: NodeType::Skill,
            label: id.to_string(),
            attributes: NodeAttributes::default(),
        }
    }

    fn prereq(from: &str, to: &str) -> EdgeRecord {
        EdgeRecord {
            from: from.to_string(),
            to: to.to_string(),
            relationship: Relationship::Prerequisite,
        }
    }

    fn gap(skill: &str, priority: GapPriority) -> SkillGap {
        SkillGap {
            skill: SkillId::new(skill),
            priority,
            current_level: 0,
            target_level: 70,
        }
    }

    fn graph_with_edges(edges: Vec<EdgeRecord>) -> KnowledgeGraph {
        let nodes = vec![
            skill_node("statistics"),
            skill_node("machine_learning"),
            skill_node("deep_learning"),
        ];
        KnowledgeGraph::from_records(nodes, edges, 6).unwrap()
    }

    #[test]
    fn test_empty_gaps_yield_consolidation_roadmap() {
        let graph = graph_with_edges(vec![]);
        let roadmap = build_roadmap("Data Analyst", "Data Scientist", &[], &graph).unwrap();
        assert_eq!(roadmap.milestones.len(), 1);
        assert_eq!(roadmap.total_months, 3);
        assert!(!roadmap.milestones[0].tasks.is_empty());
    }

    #[test]
    fn test_gap_never_precedes_its_prerequisite() {
        // machine_learning (medium → slot 1) is a prerequisite of
        // deep_learning (high → preferred slot 0): deep_learning must be
        // pushed to machine_learning's slot or later.
        let graph = graph_with_edges(vec![prereq("machine_learning", "deep_learning")]);
        let gaps = vec![
            gap("deep_learning", GapPriority::High),
            gap("machine_learning", GapPriority::Medium),
        ];
        let roadmap = build_roadmap("Analyst", "ML Engineer", &gaps, &graph).unwrap();

        let slot_of = |skill: &str| {
            roadmap
                .milestones
                .iter()
                .position(|m| m.skills.iter().any(|s| s.as_str() == skill))
                .unwrap()
        };
        assert!(slot_of("deep_learning") >= slot_of("machine_learning"));
    }

    #[test]
    fn test_prerequisite_chain_spreads_across_milestones() {
        let graph = graph_with_edges(vec![
            prereq("statistics", "machine_learning"),
            prereq("machine_learning", "deep_learning"),
        ]);
        let gaps = vec![
            gap("statistics", GapPriority::High),
            gap("machine_learning", GapPriority::Medium),
            gap("deep_learning", GapPriority::Low),
        ];
        let roadmap = build_roadmap("Analyst", "ML Engineer", &gaps, &graph).unwrap();

        // Windows are non-decreasing and the total is the last window's end.
        let windows: Vec<_> = roadmap.milestones.iter().map(|m| m.window).collect();
        for pair in windows.windows(2) {
            assert!(pair[1].start >= pair[0].start);
        }
        assert_eq!(roadmap.total_months, windows.last().unwrap().end);
        assert_eq!(roadmap.milestones.len(), 3);
    }

    #[test]
    fn test_cycle_fails_with_cyclic_dependency() {
        let graph = graph_with_edges(vec![
            prereq("machine_learning", "deep_learning"),
            prereq("deep_learning", "machine_learning"),
        ]);
        let gaps = vec![
            gap("machine_learning", GapPriority::High),
            gap("deep_learning", GapPriority::High),
        ];
        let err = build_roadmap("Analyst", "ML Engineer", &gaps, &graph).unwrap_err();
        match err {
            EngineError::CyclicDependency(members) => {
                assert_eq!(
                    members,
                    vec!["deep_learning".to_string(), "machine_learning".to_string()]
                );
            }
            other => panic!("expected CyclicDependency, got {other:?}"),
        }
    }

    #[test]
    fn test_same_priority_prerequisites_may_share_a_milestone() {
        // Sharing a window is allowed; only strictly-earlier placement is not.
        let graph = graph_with_edges(vec![prereq("machine_learning", "deep_learning")]);
        let gaps = vec![
            gap("machine_learning", GapPriority::High),
            gap("deep_learning", GapPriority::High),
        ];
        let roadmap = build_roadmap("Analyst", "ML Engineer", &gaps, &graph).unwrap();
        assert_eq!(roadmap.milestones.len(), 1);
        assert_eq!(roadmap.milestones[0].skills.len(), 2);
    }
}
