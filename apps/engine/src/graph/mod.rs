//! Knowledge Graph Store — typed graph of skills, roles, courses and
//! projects with directed, typed edges.
//!
//! Backed by a petgraph arena (indices, not pointer-linked nodes) plus an
//! id → index map. All queries are read-only; refresh happens by swapping a
//! whole immutable snapshot (see `store`).

pub mod ingest;
pub mod store;

use std::collections::{BTreeSet, HashMap, VecDeque};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};

use crate::errors::EngineError;
use crate::taxonomy::SkillId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Skill,
    Role,
    Course,
    Project,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relationship {
    /// `a -prerequisite-> b`: a must be learned before b.
    Prerequisite,
    Related,
    /// `skill -required_for-> role`.
    RequiredFor,
    /// `course/project -teaches-> skill`.
    Teaches,
}

/// Type-specific node attributes as they appear in the ingestion feed.
/// Fields not applicable to a node type are simply absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeAttributes {
    #[serde(default)]
    pub description: Option<String>,
    /// Course fields.
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub hours: Option<u32>,
    #[serde(default)]
    pub level: Option<String>,
    /// Project fields.
    #[serde(default)]
    pub difficulty: Option<u8>,
    #[serde(default)]
    pub estimated_days: Option<u32>,
}

/// Node record in the ingestion feed: `{id, type, label, attributes}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub label: String,
    #[serde(default)]
    pub attributes: NodeAttributes,
}

/// Edge record in the ingestion feed: `{from, to, relationship}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub from: String,
    pub to: String,
    pub relationship: Relationship,
}

#[derive(Debug, Clone)]
pub struct GraphNode {
    pub id: String,
    pub node_type: NodeType,
    pub label: String,
    pub attributes: NodeAttributes,
}

/// Immutable typed graph. Built once from feed records, validated at build
/// time, then only queried.
#[derive(Debug)]
pub struct KnowledgeGraph {
    graph: DiGraph<GraphNode, Relationship>,
    index: HashMap<String, NodeIndex>,
    max_hops: usize,
}

impl KnowledgeGraph {
    /// Builds and validates a graph from feed records.
    ///
    /// Rejected at build time: duplicate node ids, self-loops, and edges
    /// whose endpoints reference no node. Multiple edge types between the
    /// same pair are permitted.
    pub fn from_records(
        nodes: Vec<NodeRecord>,
        edges: Vec<EdgeRecord>,
        max_hops: usize,
    ) -> Result<Self, EngineError> {
        let mut graph = DiGraph::new();
        let mut index = HashMap::new();

        for record in nodes {
            if index.contains_key(&record.id) {
                return Err(EngineError::Ingest(format!(
                    "duplicate node id '{}'",
                    record.id
                )));
            }
            let node_index = graph.add_node(GraphNode {
                id: record.id.clone(),
                node_type: record.node_type,
                label: record.label,
                attributes: record.attributes,
            });
            index.insert(record.id, node_index);
        }

        for edge in edges {
            if edge.from == edge.to {
                return Err(EngineError::Ingest(format!(
                    "self-loop on node '{}'",
                    edge.from
                )));
            }
            let from = *index.get(&edge.from).ok_or_else(|| {
                EngineError::Ingest(format!("edge references unknown node '{}'", edge.from))
            })?;
            let to = *index.get(&edge.to).ok_or_else(|| {
                EngineError::Ingest(format!("edge references unknown node '{}'", edge.to))
            })?;
            graph.add_edge(from, to, edge.relationship);
        }

        Ok(Self {
            graph,
            index,
            max_hops,
        })
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.index.get(id).map(|ix| &self.graph[*ix])
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Outgoing neighbors, optionally filtered to one relationship type.
    pub fn neighbors(
        &self,
        id: &str,
        relationship: Option<Relationship>,
    ) -> Result<BTreeSet<String>, EngineError> {
        let ix = self.require(id)?;
        Ok(self.adjacent(ix, Direction::Outgoing, relationship))
    }

    /// Incoming neighbors for one relationship type. The recommender uses
    /// this to find the courses and projects that teach a skill.
    pub fn incoming(
        &self,
        id: &str,
        relationship: Relationship,
    ) -> Result<BTreeSet<String>, EngineError> {
        let ix = self.require(id)?;
        Ok(self.adjacent(ix, Direction::Incoming, Some(relationship)))
    }

    pub fn nodes_by_type(&self, node_type: NodeType) -> Vec<String> {
        let mut ids: Vec<String> = self
            .graph
            .node_indices()
            .filter(|ix| self.graph[*ix].node_type == node_type)
            .map(|ix| self.graph[ix].id.clone())
            .collect();
        ids.sort();
        ids
    }

    pub fn has_edge(&self, from: &str, to: &str, relationship: Relationship) -> bool {
        let (Some(&from), Some(&to)) = (self.index.get(from), self.index.get(to)) else {
            return false;
        };
        self.graph
            .edges_connecting(from, to)
            .any(|edge| *edge.weight() == relationship)
    }

    /// Unweighted breadth-first shortest path over the union of the given
    /// relationship types (all types when unspecified), following edge
    /// direction. Neighbor expansion is in ascending node-id order, so ties
    /// resolve deterministically. Fails with `NotFound` when no path exists
    /// within the hop bound.
    pub fn shortest_path(
        &self,
        from: &str,
        to: &str,
        relationships: Option<&[Relationship]>,
    ) -> Result<Vec<String>, EngineError> {
        let start = self.require(from)?;
        let goal = self.require(to)?;

        if start == goal {
            return Ok(vec![from.to_string()]);
        }

        let mut parents: HashMap<NodeIndex, NodeIndex> = HashMap::new();
        let mut frontier = VecDeque::from([(start, 0usize)]);

        while let Some((current, depth)) = frontier.pop_front() {
            if depth >= self.max_hops {
                continue;
            }
            for next in self.ordered_neighbors(current, relationships) {
                if next == start || parents.contains_key(&next) {
                    continue;
                }
                parents.insert(next, current);
                if next == goal {
                    return Ok(self.unwind_path(&parents, start, goal));
                }
                frontier.push_back((next, depth + 1));
            }
        }

        Err(EngineError::NotFound(format!(
            "no path from '{from}' to '{to}' within {} hops",
            self.max_hops
        )))
    }

    /// Number of required skills this skill is a direct prerequisite of.
    /// The gap-ordering key: foundational skills rank ahead of the skills
    /// they unlock.
    pub fn prerequisite_centrality(&self, skill: &SkillId, required: &[SkillId]) -> usize {
        required
            .iter()
            .filter(|other| **other != *skill)
            .filter(|other| self.has_edge(skill.as_str(), other.as_str(), Relationship::Prerequisite))
            .count()
    }

    fn require(&self, id: &str) -> Result<NodeIndex, EngineError> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| EngineError::NotFound(format!("graph node '{id}'")))
    }

    fn adjacent(
        &self,
        ix: NodeIndex,
        direction: Direction,
        relationship: Option<Relationship>,
    ) -> BTreeSet<String> {
        self.graph
            .edges_directed(ix, direction)
            .filter(|edge| relationship.map_or(true, |rel| *edge.weight() == rel))
            .map(|edge| {
                let other = match direction {
                    Direction::Outgoing => edge.target(),
                    Direction::Incoming => edge.source(),
                };
                self.graph[other].id.clone()
            })
            .collect()
    }

    fn ordered_neighbors(
        &self,
        ix: NodeIndex,
        relationships: Option<&[Relationship]>,
    ) -> Vec<NodeIndex> {
        let mut out: Vec<NodeIndex> = self
            .graph
            .edges_directed(ix, Direction::Outgoing)
            .filter(|edge| {
                relationships.map_or(true, |rels| rels.contains(edge.weight()))
            })
            .map(|edge| edge.target())
            .collect();
        out.sort_by(|a, b| self.graph[*a].id.cmp(&self.graph[*b].id));
        out.dedup();
        out
    }

    fn unwind_path(
        &self,
        parents: &HashMap<NodeIndex, NodeIndex>,
        start: NodeIndex,
        goal: NodeIndex,
    ) -> Vec<String> {
        let mut path = vec![self.graph[goal].id.clone()];
        let mut current = goal;
        while current != start {
            current = parents[&current];
            path.push(self.graph[current].id.clone());
        }
        path.reverse();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skill(id: &str) -> NodeRecord {
        NodeRecord {
            id: id.to_string(),
            node_type: NodeType::Skill,
            label: id.to_string(),
            attributes: NodeAttributes::default(),
        }
    }

    fn edge(from: &str, to: &str, relationship: Relationship) -> EdgeRecord {
        EdgeRecord {
            from: from.to_string(),
            to: to.to_string(),
            relationship,
        }
    }

    fn make_graph() -> KnowledgeGraph {
        // python -> machine_learning -> deep_learning (prerequisite chain),
        // course c1 teaches python, statistics related to machine_learning.
        let nodes = vec![
            skill("python"),
            skill("machine_learning"),
            skill("deep_learning"),
            skill("statistics"),
            NodeRecord {
                id: "c1".to_string(),
                node_type: NodeType::Course,
                label: "Intro to Python".to_string(),
                attributes: NodeAttributes {
                    provider: Some("Coursera".to_string()),
                    hours: Some(20),
                    ..NodeAttributes::default()
                },
            },
        ];
        let edges = vec![
            edge("python", "machine_learning", Relationship::Prerequisite),
            edge("machine_learning", "deep_learning", Relationship::Prerequisite),
            edge("statistics", "machine_learning", Relationship::Related),
            edge("c1", "python", Relationship::Teaches),
        ];
        KnowledgeGraph::from_records(nodes, edges, 6).unwrap()
    }

    #[test]
    fn test_neighbors_filtered_by_relationship() {
        let graph = make_graph();
        let prereq_of = graph
            .neighbors("python", Some(Relationship::Prerequisite))
            .unwrap();
        assert_eq!(
            prereq_of,
            BTreeSet::from(["machine_learning".to_string()])
        );
        let all = graph.neighbors("statistics", None).unwrap();
        assert!(all.contains("machine_learning"));
    }

    #[test]
    fn test_incoming_finds_teaching_course() {
        let graph = make_graph();
        let teachers = graph.incoming("python", Relationship::Teaches).unwrap();
        assert_eq!(teachers, BTreeSet::from(["c1".to_string()]));
    }

    #[test]
    fn test_nodes_by_type_sorted() {
        let graph = make_graph();
        assert_eq!(
            graph.nodes_by_type(NodeType::Skill),
            vec!["deep_learning", "machine_learning", "python", "statistics"]
        );
        assert_eq!(graph.nodes_by_type(NodeType::Course), vec!["c1"]);
    }

    #[test]
    fn test_shortest_path_follows_prerequisite_chain() {
        let graph = make_graph();
        let path = graph
            .shortest_path("python", "deep_learning", Some(&[Relationship::Prerequisite]))
            .unwrap();
        assert_eq!(path, vec!["python", "machine_learning", "deep_learning"]);
    }

    #[test]
    fn test_shortest_path_not_found_when_disconnected() {
        let graph = make_graph();
        // No outgoing edges lead from deep_learning back to python.
        let err = graph
            .shortest_path("deep_learning", "python", None)
            .unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
    }

    #[test]
    fn test_shortest_path_respects_hop_bound() {
        let nodes: Vec<NodeRecord> = (0..9).map(|i| skill(&format!("s{i}"))).collect();
        let edges: Vec<EdgeRecord> = (0..8)
            .map(|i| edge(&format!("s{i}"), &format!("s{}", i + 1), Relationship::Related))
            .collect();
        let graph = KnowledgeGraph::from_records(nodes, edges, 6).unwrap();
        // s0..s8 is 8 hops — beyond the bound of 6.
        let err = graph.shortest_path("s0", "s8", None).unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
        // Within the bound still works.
        assert_eq!(graph.shortest_path("s0", "s6", None).unwrap().len(), 7);
    }

    #[test]
    fn test_shortest_path_tie_break_is_id_ascending() {
        // Two equal-length paths a -> {m1, m2} -> z; BFS must pick m1.
        let nodes = vec![skill("a"), skill("m1"), skill("m2"), skill("z")];
        let edges = vec![
            edge("a", "m2", Relationship::Related),
            edge("a", "m1", Relationship::Related),
            edge("m1", "z", Relationship::Related),
            edge("m2", "z", Relationship::Related),
        ];
        let graph = KnowledgeGraph::from_records(nodes, edges, 6).unwrap();
        assert_eq!(
            graph.shortest_path("a", "z", None).unwrap(),
            vec!["a", "m1", "z"]
        );
    }

    #[test]
    fn test_unknown_endpoint_is_not_found() {
        let graph = make_graph();
        assert!(matches!(
            graph.shortest_path("python", "nope", None),
            Err(EngineError::NotFound(_))
        ));
        assert!(matches!(
            graph.neighbors("nope", None),
            Err(EngineError::NotFound(_))
        ));
    }

    #[test]
    fn test_self_loop_rejected_at_build() {
        let nodes = vec![skill("python")];
        let edges = vec![edge("python", "python", Relationship::Related)];
        let err = KnowledgeGraph::from_records(nodes, edges, 6).unwrap_err();
        assert!(matches!(err, EngineError::Ingest(_)));
    }

    #[test]
    fn test_dangling_edge_rejected_at_build() {
        let nodes = vec![skill("python")];
        let edges = vec![edge("python", "ghost", Relationship::Related)];
        let err = KnowledgeGraph::from_records(nodes, edges, 6).unwrap_err();
        assert!(matches!(err, EngineError::Ingest(_)));
    }

    #[test]
    fn test_duplicate_node_rejected_at_build() {
        let nodes = vec![skill("python"), skill("python")];
        let err = KnowledgeGraph::from_records(nodes, vec![], 6).unwrap_err();
        assert!(matches!(err, EngineError::Ingest(_)));
    }

    #[test]
    fn test_parallel_edges_of_distinct_types_permitted() {
        let nodes = vec![skill("a"), skill("b")];
        let edges = vec![
            edge("a", "b", Relationship::Related),
            edge("a", "b", Relationship::Prerequisite),
        ];
        let graph = KnowledgeGraph::from_records(nodes, edges, 6).unwrap();
        assert!(graph.has_edge("a", "b", Relationship::Related));
        assert!(graph.has_edge("a", "b", Relationship::Prerequisite));
    }

    #[test]
    fn test_prerequisite_centrality_counts_required_targets() {
        let graph = make_graph();
        let required = vec![
            SkillId::new("python"),
            SkillId::new("machine_learning"),
            SkillId::new("deep_learning"),
        ];
        assert_eq!(
            graph.prerequisite_centrality(&SkillId::new("python"), &required),
            1
        );
        assert_eq!(
            graph.prerequisite_centrality(&SkillId::new("deep_learning"), &required),
            0
        );
    }
}
