//! Loads the knowledge-graph ingestion feed — JSON node/edge records from a
//! curated static source.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

use super::{EdgeRecord, KnowledgeGraph, NodeRecord};

#[derive(Debug, Deserialize)]
pub struct GraphFeed {
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

/// Reads a graph feed file and builds the validated graph.
pub fn load_graph(path: &Path, max_hops: usize) -> Result<KnowledgeGraph> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read graph feed '{}'", path.display()))?;
    let feed: GraphFeed = serde_json::from_str(&raw)
        .with_context(|| format!("Malformed graph feed '{}'", path.display()))?;

    let node_count = feed.nodes.len();
    let edge_count = feed.edges.len();
    let graph = KnowledgeGraph::from_records(feed.nodes, feed.edges, max_hops)?;
    info!("Knowledge graph loaded: {node_count} nodes, {edge_count} edges");
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_graph_from_feed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "nodes": [
                    {{"id": "python", "type": "skill", "label": "Python"}},
                    {{"id": "c1", "type": "course", "label": "Intro to Python",
                      "attributes": {{"provider": "Coursera", "hours": 20, "level": "Beginner"}}}}
                ],
                "edges": [
                    {{"from": "c1", "to": "python", "relationship": "teaches"}}
                ]
            }}"#
        )
        .unwrap();

        let graph = load_graph(file.path(), 6).unwrap();
        assert_eq!(graph.node_count(), 2);
        let course = graph.node("c1").unwrap();
        assert_eq!(course.attributes.hours, Some(20));
    }

    #[test]
    fn test_load_graph_rejects_malformed_feed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(load_graph(file.path(), 6).is_err());
    }
}
