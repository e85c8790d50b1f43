//! Transitive derivation edges between artifacts and their sources

use ao_storage::ProvenanceRecord;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Bfs, Reversed};
use std::collections::HashMap;

/// Directed graph with an edge from every artifact to each of its sources
#[derive(Debug, Default)]
pub struct Lineage {
    graph: DiGraph<String, ()>,
    node_indices: HashMap<String, NodeIndex>,
}

impl Lineage {
    pub fn from_records(records: &[ProvenanceRecord]) -> Self {
        let mut lineage = Self::default();
        for record in records {
            let artifact = lineage.node(&record.artifact_path);
            let source = lineage.node(&record.source_path);
            // Duplicate ledger lines collapse to one edge
            lineage.graph.update_edge(artifact, source, ());
        }
        lineage
    }

    fn node(&mut self, path: &str) -> NodeIndex {
        if let Some(&idx) = self.node_indices.get(path) {
            return idx;
        }
        let idx = self.graph.add_node(path.to_string());
        self.node_indices.insert(path.to_string(), idx);
        idx
    }

    /// Every path `artifact` was derived from, nearest first
    pub fn ancestors(&self, artifact: &str) -> Vec<String> {
        let Some(&start) = self.node_indices.get(artifact) else {
            return Vec::new();
        };
        let mut bfs = Bfs::new(&self.graph, start);
        let mut found = Vec::new();
        while let Some(idx) = bfs.next(&self.graph) {
            if idx != start {
                found.push(self.graph[idx].clone());
            }
        }
        found
    }

    /// Ancestors that have no provenance of their own (original inputs)
    pub fn roots(&self, artifact: &str) -> Vec<String> {
        self.ancestors(artifact)
            .into_iter()
            .filter(|path| {
                self.node_indices
                    .get(path)
                    .is_some_and(|&idx| self.graph.neighbors(idx).next().is_none())
            })
            .collect()
    }

    /// Every artifact derived, directly or not, from `source`
    pub fn descendants(&self, source: &str) -> Vec<String> {
        let Some(&start) = self.node_indices.get(source) else {
            return Vec::new();
        };
        let reversed = Reversed(&self.graph);
        let mut bfs = Bfs::new(reversed, start);
        let mut found = Vec::new();
        while let Some(idx) = bfs.next(reversed) {
            if idx != start {
                found.push(self.graph[idx].clone());
            }
        }
        found
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }
}
