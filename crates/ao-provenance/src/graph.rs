//! Queries over the provenance ledger

use crate::lineage::Lineage;
use ao_storage::{read_jsonl, ProvenanceRecord, SOURCE_TRANSCRIPT};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

/// Provenance chain for one artifact
#[derive(Debug, Clone, Serialize)]
pub struct TraceResult {
    pub artifact: String,
    /// Matching records, ledger order
    pub chain: Vec<ProvenanceRecord>,
    /// Transcript source paths found in the chain
    pub sources: Vec<String>,
}

/// Ledger summary
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProvenanceStats {
    pub total_records: usize,
    pub artifact_types: BTreeMap<String, usize>,
    pub source_types: BTreeMap<String, usize>,
    pub unique_sessions: usize,
}

/// In-memory view of a provenance ledger
#[derive(Debug, Default)]
pub struct ProvenanceGraph {
    path: Option<PathBuf>,
    records: Vec<ProvenanceRecord>,
    lineage: Lineage,
}

impl ProvenanceGraph {
    /// Load a ledger file; a missing file gives an empty graph
    pub fn load(path: &Path) -> ao_storage::Result<Self> {
        let records: Vec<ProvenanceRecord> = read_jsonl(path)?;
        tracing::debug!(path = %path.display(), records = records.len(), "provenance ledger loaded");
        let mut graph = Self::from_records(records);
        graph.path = Some(path.to_path_buf());
        Ok(graph)
    }

    pub fn from_records(records: Vec<ProvenanceRecord>) -> Self {
        let lineage = Lineage::from_records(&records);
        Self {
            path: None,
            records,
            lineage,
        }
    }

    /// Ledger this graph was loaded from
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn records(&self) -> &[ProvenanceRecord] {
        &self.records
    }

    pub fn lineage(&self) -> &Lineage {
        &self.lineage
    }

    /// Records that produced `artifact_path`
    ///
    /// Paths match exactly or after making both absolute. When nothing
    /// matches, records are matched by file name alone.
    pub fn trace(&self, artifact_path: &str) -> TraceResult {
        let wanted = absolute(artifact_path);
        let mut chain: Vec<ProvenanceRecord> = self
            .records
            .iter()
            .filter(|r| r.artifact_path == artifact_path || absolute(&r.artifact_path) == wanted)
            .cloned()
            .collect();

        if chain.is_empty() {
            if let Some(name) = Path::new(artifact_path).file_name() {
                chain = self
                    .records
                    .iter()
                    .filter(|r| Path::new(&r.artifact_path).file_name() == Some(name))
                    .cloned()
                    .collect();
            }
        }

        let sources = chain
            .iter()
            .filter(|r| r.source_type == SOURCE_TRANSCRIPT)
            .map(|r| r.source_path.clone())
            .collect();

        TraceResult {
            artifact: artifact_path.to_string(),
            chain,
            sources,
        }
    }

    pub fn find_by_session(&self, session_id: &str) -> Vec<&ProvenanceRecord> {
        self.records
            .iter()
            .filter(|r| r.session_id.as_deref() == Some(session_id))
            .collect()
    }

    /// Records derived from `source_path` (exact or absolute match)
    pub fn find_by_source(&self, source_path: &str) -> Vec<&ProvenanceRecord> {
        let wanted = absolute(source_path);
        self.records
            .iter()
            .filter(|r| r.source_path == source_path || absolute(&r.source_path) == wanted)
            .collect()
    }

    pub fn stats(&self) -> ProvenanceStats {
        let mut stats = ProvenanceStats {
            total_records: self.records.len(),
            ..Default::default()
        };
        let mut sessions = HashSet::new();
        for record in &self.records {
            *stats
                .artifact_types
                .entry(record.artifact_type.clone())
                .or_insert(0) += 1;
            *stats
                .source_types
                .entry(record.source_type.clone())
                .or_insert(0) += 1;
            if let Some(session_id) = record.session_id.as_deref().filter(|s| !s.is_empty()) {
                sessions.insert(session_id);
            }
        }
        stats.unique_sessions = sessions.len();
        stats
    }

    /// Transitive sources of `artifact_path`, nearest first
    pub fn ancestors(&self, artifact_path: &str) -> Vec<String> {
        self.lineage.ancestors(artifact_path)
    }

    /// Original inputs behind `artifact_path`
    pub fn roots(&self, artifact_path: &str) -> Vec<String> {
        self.lineage.roots(artifact_path)
    }

    /// Everything derived from `source_path`
    pub fn descendants(&self, source_path: &str) -> Vec<String> {
        self.lineage.descendants(source_path)
    }
}

fn absolute(path: &str) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| PathBuf::from(path))
}
