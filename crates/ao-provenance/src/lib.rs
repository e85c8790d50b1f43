//! Lineage queries over the ao provenance ledger

mod graph;
mod lineage;

pub use graph::{ProvenanceGraph, ProvenanceStats, TraceResult};
pub use lineage::Lineage;
