//! The dependency graph data structures.
//!
//! [`DependencyGraph`] is the builder's output: a mapping from an absolute
//! file path to its duplicate-free, insertion-ordered out-edges, closed over
//! the supplied set. [`FileDependencyGraph`] layers per-file and per-edge
//! metadata on top for downstream consumers (test-file tags, VCS stats) —
//! those consumers live outside this crate; this type only holds the seam.

pub mod query;

pub use query::find_path_nodes;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A directed graph of absolute file paths, restricted to one supplied set.
///
/// Invariants (spec.md §3, §8):
/// - every source path is present as a key, even with no out-edges
/// - every edge target is also a key
/// - no self-edges
/// - each node's edge list contains no duplicate target
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DependencyGraph {
    edges: HashMap<PathBuf, Vec<PathBuf>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `path` as a node if it isn't already one. Idempotent.
    pub fn ensure_node(&mut self, path: PathBuf) {
        self.edges.entry(path).or_default();
    }

    /// Add an edge `from -> to`, creating either endpoint as a node if
    /// needed. No-ops on self-edges and on a target already present for
    /// `from` (first-insertion order is preserved).
    pub fn add_edge(&mut self, from: PathBuf, to: PathBuf) {
        if from == to {
            return;
        }
        self.edges.entry(to.clone()).or_default();
        let out = self.edges.entry(from).or_default();
        if !out.contains(&to) {
            out.push(to);
        }
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.edges.contains_key(path)
    }

    pub fn node_count(&self) -> usize {
        self.edges.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &PathBuf> {
        self.edges.keys()
    }

    /// Out-edges of `node`, in first-insertion order. Empty slice for an
    /// unknown node (callers should check [`DependencyGraph::contains`]
    /// first if the distinction matters).
    pub fn edges_of(&self, node: &Path) -> &[PathBuf] {
        self.edges.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }

    pub fn into_map(self) -> HashMap<PathBuf, Vec<PathBuf>> {
        self.edges
    }

    pub fn as_map(&self) -> &HashMap<PathBuf, Vec<PathBuf>> {
        &self.edges
    }
}

/// Per-file metadata layered on top of a [`DependencyGraph`] for downstream
/// rendering. VCS statistics are computed by an external collaborator and
/// attached here after the fact; the core never populates that field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileMetadata {
    pub extension: Option<String>,
    pub is_test: bool,
    pub vcs_stats: Option<serde_json::Value>,
}

/// Metadata attached to one edge by a downstream collaborator (e.g. a VCS
/// co-change score). Stored as a flat list rather than keyed by `(from,
/// to)`, since a tuple key has no direct JSON representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeAnnotation {
    pub from: PathBuf,
    pub to: PathBuf,
    pub value: serde_json::Value,
}

/// A [`DependencyGraph`] decorated with per-file and per-edge metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileDependencyGraph {
    pub graph: DependencyGraph,
    pub files: HashMap<PathBuf, FileMetadata>,
    pub edge_metadata: Vec<EdgeAnnotation>,
}

impl FileDependencyGraph {
    /// Build the decoration layer from a plain graph, tagging each node's
    /// extension and test-file status via the language registry.
    pub fn from_graph(graph: DependencyGraph, reader: &dyn crate::reader::ContentReader) -> Self {
        let mut files = HashMap::with_capacity(graph.node_count());
        for node in graph.nodes() {
            let extension = node
                .extension()
                .map(|e| format!(".{}", e.to_string_lossy()));
            let is_test = crate::classify::is_test_file(node, reader);
            files.insert(
                node.clone(),
                FileMetadata {
                    extension,
                    is_test,
                    vcs_stats: None,
                },
            );
        }
        Self {
            graph,
            files,
            edge_metadata: Vec::new(),
        }
    }

    pub fn set_vcs_stats(&mut self, file: &Path, stats: serde_json::Value) {
        if let Some(meta) = self.files.get_mut(file) {
            meta.vcs_stats = Some(stats);
        }
    }

    pub fn set_edge_metadata(&mut self, from: PathBuf, to: PathBuf, value: serde_json::Value) {
        self.edge_metadata.push(EdgeAnnotation { from, to, value });
    }
}
