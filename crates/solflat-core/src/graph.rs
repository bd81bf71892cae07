//! Import graph wrapper using petgraph::StableDiGraph keyed by FileKey

use crate::model::FileKey;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::HashMap;

/// Edge payload: the import as it was written in the importing file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportEdge {
    pub specifier: String,
}

/// The import graph. Edges point from importer to dependee.
///
/// Nodes are never removed, so a node's index doubles as its discovery rank.
pub struct DependencyGraph {
    inner: StableDiGraph<FileKey, ImportEdge>,
    index: HashMap<FileKey, NodeIndex>,
}

impl std::fmt::Debug for DependencyGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DependencyGraph")
            .field("node_count", &self.inner.node_count())
            .field("edge_count", &self.inner.edge_count())
            .finish()
    }
}

impl DependencyGraph {
    pub fn new() -> Self {
        DependencyGraph {
            inner: StableDiGraph::new(),
            index: HashMap::new(),
        }
    }

    /// Add a node unless present. Returns its index either way.
    pub fn add_node(&mut self, key: &FileKey) -> NodeIndex {
        if let Some(&idx) = self.index.get(key) {
            return idx;
        }
        let idx = self.inner.add_node(key.clone());
        self.index.insert(key.clone(), idx);
        idx
    }

    /// Add an importer → dependee edge, creating missing endpoints.
    pub fn add_edge(&mut self, importer: &FileKey, dependee: &FileKey, specifier: &str) {
        let source = self.add_node(importer);
        let target = self.add_node(dependee);
        self.inner.add_edge(
            source,
            target,
            ImportEdge {
                specifier: specifier.to_string(),
            },
        );
    }

    pub fn contains(&self, key: &FileKey) -> bool {
        self.index.contains_key(key)
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Total number of edges.
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Check if `importer` already has an edge to `dependee`.
    pub fn has_edge(&self, importer: &FileKey, dependee: &FileKey) -> bool {
        match (self.index.get(importer), self.index.get(dependee)) {
            (Some(&a), Some(&b)) => self.inner.find_edge(a, b).is_some(),
            _ => false,
        }
    }

    pub fn has_edges(&self) -> bool {
        self.inner.edge_count() > 0
    }

    /// Position of a node in discovery order.
    pub fn discovery_rank(&self, key: &FileKey) -> Option<usize> {
        self.index.get(key).map(|idx| idx.index())
    }

    /// Iterate over all nodes in discovery order.
    pub fn nodes(&self) -> impl Iterator<Item = &FileKey> {
        self.inner
            .node_indices()
            .filter_map(move |idx| self.inner.node_weight(idx))
    }

    /// Iterate over all edges as (importer, dependee, edge).
    pub fn edges(&self) -> impl Iterator<Item = (&FileKey, &FileKey, &ImportEdge)> {
        self.inner.edge_indices().filter_map(move |idx| {
            let (source, target) = self.inner.edge_endpoints(idx)?;
            let edge = self.inner.edge_weight(idx)?;
            Some((&self.inner[source], &self.inner[target], edge))
        })
    }

    /// Files imported by `key`, in the order their imports were recorded.
    pub fn dependencies_of(&self, key: &FileKey) -> Vec<&FileKey> {
        self.neighbors(key, Direction::Outgoing)
    }

    /// Files that import `key`, in the order their imports were recorded.
    pub fn dependents_of(&self, key: &FileKey) -> Vec<&FileKey> {
        self.neighbors(key, Direction::Incoming)
    }

    fn neighbors(&self, key: &FileKey, direction: Direction) -> Vec<&FileKey> {
        let Some(&idx) = self.index.get(key) else {
            return Vec::new();
        };
        // petgraph walks adjacency lists newest-first
        let mut edges: Vec<_> = self.inner.edges_directed(idx, direction).collect();
        edges.sort_by_key(|e| e.id().index());
        edges
            .into_iter()
            .map(|e| match direction {
                Direction::Outgoing => &self.inner[e.target()],
                Direction::Incoming => &self.inner[e.source()],
            })
            .collect()
    }

    pub(crate) fn inner(&self) -> &StableDiGraph<FileKey, ImportEdge> {
        &self.inner
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}
