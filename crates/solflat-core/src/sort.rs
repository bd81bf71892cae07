//! Linearizes the import graph into concatenation order

use std::collections::{BinaryHeap, HashMap};

use petgraph::algo::tarjan_scc;
use petgraph::stable_graph::NodeIndex;
use petgraph::Direction;

use crate::error::{FlattenError, Result};
use crate::graph::DependencyGraph;
use crate::model::FileKey;

/// Orders files so that every file comes after everything it imports.
#[derive(Debug, Clone, Copy, Default)]
pub struct TopologicalSorter;

impl TopologicalSorter {
    pub fn new() -> Self {
        TopologicalSorter
    }

    /// Sort `graph`, dependees first.
    ///
    /// Kahn's algorithm over importer → dependee edges, taking the most
    /// recently discovered ready file first, then reversed. Siblings thus
    /// end up in discovery order.
    pub fn sort(&self, graph: &DependencyGraph, target: &FileKey) -> Result<Vec<FileKey>> {
        if !graph.has_edges() {
            return Ok(vec![target.clone()]);
        }

        let inner = graph.inner();
        let mut in_degree: HashMap<NodeIndex, usize> =
            inner.node_indices().map(|idx| (idx, 0)).collect();
        for edge in inner.edge_indices() {
            if let Some((_, dependee)) = inner.edge_endpoints(edge) {
                *in_degree.entry(dependee).or_insert(0) += 1;
            }
        }

        let mut ready: BinaryHeap<usize> = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(idx, _)| idx.index())
            .collect();

        let mut raw = Vec::with_capacity(inner.node_count());
        while let Some(rank) = ready.pop() {
            let idx = NodeIndex::new(rank);
            raw.push(idx);
            // one entry per edge, so parallel edges decrement once each
            for dependee in inner.neighbors_directed(idx, Direction::Outgoing) {
                if let Some(degree) = in_degree.get_mut(&dependee) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.push(dependee.index());
                    }
                }
            }
        }

        if raw.len() < inner.node_count() {
            let cycle = find_cycle(graph);
            tracing::debug!("Sort stalled after {} of {} files", raw.len(), inner.node_count());
            return Err(FlattenError::CyclicGraph { cycle });
        }

        raw.reverse();
        Ok(raw.into_iter().map(|idx| inner[idx].clone()).collect())
    }
}

/// Members of the earliest-discovered cycle, in discovery order.
fn find_cycle(graph: &DependencyGraph) -> Vec<FileKey> {
    let inner = graph.inner();
    let mut components: Vec<Vec<NodeIndex>> = tarjan_scc(inner)
        .into_iter()
        .filter(|component| match component.as_slice() {
            [single] => inner.find_edge(*single, *single).is_some(),
            _ => true,
        })
        .collect();

    for component in components.iter_mut() {
        component.sort();
    }
    components.sort();

    components
        .into_iter()
        .next()
        .unwrap_or_default()
        .into_iter()
        .map(|idx| inner[idx].clone())
        .collect()
}
