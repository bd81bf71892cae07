//! Import graph construction from per-file syntax trees

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{FlattenError, Result};
use crate::graph::DependencyGraph;
use crate::model::{FileKey, SourceUnit};
use crate::resolve::PathResolver;

/// What to do with an import whose file the compiler never parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnresolvedImportPolicy {
    /// Abort the build with `FlattenError::UnresolvedImport`.
    #[default]
    Fail,
    /// Drop the import, record it, and keep going.
    Skip,
}

/// What to do with an import that closes a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CyclePolicy {
    /// Leave the closing edge out of the graph so the sort always succeeds.
    #[default]
    Break,
    /// Put the closing edge into the graph; sorting then reports the cycle.
    Keep,
}

/// An import pointing back at a file whose traversal is still in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportCycle {
    pub importer: FileKey,
    pub dependee: FileKey,
    pub specifier: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedImport {
    pub importer: FileKey,
    pub specifier: String,
    pub resolved: FileKey,
}

/// Result of a graph build.
#[derive(Debug)]
pub struct GraphBuild {
    pub graph: DependencyGraph,
    /// Cycle-closing imports, in the order they were met.
    pub cycles: Vec<ImportCycle>,
    pub skipped: Vec<SkippedImport>,
}

struct Frame {
    key: FileKey,
    imports: Vec<(String, FileKey)>,
    next: usize,
}

/// Walks syntax trees depth-first from the target, recording import edges.
pub struct DependencyGraphBuilder<'a> {
    asts: &'a BTreeMap<FileKey, SourceUnit>,
    resolver: PathResolver,
    unresolved: UnresolvedImportPolicy,
    cycles: CyclePolicy,
}

impl<'a> DependencyGraphBuilder<'a> {
    pub fn new(asts: &'a BTreeMap<FileKey, SourceUnit>) -> Self {
        DependencyGraphBuilder {
            asts,
            resolver: PathResolver::new(),
            unresolved: UnresolvedImportPolicy::default(),
            cycles: CyclePolicy::default(),
        }
    }

    pub fn with_unresolved_imports(mut self, policy: UnresolvedImportPolicy) -> Self {
        self.unresolved = policy;
        self
    }

    pub fn with_cycle_policy(mut self, policy: CyclePolicy) -> Self {
        self.cycles = policy;
        self
    }

    /// Build the graph reachable from `target`.
    ///
    /// Pre-order DFS on an explicit stack. A file is descended into only the
    /// first time it is met; later imports of a finished file still add an
    /// edge, imports of a file still on the stack are cycles.
    pub fn build(&self, target: &FileKey) -> Result<GraphBuild> {
        let root = self
            .asts
            .get(target)
            .ok_or_else(|| FlattenError::UnknownTarget(target.clone()))?;

        let mut graph = DependencyGraph::new();
        let mut cycles = Vec::new();
        let mut skipped = Vec::new();

        graph.add_node(target);
        let mut visited: HashSet<FileKey> = HashSet::from([target.clone()]);
        let mut on_stack: HashSet<FileKey> = HashSet::from([target.clone()]);
        let mut stack = vec![self.frame(target, root)];

        while let Some(frame) = stack.last_mut() {
            if frame.next == frame.imports.len() {
                on_stack.remove(&frame.key);
                stack.pop();
                continue;
            }

            let (specifier, dep) = frame.imports[frame.next].clone();
            frame.next += 1;
            let importer = frame.key.clone();

            if !visited.contains(&dep) {
                let Some(unit) = self.asts.get(&dep) else {
                    match self.unresolved {
                        UnresolvedImportPolicy::Fail => {
                            return Err(FlattenError::UnresolvedImport {
                                importer,
                                specifier,
                                resolved: dep,
                            });
                        }
                        UnresolvedImportPolicy::Skip => {
                            warn!("Skipping unresolved import \"{}\" in {} ({})", specifier, importer, dep);
                            skipped.push(SkippedImport {
                                importer,
                                specifier,
                                resolved: dep,
                            });
                            continue;
                        }
                    }
                };

                debug!("{} imports {}", importer, dep);
                visited.insert(dep.clone());
                on_stack.insert(dep.clone());
                graph.add_edge(&importer, &dep, &specifier);
                stack.push(self.frame(&dep, unit));
            } else if on_stack.contains(&dep) {
                match self.cycles {
                    CyclePolicy::Break => {
                        warn!("Import cycle: {} imports {}, which is still being resolved; edge dropped", importer, dep);
                    }
                    CyclePolicy::Keep => {
                        debug!("Import cycle: {} imports {}", importer, dep);
                        graph.add_edge(&importer, &dep, &specifier);
                    }
                }
                cycles.push(ImportCycle {
                    importer,
                    dependee: dep,
                    specifier,
                });
            } else if !graph.has_edge(&importer, &dep) {
                graph.add_edge(&importer, &dep, &specifier);
            }
        }

        debug!(
            "Import graph for {}: {} files, {} edges, {} cycles",
            target,
            graph.node_count(),
            graph.edge_count(),
            cycles.len()
        );

        Ok(GraphBuild {
            graph,
            cycles,
            skipped,
        })
    }

    fn frame(&self, key: &FileKey, unit: &SourceUnit) -> Frame {
        let imports = unit
            .import_specifiers()
            .map(|spec| (spec.to_string(), self.resolver.resolve(key, spec)))
            .collect();
        Frame {
            key: key.clone(),
            imports,
            next: 0,
        }
    }
}
