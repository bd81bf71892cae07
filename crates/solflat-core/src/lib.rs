//! Solflat Core: import graph, ordering, and source flattening

pub mod model;
pub mod error;
pub mod resolve;
pub mod graph;
pub mod builder;
pub mod sort;
pub mod flatten;
pub mod output;
pub mod pipeline;


#[cfg(test)]
pub mod test_utils;

pub use model::{FileKey, AstNode, SourceUnit, SourceUnitAst, SourceText, CompilationSnapshot, IMPORT_DIRECTIVE};
pub use error::{FlattenError, Result};
pub use resolve::PathResolver;
pub use graph::{DependencyGraph, ImportEdge};
pub use builder::{DependencyGraphBuilder, GraphBuild, ImportCycle, SkippedImport, CyclePolicy, UnresolvedImportPolicy};
pub use sort::TopologicalSorter;
pub use flatten::{SourceFlattener, strip_imports};
pub use output::OutputNaming;
pub use pipeline::{FlattenOptions, Flattened, Ordering, flatten_compilation, flatten_order};
