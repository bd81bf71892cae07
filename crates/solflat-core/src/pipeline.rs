//! End-to-end flatten of one compilation snapshot

use serde::{Deserialize, Serialize};

use crate::builder::{CyclePolicy, DependencyGraphBuilder, ImportCycle, SkippedImport, UnresolvedImportPolicy};
use crate::error::{FlattenError, Result};
use crate::flatten::SourceFlattener;
use crate::model::{CompilationSnapshot, FileKey};
use crate::sort::TopologicalSorter;

/// Knobs for graph construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlattenOptions {
    pub unresolved_imports: UnresolvedImportPolicy,
    pub cycles: CyclePolicy,
}

/// The flattened text plus what was learned while producing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Flattened {
    pub target: FileKey,
    /// Concatenation order, dependees first.
    pub order: Vec<FileKey>,
    pub text: String,
    pub cycles: Vec<ImportCycle>,
    pub skipped: Vec<SkippedImport>,
}

/// Concatenation order of a snapshot, before any text is produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Ordering {
    pub order: Vec<FileKey>,
    pub cycles: Vec<ImportCycle>,
    pub skipped: Vec<SkippedImport>,
}

/// Compute only the concatenation order for `snapshot`.
pub fn flatten_order(snapshot: &CompilationSnapshot, options: FlattenOptions) -> Result<Ordering> {
    let build = DependencyGraphBuilder::new(&snapshot.asts)
        .with_unresolved_imports(options.unresolved_imports)
        .with_cycle_policy(options.cycles)
        .build(&snapshot.target)?;
    let order = TopologicalSorter::new().sort(&build.graph, &snapshot.target)?;
    Ok(Ordering {
        order,
        cycles: build.cycles,
        skipped: build.skipped,
    })
}

/// Flatten the current compilation, if there is one.
pub fn flatten_compilation(snapshot: Option<&CompilationSnapshot>, options: FlattenOptions) -> Result<Flattened> {
    let snapshot = snapshot.ok_or(FlattenError::NoActiveCompilation)?;
    let Ordering { order, cycles, skipped } = flatten_order(snapshot, options)?;
    let text = SourceFlattener::new().flatten(&order, &snapshot.sources)?;

    tracing::info!(
        "Flattened {} from {} files ({} bytes)",
        snapshot.target,
        order.len(),
        text.len()
    );

    Ok(Flattened {
        target: snapshot.target.clone(),
        order,
        text,
        cycles,
        skipped,
    })
}
