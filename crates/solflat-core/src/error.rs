//! Error types for the flatten pipeline

use crate::model::FileKey;
use thiserror::Error;

/// Failure of a single flatten or save invocation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlattenError {
    /// A file in the ordering has no source text.
    #[error("no source text for {key}")]
    MissingSource { key: FileKey },

    /// An import specifier resolved to a file the compiler never parsed.
    #[error("{importer}: import \"{specifier}\" resolves to {resolved}, which is not part of the compilation")]
    UnresolvedImport {
        importer: FileKey,
        specifier: String,
        resolved: FileKey,
    },

    #[error("import cycle: {}", format_cycle(.cycle))]
    CyclicGraph { cycle: Vec<FileKey> },

    #[error("no compilation result available; compile a file first")]
    NoActiveCompilation,

    /// The compilation target itself has no syntax tree.
    #[error("target {0} is not part of the compilation")]
    UnknownTarget(FileKey),

    #[error("nothing to save; flatten {0} first")]
    NotFlattened(FileKey),
}

fn format_cycle(cycle: &[FileKey]) -> String {
    let mut parts: Vec<&str> = cycle.iter().map(FileKey::as_str).collect();
    if let Some(first) = cycle.first() {
        parts.push(first.as_str());
    }
    parts.join(" -> ")
}

pub type Result<T> = std::result::Result<T, FlattenError>;
