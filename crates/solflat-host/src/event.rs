//! Wire format of the compiler's "compilation finished" notification

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use solflat_core::{CompilationSnapshot, FileKey, SourceText, SourceUnit};

/// Payload delivered when the compiler finishes a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilationFinished {
    /// File the user compiled.
    pub file: String,
    pub source: CompilationSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_version: Option<String>,
    pub data: CompilerOutput,
}

/// Compiler input: the target and the raw text of every file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompilationSource {
    pub target: FileKey,
    #[serde(default)]
    pub sources: BTreeMap<FileKey, SourceText>,
}

/// Compiler output: one syntax tree per file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompilerOutput {
    #[serde(default)]
    pub sources: BTreeMap<FileKey, SourceUnit>,
}

impl CompilationFinished {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Malformed compilation event")
    }

    pub async fn from_path(path: &Path) -> Result<Self> {
        let json = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Cannot read compilation event {}", path.display()))?;
        Self::from_json(&json)
    }

    pub fn into_snapshot(self) -> CompilationSnapshot {
        CompilationSnapshot {
            target: self.source.target,
            sources: self.source.sources,
            asts: self.data.sources,
            language_version: self.language_version,
        }
    }
}

impl From<CompilationSnapshot> for CompilationFinished {
    fn from(snapshot: CompilationSnapshot) -> Self {
        CompilationFinished {
            file: snapshot.target.to_string(),
            source: CompilationSource {
                target: snapshot.target,
                sources: snapshot.sources,
            },
            language_version: snapshot.language_version,
            data: CompilerOutput {
                sources: snapshot.asts,
            },
        }
    }
}
