//! Core data structures for a compiled multi-file program

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// AST node type the compiler uses for `import` statements.
pub const IMPORT_DIRECTIVE: &str = "ImportDirective";

/// Canonical file key, unique across one compilation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileKey(pub String);

impl FileKey {
    pub fn new(key: impl Into<String>) -> Self {
        FileKey(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last path segment, e.g. `Token.sol` for `contracts/Token.sol`.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Everything before the last `/`, empty for top-level keys and `/`
    /// for keys directly under the root.
    pub fn directory(&self) -> &str {
        match self.0.rfind('/') {
            Some(0) => "/",
            Some(idx) => &self.0[..idx],
            None => "",
        }
    }
}

impl fmt::Display for FileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FileKey {
    fn from(key: &str) -> Self {
        FileKey(key.to_string())
    }
}

impl From<String> for FileKey {
    fn from(key: String) -> Self {
        FileKey(key)
    }
}

impl AsRef<str> for FileKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A top-level declaration node of a parsed source unit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AstNode {
    pub node_type: String,
    /// Raw import specifier, only present on import directives.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl AstNode {
    pub fn import(specifier: impl Into<String>) -> Self {
        AstNode {
            node_type: IMPORT_DIRECTIVE.to_string(),
            file: Some(specifier.into()),
        }
    }

    pub fn declaration(node_type: impl Into<String>) -> Self {
        AstNode {
            node_type: node_type.into(),
            file: None,
        }
    }

    pub fn is_import(&self) -> bool {
        self.node_type == IMPORT_DIRECTIVE
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SourceUnitAst {
    #[serde(default)]
    pub nodes: Vec<AstNode>,
}

/// Per-file compiler output: the parsed syntax tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SourceUnit {
    pub ast: SourceUnitAst,
}

impl SourceUnit {
    pub fn new(nodes: Vec<AstNode>) -> Self {
        SourceUnit {
            ast: SourceUnitAst { nodes },
        }
    }

    /// Raw specifiers of every import directive, in source order.
    pub fn import_specifiers(&self) -> impl Iterator<Item = &str> {
        self.ast
            .nodes
            .iter()
            .filter(|node| node.is_import())
            .filter_map(|node| node.file.as_deref())
    }
}

/// Raw text of one source file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SourceText {
    pub content: String,
}

impl SourceText {
    pub fn new(content: impl Into<String>) -> Self {
        SourceText {
            content: content.into(),
        }
    }
}

/// Immutable result of one compilation, replaced wholesale by the next one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompilationSnapshot {
    pub target: FileKey,
    pub sources: BTreeMap<FileKey, SourceText>,
    pub asts: BTreeMap<FileKey, SourceUnit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_version: Option<String>,
}

impl CompilationSnapshot {
    pub fn new(target: impl Into<FileKey>) -> Self {
        CompilationSnapshot {
            target: target.into(),
            sources: BTreeMap::new(),
            asts: BTreeMap::new(),
            language_version: None,
        }
    }

    /// Register a file: its text and the import specifiers found in it.
    pub fn with_file(mut self, key: impl Into<FileKey>, content: &str, imports: &[&str]) -> Self {
        let key = key.into();
        let nodes = imports.iter().map(|spec| AstNode::import(*spec)).collect();
        self.sources.insert(key.clone(), SourceText::new(content));
        self.asts.insert(key, SourceUnit::new(nodes));
        self
    }

    pub fn file_count(&self) -> usize {
        self.sources.len()
    }
}
