//! Concatenation of ordered source files with imports stripped

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{FlattenError, Result};
use crate::model::{FileKey, SourceText};

/// A whole line starting with the `import` keyword, alone or followed by
/// whitespace. Only the first line of a multi-line import matches;
/// continuation lines are left as-is.
static IMPORT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[^\S\n]*import(?:[^\S\n]+.*)?$").expect("import pattern is valid")
});

/// Blank the text of every import line. Line breaks are kept.
pub fn strip_imports(source: &str) -> Cow<'_, str> {
    IMPORT_LINE.replace_all(source, "")
}

/// Joins source files into one text in the given order.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceFlattener;

impl SourceFlattener {
    pub fn new() -> Self {
        SourceFlattener
    }

    /// Each file becomes `// File: <key>`, a blank line, its import-free
    /// content and a blank-line separator. Fails without partial output if
    /// any file lacks source text.
    pub fn flatten(&self, order: &[FileKey], sources: &BTreeMap<FileKey, SourceText>) -> Result<String> {
        let mut out = String::new();
        for key in order {
            let source = sources
                .get(key)
                .ok_or_else(|| FlattenError::MissingSource { key: key.clone() })?;
            tracing::debug!("Appending {} ({} bytes)", key, source.content.len());

            out.push_str("// File: ");
            out.push_str(key.as_str());
            out.push_str("\n\n");
            out.push_str(&strip_imports(&source.content));
            out.push_str("\n\n");
        }
        Ok(out)
    }
}
