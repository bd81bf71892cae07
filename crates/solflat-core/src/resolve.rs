//! Import specifier resolution
//!
//! Keys are plain `/`-separated strings as handed out by the compiler, so
//! resolution is string arithmetic only and never touches the filesystem.

use crate::model::FileKey;

/// Resolves raw import specifiers into canonical file keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathResolver;

impl PathResolver {
    pub fn new() -> Self {
        PathResolver
    }

    /// Resolve `specifier` as written inside `importer`.
    ///
    /// `./` and `../` specifiers are relative to the importer's directory;
    /// anything else is already a key and is only normalized.
    pub fn resolve(&self, importer: &FileKey, specifier: &str) -> FileKey {
        if is_relative(specifier) {
            let dir = importer.directory();
            if dir.is_empty() {
                FileKey(normalize(specifier))
            } else {
                FileKey(normalize(&format!("{}/{}", dir, specifier)))
            }
        } else {
            FileKey(normalize(specifier))
        }
    }
}

fn is_relative(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
}

/// Collapse empty, `.` and `..` segments. `..` past the root is dropped.
fn normalize(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    if path.starts_with('/') {
        format!("/{}", joined)
    } else {
        joined
    }
}
