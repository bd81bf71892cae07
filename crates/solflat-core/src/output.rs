//! Naming of the persisted flattened file

use serde::{Deserialize, Serialize};

use crate::model::FileKey;

/// Where a flattened file is saved, relative to the host's file store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputNaming {
    pub directory: String,
    pub suffix: String,
    pub extension: String,
}

impl Default for OutputNaming {
    fn default() -> Self {
        OutputNaming {
            directory: "browser".to_string(),
            suffix: "_flat".to_string(),
            extension: "sol".to_string(),
        }
    }
}

impl OutputNaming {
    /// `<directory>/<stem><suffix>.<extension>`, where the stem is the
    /// target's file name cut at its first `.`.
    pub fn output_path(&self, target: &FileKey) -> String {
        let file_name = target.file_name();
        let stem = file_name.split('.').next().unwrap_or(file_name);
        let name = format!("{}{}.{}", stem, self.suffix, self.extension);
        let directory = self.directory.trim_end_matches('/');
        if directory.is_empty() {
            name
        } else {
            format!("{}/{}", directory, name)
        }
    }
}
