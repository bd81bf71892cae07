//! Status notifications shown by the host

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKey {
    None,
    Succeed,
    Failed,
    Saved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusType {
    Success,
    Error,
    Info,
}

/// A status badge update, e.g. `{"key":"succeed","type":"success","title":"Contract flattened"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub key: StatusKey,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<StatusType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Status {
    /// Clears the badge.
    pub fn none() -> Self {
        Status {
            key: StatusKey::None,
            kind: None,
            title: None,
        }
    }

    pub fn succeed(title: impl Into<String>) -> Self {
        Status {
            key: StatusKey::Succeed,
            kind: Some(StatusType::Success),
            title: Some(title.into()),
        }
    }

    pub fn failed(title: impl Into<String>) -> Self {
        Status {
            key: StatusKey::Failed,
            kind: Some(StatusType::Error),
            title: Some(title.into()),
        }
    }

    pub fn saved(title: impl Into<String>) -> Self {
        Status {
            key: StatusKey::Saved,
            kind: Some(StatusType::Info),
            title: Some(title.into()),
        }
    }
}

/// Label of the flatten action for a freshly compiled file.
pub fn action_label(file: &str) -> String {
    let name = file.rsplit('/').next().unwrap_or(file);
    format!("Flatten {}", name)
}
