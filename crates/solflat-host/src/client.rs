//! Host-side effects: notifications, clipboard, and file persistence

use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, info};

use crate::status::Status;

/// The environment a flatten session reports to.
#[async_trait]
pub trait HostClient: Send + Sync {
    /// Update the status badge.
    async fn emit_status(&self, status: Status) -> Result<()>;

    /// Show a transient message to the user.
    async fn show_alert(&self, message: &str) -> Result<()>;

    async fn copy_to_clipboard(&self, text: &str) -> Result<()>;

    /// Persist `text` under the host-relative `path`.
    async fn set_file(&self, path: &str, text: &str) -> Result<()>;
}

/// A timestamped status as recorded by [`LocalHost`].
#[derive(Debug, Clone)]
pub struct StatusRecord {
    pub at: chrono::DateTime<chrono::Utc>,
    pub status: Status,
}

/// Host backed by the local filesystem.
///
/// Files land under `root`; the clipboard is an optional file.
pub struct LocalHost {
    root: PathBuf,
    clipboard: Option<PathBuf>,
    read_only: bool,
    history: Mutex<Vec<StatusRecord>>,
}

impl LocalHost {
    pub fn new(root: impl AsRef<Path>) -> Self {
        LocalHost {
            root: root.as_ref().to_path_buf(),
            clipboard: None,
            read_only: false,
            history: Mutex::new(Vec::new()),
        }
    }

    /// Write clipboard contents to `path` instead of discarding them.
    pub fn with_clipboard_file(mut self, path: impl AsRef<Path>) -> Self {
        self.clipboard = Some(path.as_ref().to_path_buf());
        self
    }

    /// Log file writes instead of performing them.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Every status emitted so far, oldest first.
    pub fn status_history(&self) -> Vec<StatusRecord> {
        match self.history.lock() {
            Ok(history) => history.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            anyhow::bail!("Refusing to write outside the host root: {}", path);
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl HostClient for LocalHost {
    async fn emit_status(&self, status: Status) -> Result<()> {
        info!(
            "Status: {:?}{}",
            status.key,
            status.title.as_deref().map(|t| format!(" ({})", t)).unwrap_or_default()
        );
        let record = StatusRecord {
            at: chrono::Utc::now(),
            status,
        };
        match self.history.lock() {
            Ok(mut history) => history.push(record),
            Err(poisoned) => poisoned.into_inner().push(record),
        }
        Ok(())
    }

    async fn show_alert(&self, message: &str) -> Result<()> {
        info!("{}", message);
        Ok(())
    }

    async fn copy_to_clipboard(&self, text: &str) -> Result<()> {
        match &self.clipboard {
            Some(path) => {
                tokio::fs::write(path, text)
                    .await
                    .with_context(|| format!("Cannot write clipboard file {}", path.display()))?;
                debug!("Copied {} bytes to {}", text.len(), path.display());
            }
            None => debug!("No clipboard configured; {} bytes not copied", text.len()),
        }
        Ok(())
    }

    async fn set_file(&self, path: &str, text: &str) -> Result<()> {
        let full = self.resolve(path)?;
        if self.read_only {
            info!("Not saving {} ({} bytes)", full.display(), text.len());
            return Ok(());
        }
        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Cannot create {}", parent.display()))?;
        }
        tokio::fs::write(&full, text)
            .await
            .with_context(|| format!("Cannot write {}", full.display()))?;
        info!("Wrote {}", full.display());
        Ok(())
    }
}
