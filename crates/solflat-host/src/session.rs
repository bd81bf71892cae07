//! Flatten session driven by host events

use std::sync::Arc;

use anyhow::Result;
use solflat_core::{flatten_compilation, CompilationSnapshot, FileKey, FlattenError, FlattenOptions, Flattened, OutputNaming};
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, error, info, warn};

use crate::client::HostClient;
use crate::config::Config;
use crate::event::CompilationFinished;
use crate::status::{action_label, Status};

/// Title of the success notification and alert.
pub const FLATTENED_TITLE: &str = "Contract flattened";

/// Commands accepted by [`FlattenSession::run`].
#[derive(Debug, Clone)]
pub enum SessionCommand {
    /// A new compilation replaces the previous one
    CompilationFinished(Box<CompilationFinished>),
    Flatten,
    Save,
}

impl SessionCommand {
    pub fn name(&self) -> &'static str {
        match self {
            SessionCommand::CompilationFinished(_) => "compilation-finished",
            SessionCommand::Flatten => "flatten",
            SessionCommand::Save => "save",
        }
    }
}

#[derive(Default)]
struct SessionState {
    compilation: Option<Arc<CompilationSnapshot>>,
    /// Output for `compilation`, once flattened
    flattened: Option<Arc<Flattened>>,
}

/// Holds the latest compilation and the output flattened from it.
pub struct FlattenSession<H: HostClient> {
    host: Arc<H>,
    options: FlattenOptions,
    naming: OutputNaming,
    state: RwLock<SessionState>,
}

impl<H: HostClient> FlattenSession<H> {
    pub fn new(host: Arc<H>) -> Self {
        Self::with_config(host, Config::default())
    }

    pub fn with_config(host: Arc<H>, config: Config) -> Self {
        FlattenSession {
            host,
            options: config.flatten,
            naming: config.output,
            state: RwLock::new(SessionState::default()),
        }
    }

    pub fn host(&self) -> &Arc<H> {
        &self.host
    }

    /// Target of the cached compilation, if any.
    pub async fn current_target(&self) -> Option<FileKey> {
        let state = self.state.read().await;
        state.compilation.as_ref().map(|c| c.target.clone())
    }

    pub async fn last_flattened(&self) -> Option<Arc<Flattened>> {
        self.state.read().await.flattened.clone()
    }

    /// Replace the cached compilation. Returns the flatten action label.
    pub async fn on_compilation_finished(&self, event: CompilationFinished) -> Result<String> {
        let label = action_label(&event.file);
        let snapshot = Arc::new(event.into_snapshot());
        info!("Compilation finished for {} ({} files)", snapshot.target, snapshot.file_count());
        {
            let mut state = self.state.write().await;
            state.compilation = Some(snapshot);
            state.flattened = None;
        }
        self.host.emit_status(Status::none()).await?;
        Ok(label)
    }

    /// Flatten the cached compilation, copy and persist it, then notify.
    ///
    /// On failure a failed status is emitted and the cached state is kept.
    pub async fn flatten(&self) -> Result<Arc<Flattened>> {
        match self.try_flatten().await {
            Ok(flattened) => Ok(flattened),
            Err(e) => {
                self.report_failure(&e).await;
                Err(e)
            }
        }
    }

    async fn try_flatten(&self) -> Result<Arc<Flattened>> {
        let compilation = self.state.read().await.compilation.clone();
        let flattened = Arc::new(flatten_compilation(compilation.as_deref(), self.options)?);

        for cycle in &flattened.cycles {
            warn!("Import of {} from {} closes a cycle and does not constrain the order", cycle.dependee, cycle.importer);
        }

        {
            let mut state = self.state.write().await;
            // a newer compilation may have landed while we were flattening
            let current = match (&state.compilation, &compilation) {
                (Some(now), Some(used)) => Arc::ptr_eq(now, used),
                _ => false,
            };
            if current {
                state.flattened = Some(Arc::clone(&flattened));
            } else {
                debug!("Compilation replaced during flatten; result not cached");
            }
        }

        let path = self.naming.output_path(&flattened.target);
        self.host.copy_to_clipboard(&flattened.text).await?;
        self.host.set_file(&path, &flattened.text).await?;
        self.host.emit_status(Status::succeed(FLATTENED_TITLE)).await?;
        self.host.show_alert(FLATTENED_TITLE).await?;

        Ok(flattened)
    }

    /// Persist the already flattened text. Returns the path written.
    pub async fn save(&self) -> Result<String> {
        match self.try_save().await {
            Ok(path) => Ok(path),
            Err(e) => {
                self.report_failure(&e).await;
                Err(e)
            }
        }
    }

    async fn try_save(&self) -> Result<String> {
        let (compilation, flattened) = {
            let state = self.state.read().await;
            (state.compilation.clone(), state.flattened.clone())
        };
        let compilation = compilation.ok_or(FlattenError::NoActiveCompilation)?;
        let flattened = flattened.ok_or_else(|| FlattenError::NotFlattened(compilation.target.clone()))?;

        let path = self.naming.output_path(&flattened.target);
        self.host.set_file(&path, &flattened.text).await?;
        self.host.emit_status(Status::saved(format!("Saved {}", path))).await?;
        Ok(path)
    }

    async fn report_failure(&self, err: &anyhow::Error) {
        error!("Flatten failed: {:#}", err);
        if let Err(e) = self.host.emit_status(Status::failed(err.to_string())).await {
            warn!("Could not report failure to host: {}", e);
        }
    }

    /// Process commands one at a time until the channel closes.
    pub async fn run(&self, mut commands: mpsc::UnboundedReceiver<SessionCommand>) -> Result<()> {
        info!("Flatten session started");
        while let Some(command) = commands.recv().await {
            debug!("Session command: {}", command.name());
            let outcome = match command {
                SessionCommand::CompilationFinished(event) => {
                    self.on_compilation_finished(*event).await.map(|_| ())
                }
                SessionCommand::Flatten => self.flatten().await.map(|_| ()),
                SessionCommand::Save => self.save().await.map(|_| ()),
            };
            if let Err(e) = outcome {
                debug!("Command failed, session continues: {}", e);
            }
        }
        info!("Flatten session stopped");
        Ok(())
    }
}
