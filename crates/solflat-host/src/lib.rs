//! Host boundary for solflat
//!
//! Receives compilation events, runs the flatten pipeline, and hands the
//! result to the host for notification, clipboard, and persistence.

pub mod event;
pub mod status;
pub mod client;
pub mod config;
pub mod session;

pub use event::{CompilationFinished, CompilationSource, CompilerOutput};
pub use status::{Status, StatusKey, StatusType, action_label};
pub use client::{HostClient, LocalHost, StatusRecord};
pub use config::{Config, CONFIG_FILE};
pub use session::{FlattenSession, SessionCommand, FLATTENED_TITLE};
