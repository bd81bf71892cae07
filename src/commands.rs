//! CLI command implementations

use solflat_core::flatten_order;
use solflat_host::{CompilationFinished, Config, FlattenSession, LocalHost};
use std::path::PathBuf;
use std::sync::Arc;

pub async fn flatten(
    root: PathBuf,
    event: PathBuf,
    stdout: bool,
    save: bool,
    clipboard: Option<PathBuf>,
) -> anyhow::Result<()> {
    let config = Config::load(&root).await?;
    let event = CompilationFinished::from_path(&event).await?;

    let mut host = LocalHost::new(&root);
    if let Some(path) = clipboard {
        host = host.with_clipboard_file(path);
    }
    if !save {
        host = host.read_only();
    }

    let session = FlattenSession::with_config(Arc::new(host), config);
    let label = session.on_compilation_finished(event).await?;
    tracing::info!("{}", label);

    let flattened = session.flatten().await?;
    tracing::info!(
        "Flattened {} files into {} bytes",
        flattened.order.len(),
        flattened.text.len()
    );

    if stdout {
        print!("{}", flattened.text);
    }

    Ok(())
}

pub async fn order(root: PathBuf, event: PathBuf) -> anyhow::Result<()> {
    let config = Config::load(&root).await?;
    let snapshot = CompilationFinished::from_path(&event).await?.into_snapshot();

    let ordering = flatten_order(&snapshot, config.flatten)?;
    for (i, key) in ordering.order.iter().enumerate() {
        println!("{:>3}. {}", i + 1, key);
    }
    for cycle in &ordering.cycles {
        println!("cycle: {} -> {} (ignored)", cycle.importer, cycle.dependee);
    }
    for skipped in &ordering.skipped {
        println!("skipped: {} imports missing {}", skipped.importer, skipped.resolved);
    }

    Ok(())
}
