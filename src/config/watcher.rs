//! Hot reload of the interrogator configuration file.
//!
//! The parent directory is watched rather than the file itself, so editors
//! that save by renaming a temporary file over the original still trigger a
//! reload. Only configs that parse and validate reach the server; rejected
//! edits are logged and counted, and the running interrogator is kept.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::InterrogatorConfig;
use crate::observability::metrics;

/// Sends a validated [`InterrogatorConfig`] each time the file changes.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<InterrogatorConfig>,
}

impl ConfigWatcher {
    /// Returns the watcher and the receiver the server drains updates from.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<InterrogatorConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching. Reloads stop when the returned handle is dropped.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let Self { path, update_tx } = self;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let watched = path.clone();
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if touches(&event, &watched) => {
                    reload(&watched, &update_tx);
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = %e, "Config watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::info!(path = %path.display(), "Config watcher started");
        Ok(watcher)
    }
}

/// Whether `event` creates or modifies the watched file.
fn touches(event: &Event, path: &Path) -> bool {
    if !(event.kind.is_modify() || event.kind.is_create()) {
        return false;
    }
    let Some(name) = path.file_name() else {
        return false;
    };
    event.paths.iter().any(|p| p.file_name() == Some(name))
}

/// Load `path` and forward it when valid. Returns whether a config was sent.
fn reload(path: &Path, update_tx: &mpsc::UnboundedSender<InterrogatorConfig>) -> bool {
    let config = match load_config(path) {
        Ok(config) => config,
        Err(e) => {
            metrics::record_config_reload(false);
            tracing::error!(
                path = %path.display(),
                error = %e,
                "Rejected config file change. Keeping current configuration."
            );
            return false;
        }
    };

    let context = config.context.name.clone();
    if update_tx.send(config).is_err() {
        tracing::warn!(path = %path.display(), "Config receiver closed; dropping reload");
        return false;
    }
    tracing::info!(path = %path.display(), context = %context, "Config file change loaded");
    true
}
