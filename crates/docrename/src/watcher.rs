use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use notify::{Config as NotifyConfig, PollWatcher, RecursiveMode};
use notify_debouncer_mini::{new_debouncer_opt, Config as DebouncerConfig, DebouncedEventKind};

use crate::error::WatchError;

/// Watches a single folder for newly created PDF files and hands their paths
/// to a callback, one at a time.
pub struct DirectoryWatcher {
    watch_folder: PathBuf,
}

/// Remembers the path the pipeline last produced so the watcher does not
/// reprocess its own rename. The poll watcher reports that rename as fresh
/// events; without suppression every commit would trigger a second full job.
struct OutputGuard {
    last: Option<PathBuf>,
}

impl OutputGuard {
    fn new() -> Self {
        Self { last: None }
    }

    fn record(&mut self, path: PathBuf) {
        self.last = Some(path);
    }

    /// True exactly once for the recorded path; a later event for the same
    /// name (e.g. a user dropping a new file under it) is processed normally.
    fn suppress(&mut self, path: &Path) -> bool {
        if self.last.as_deref() == Some(path) {
            self.last = None;
            true
        } else {
            false
        }
    }
}

/// Whether an event path is worth dispatching: a PDF that still exists.
/// Renaming a file away surfaces as an event for the old path — by the time
/// it is observed there is nothing there to process.
fn should_dispatch(path: &Path) -> bool {
    if path.is_dir() {
        return false;
    }
    if !is_pdf(path) {
        debug!("Ignoring non-PDF file: {}", path.display());
        return false;
    }
    if !path.exists() {
        debug!("Skipping event for vanished path: {}", path.display());
        return false;
    }
    true
}

impl DirectoryWatcher {
    pub fn new<P: AsRef<Path>>(watch_folder: P) -> Self {
        Self {
            watch_folder: watch_folder.as_ref().to_path_buf(),
        }
    }

    pub fn watch_folder(&self) -> &Path {
        &self.watch_folder
    }

    /// Blocks until `shutdown` is set. Events are debounced and dispatched
    /// sequentially on this thread, so at most one job is in flight. The
    /// callback returns the path the job produced, if any, so the watcher
    /// can ignore the matching event.
    pub fn watch<F>(&self, mut callback: F, shutdown: Arc<AtomicBool>) -> Result<(), WatchError>
    where
        F: FnMut(PathBuf) -> Option<PathBuf>,
    {
        // PollWatcher for Docker/NFS compatibility
        let poll_config = NotifyConfig::default().with_poll_interval(Duration::from_secs(2));

        let debouncer_config = DebouncerConfig::default()
            .with_timeout(Duration::from_millis(500))
            .with_notify_config(poll_config);

        let (tx, rx) = std::sync::mpsc::channel();

        let mut debouncer = new_debouncer_opt::<_, PollWatcher>(debouncer_config, tx)
            .map_err(|e| WatchError::Watch(e.to_string()))?;

        debouncer
            .watcher()
            .watch(&self.watch_folder, RecursiveMode::NonRecursive)
            .map_err(|e| WatchError::Watch(e.to_string()))?;

        info!("Watching directory: {}", self.watch_folder.display());

        let mut guard = OutputGuard::new();

        loop {
            if shutdown.load(Ordering::Relaxed) {
                info!("Watch mode shutting down...");
                break;
            }

            match rx.recv_timeout(Duration::from_millis(100)) {
                Ok(Ok(events)) => {
                    for event in events {
                        if !matches!(event.kind, DebouncedEventKind::Any) {
                            continue;
                        }

                        let path = &event.path;
                        if guard.suppress(path) {
                            debug!("Skipping just-committed output: {}", path.display());
                            continue;
                        }
                        if !should_dispatch(path) {
                            continue;
                        }

                        debug!("Dispatching {}", path.display());
                        if let Some(new_path) = callback(path.clone()) {
                            guard.record(new_path);
                        }
                    }
                }
                Ok(Err(e)) => {
                    warn!("Watch error: {:?}", e);
                }
                Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {}
                Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => {
                    return Err(WatchError::Watch(
                        "watcher channel disconnected".to_string(),
                    ));
                }
            }
        }

        Ok(())
    }
}

/// Case-insensitive `.pdf` extension check.
pub fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}
