use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::sanitize;

/// Events emitted by the pipeline while a job runs. The completion and
/// failure events form the signal consumed by the notification layer.
pub enum JobEvent {
    Stage {
        stage: &'static str,
        message: String,
    },
    Completed {
        new_path: PathBuf,
    },
    Failed {
        kind: &'static str,
        path: PathBuf,
        error: String,
    },
}

pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: JobEvent);
}

/// No-op reporter for unit tests.
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn report(&self, _event: JobEvent) {}
}

/// Logs job events; stands in for the out-of-scope OS notification layer.
pub struct LogProgress;

impl ProgressReporter for LogProgress {
    fn report(&self, event: JobEvent) {
        match event {
            JobEvent::Stage { stage, message } => debug!("[{}] {}", stage, message),
            JobEvent::Completed { new_path } => {
                info!("Renamed to '{}'", new_path.display());
            }
            JobEvent::Failed { kind, path, error } => {
                warn!(
                    "Job failed ({}) for '{}': {}",
                    kind,
                    sanitize::redact_path(&path),
                    error
                );
            }
        }
    }
}
