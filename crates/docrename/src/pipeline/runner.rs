use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info_span};

use crate::committer;
use crate::config::Config;
use crate::extractor::Extractor;
use crate::resolver::{DocMetadata, MetadataResolver};
use crate::sanitize;

use super::context::JobContext;
use super::error::PipelineError;
use super::progress::{JobEvent, ProgressReporter};

pub struct Pipeline {
    config: Arc<Config>,
    extractor: Extractor,
    resolver: MetadataResolver,
}

impl Pipeline {
    /// Production constructor — builds the stage components from config.
    pub fn from_config(config: Arc<Config>) -> Self {
        let extractor = Extractor::new(&config.ocr_languages, config.ocr_dpi);
        let resolver = MetadataResolver::from_config(&config);
        Self::new(config, extractor, resolver)
    }

    /// Constructor with injected stage components.
    pub fn new(config: Arc<Config>, extractor: Extractor, resolver: MetadataResolver) -> Self {
        Self {
            config,
            extractor,
            resolver,
        }
    }

    /// Entry point for watcher events: waits for the source file to be fully
    /// written, then runs the three stages for it.
    pub fn run_for_path(
        &self,
        path: &Path,
        progress: &dyn ProgressReporter,
    ) -> Result<PathBuf, PipelineError> {
        if let Err(e) = self.wait_until_ready(path) {
            progress.report(JobEvent::Failed {
                kind: e.kind(),
                path: path.to_path_buf(),
                error: e.to_string(),
            });
            return Err(e);
        }

        self.run(JobContext::new(path.to_path_buf()), progress)
    }

    /// Runs extract → resolve → commit strictly in order. Any stage error is
    /// terminal for the job and leaves the source file untouched.
    pub fn run(
        &self,
        mut ctx: JobContext,
        progress: &dyn ProgressReporter,
    ) -> Result<PathBuf, PipelineError> {
        let filename = sanitize::redact_path(&ctx.document_path);
        let _pipeline_span = info_span!("pipeline", file = %filename).entered();

        match self.run_stages(&mut ctx, progress) {
            Ok(new_path) => {
                progress.report(JobEvent::Completed {
                    new_path: new_path.clone(),
                });
                Ok(new_path)
            }
            Err(e) => {
                progress.report(JobEvent::Failed {
                    kind: e.kind(),
                    path: ctx.document_path.clone(),
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Each stage's output flows directly into the next and is recorded in
    /// the context afterwards, so no stage has to assume a previous write.
    fn run_stages(
        &self,
        ctx: &mut JobContext,
        progress: &dyn ProgressReporter,
    ) -> Result<PathBuf, PipelineError> {
        let raw_text = {
            let _step = info_span!("extract").entered();
            progress.report(JobEvent::Stage {
                stage: "extract",
                message: "Extracting document text...".to_string(),
            });
            self.step_extract(ctx)?
        };

        let metadata = {
            let _step = info_span!("resolve").entered();
            progress.report(JobEvent::Stage {
                stage: "resolve",
                message: "Resolving metadata...".to_string(),
            });
            self.step_resolve(&raw_text)?
        };
        ctx.raw_text = Some(raw_text);

        let _step = info_span!("commit").entered();
        progress.report(JobEvent::Stage {
            stage: "commit",
            message: "Renaming file...".to_string(),
        });
        let new_path = self.step_commit(ctx, &metadata)?;
        ctx.metadata = Some(metadata);
        Ok(new_path)
    }

    fn step_extract(&self, ctx: &JobContext) -> Result<String, PipelineError> {
        Ok(self.extractor.extract(&ctx.document_path)?)
    }

    fn step_resolve(&self, raw_text: &str) -> Result<DocMetadata, PipelineError> {
        Ok(self.resolver.resolve(raw_text)?)
    }

    fn step_commit(
        &self,
        ctx: &JobContext,
        metadata: &DocMetadata,
    ) -> Result<PathBuf, PipelineError> {
        Ok(committer::commit(&ctx.document_path, metadata)?)
    }

    /// Bounded wait for the writer to finish with the source file. Exceeding
    /// the budget fails the job rather than processing a partial file.
    fn wait_until_ready(&self, path: &Path) -> Result<(), PipelineError> {
        let attempts = self.config.ready_attempts.max(1);

        for attempt in 1..=attempts {
            match std::fs::File::open(path) {
                Ok(_) => return Ok(()),
                Err(e) => {
                    debug!(
                        "Source not readable (attempt {}/{}): {}",
                        attempt, attempts, e
                    );
                    if attempt < attempts {
                        std::thread::sleep(Duration::from_millis(self.config.ready_delay_ms));
                    }
                }
            }
        }

        Err(PipelineError::SourceNotReady {
            path: path.to_path_buf(),
            attempts,
        })
    }
}
