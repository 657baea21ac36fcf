use std::path::PathBuf;

use thiserror::Error;

use crate::error::{CommitError, ExtractError, ResolveError};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Document read failed: {0}")]
    DocumentRead(#[from] ExtractError),

    #[error("Source file '{path}' still not readable after {attempts} attempts")]
    SourceNotReady { path: PathBuf, attempts: u32 },

    #[error("Metadata extraction failed: {0}")]
    Extraction(#[from] ResolveError),

    #[error("Commit failed: {0}")]
    Commit(#[from] CommitError),
}

impl PipelineError {
    /// Stable tag carried on the failure signal at the collaborator boundary.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::DocumentRead(_) => "document_read",
            PipelineError::SourceNotReady { .. } => "source_not_ready",
            PipelineError::Extraction(_) => "extraction",
            PipelineError::Commit(CommitError::Collision(_)) => "name_collision",
            PipelineError::Commit(_) => "commit",
        }
    }
}
