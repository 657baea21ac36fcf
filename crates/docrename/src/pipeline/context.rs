use std::path::PathBuf;

use crate::resolver::DocMetadata;

/// Per-job state threaded through the three stages. Each optional field is
/// recorded exactly once by the runner as its stage completes; ordering is
/// enforced by the runner passing stage outputs forward, not by runtime
/// checks.
pub struct JobContext {
    /// Source file; immutable for the job's lifetime. The final rename is a
    /// filesystem side effect, not a mutation of this field.
    pub document_path: PathBuf,

    /// Stage 1 result — guaranteed Some after the extract step.
    pub raw_text: Option<String>,

    /// Stage 2 result — guaranteed Some after the resolve step.
    pub metadata: Option<DocMetadata>,
}

impl JobContext {
    pub fn new(document_path: PathBuf) -> Self {
        Self {
            document_path,
            raw_text: None,
            metadata: None,
        }
    }
}
