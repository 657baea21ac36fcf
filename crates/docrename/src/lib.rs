pub mod committer;
pub mod config;
pub mod error;
pub mod extractor;
pub mod pipeline;
pub mod resolver;
pub mod sanitize;
pub mod watcher;

pub use config::{load_config, Config};
pub use error::{CommitError, ConfigError, ExtractError, ResolveError, WatchError};
pub use extractor::Extractor;
pub use pipeline::{
    JobContext, JobEvent, LogProgress, NoopProgress, Pipeline, PipelineError, ProgressReporter,
};
pub use resolver::{CompletionClient, DocMetadata, MetadataResolver, OpenAiClient};
pub use watcher::DirectoryWatcher;
