pub mod context;
pub mod error;
pub mod progress;
pub mod runner;

pub use context::JobContext;
pub use error::PipelineError;
pub use progress::{JobEvent, LogProgress, NoopProgress, ProgressReporter};
pub use runner::Pipeline;
