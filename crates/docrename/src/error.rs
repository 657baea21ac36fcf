use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Failed to read document '{path}': {source}")]
    ReadDocument {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse PDF '{path}': {source}")]
    ParseDocument {
        path: PathBuf,
        #[source]
        source: lopdf::Error,
    },

    #[error("Failed to render pages: {0}")]
    Render(String),

    #[error("OCR failed: {0}")]
    Ocr(String),
}

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Language model request failed: {0}")]
    Request(String),

    #[error("Language model returned no content")]
    EmptyResponse,

    #[error("Failed to parse language model response: {0}")]
    ParseResponse(String),
}

#[derive(Error, Debug)]
pub enum CommitError {
    #[error("Target file already exists: {0}")]
    Collision(PathBuf),

    #[error("Failed to rename '{from}' to '{to}': {source}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum WatchError {
    #[error("Watch error: {0}")]
    Watch(String),
}
