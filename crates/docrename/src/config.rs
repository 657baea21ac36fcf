use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Date format used for the `date` metadata field and its default value.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory watched for newly created PDF files.
    #[serde(default = "default_watch_folder")]
    pub watch_folder: PathBuf,

    /// Model name passed to the completion endpoint.
    #[serde(default = "default_llm_model")]
    pub llm_model: String,

    /// API key for the completion endpoint. Usually supplied via
    /// the OPENAI_API_KEY environment variable rather than the file.
    #[serde(default)]
    pub llm_api_key: String,

    /// Base URL of an OpenAI-compatible completion API.
    #[serde(default = "default_llm_base_url")]
    pub llm_base_url: String,

    /// Maximum number of characters of document text submitted to the model.
    #[serde(default = "default_llm_input_char_limit")]
    pub llm_input_char_limit: usize,

    /// Resolution used when rendering pages for OCR.
    #[serde(default = "default_ocr_dpi")]
    pub ocr_dpi: u32,

    /// Tesseract language codes, joined with '+'.
    #[serde(default = "default_ocr_languages")]
    pub ocr_languages: Vec<String>,

    /// How often to try opening a freshly created file before giving up.
    #[serde(default = "default_ready_attempts")]
    pub ready_attempts: u32,

    /// Delay between readiness attempts, in milliseconds.
    #[serde(default = "default_ready_delay_ms")]
    pub ready_delay_ms: u64,
}

fn default_watch_folder() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join("Desktop").join("pdfs"))
        .unwrap_or_else(|| PathBuf::from("pdfs"))
}

fn default_llm_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_llm_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_llm_input_char_limit() -> usize {
    12_000
}

fn default_ocr_dpi() -> u32 {
    300
}

fn default_ocr_languages() -> Vec<String> {
    vec!["eng".to_string()]
}

fn default_ready_attempts() -> u32 {
    10
}

fn default_ready_delay_ms() -> u64 {
    500
}

impl Default for Config {
    fn default() -> Self {
        Self {
            watch_folder: default_watch_folder(),
            llm_model: default_llm_model(),
            llm_api_key: String::new(),
            llm_base_url: default_llm_base_url(),
            llm_input_char_limit: default_llm_input_char_limit(),
            ocr_dpi: default_ocr_dpi(),
            ocr_languages: default_ocr_languages(),
            ready_attempts: default_ready_attempts(),
            ready_delay_ms: default_ready_delay_ms(),
        }
    }
}

impl Config {
    /// Overrides file-based settings with environment variables, so a config
    /// file stays optional and secrets stay out of it.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(folder) = std::env::var("WATCH_FOLDER") {
            self.watch_folder = PathBuf::from(folder);
        }
        if let Ok(model) = std::env::var("LLM_MODEL") {
            self.llm_model = model;
        }
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            self.llm_api_key = key;
        }
        if let Ok(url) = std::env::var("LLM_BASE_URL") {
            self.llm_base_url = url;
        }
    }
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let config: Config = serde_json::from_str(content)?;
    Ok(config)
}
