pub mod client;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{Config, DATE_FORMAT};
use crate::error::ResolveError;

pub use client::{CompletionClient, OpenAiClient};

/// Fixed extraction instruction sent as the system message.
const SYSTEM_PROMPT: &str = "You are a parser that extracts three fields from documents:\n\
    - date (yyyy-mm-dd; today if absent)\n\
    - title (<= 8 words, no commas)\n\
    - addressee (first name only; blank if unknown)\n\
    Return JSON exactly like {\"date\":\"...\", \"title\":\"...\", \"addressee\":\"...\"}";

/// Structured metadata derived from a document.
///
/// All fields are guaranteed non-empty once `normalized` has run; raw model
/// output may leave any of them blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocMetadata {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub addressee: String,
}

impl DocMetadata {
    /// Applies the documented defaults: missing or unparseable `date` becomes
    /// `today`, blank `title` becomes "Untitled", blank `addressee` becomes
    /// "Unknown". Title and addressee are whitespace-trimmed.
    pub fn normalized(&self, today: NaiveDate) -> DocMetadata {
        let date = match NaiveDate::parse_from_str(self.date.trim(), DATE_FORMAT) {
            Ok(parsed) => parsed.format(DATE_FORMAT).to_string(),
            Err(_) => today.format(DATE_FORMAT).to_string(),
        };

        let title = self.title.trim();
        let title = if title.is_empty() {
            "Untitled".to_string()
        } else {
            title.to_string()
        };

        let addressee = self.addressee.trim();
        let addressee = if addressee.is_empty() {
            "Unknown".to_string()
        } else {
            addressee.to_string()
        };

        DocMetadata {
            date,
            title,
            addressee,
        }
    }
}

pub struct MetadataResolver {
    client: Box<dyn CompletionClient>,
    input_char_limit: usize,
}

impl MetadataResolver {
    pub fn new(client: Box<dyn CompletionClient>, input_char_limit: usize) -> Self {
        Self {
            client,
            input_char_limit,
        }
    }

    /// Production constructor — OpenAI-compatible client from config.
    pub fn from_config(config: &Config) -> Self {
        let client = OpenAiClient::new(
            config.llm_model.clone(),
            config.llm_api_key.clone(),
            config.llm_base_url.clone(),
        );
        Self::new(Box::new(client), config.llm_input_char_limit)
    }

    /// Derives `{date, title, addressee}` from raw document text.
    ///
    /// The model response is parsed with serde_json only and fails closed on
    /// anything that is not a JSON object — responses derive from untrusted
    /// document content and must never be evaluated.
    pub fn resolve(&self, raw_text: &str) -> Result<DocMetadata, ResolveError> {
        let _span = tracing::info_span!("resolver").entered();

        let excerpt = truncate_chars(raw_text, self.input_char_limit);
        let user_prompt = format!("Document text follows ```\n{}\n```", excerpt);

        let content = self
            .client
            .complete(SYSTEM_PROMPT, &user_prompt)?
            .ok_or(ResolveError::EmptyResponse)?;

        let payload = strip_code_fence(&content);
        let metadata: DocMetadata = serde_json::from_str(payload)
            .map_err(|e| ResolveError::ParseResponse(e.to_string()))?;

        let normalized = metadata.normalized(chrono::Local::now().date_naive());
        debug!(
            date = %normalized.date,
            title = %normalized.title,
            "Resolved metadata"
        );
        Ok(normalized)
    }
}

/// Truncates on a character boundary; the model's input budget is counted in
/// characters, not bytes.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Strips one surrounding markdown code fence, with an optional `json` tag.
/// Anything else is returned as-is and left to the JSON parser to reject.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    match rest.trim_start().strip_suffix("```") {
        Some(inner) => inner.trim(),
        None => trimmed,
    }
}
