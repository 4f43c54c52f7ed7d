use serde::{Deserialize, Serialize};
use thiserror::Error;

use std::fmt;
use std::io;

/// A single match request: one noisy input string and the candidates it may map to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchRequest {
    /// The free-text string to match.
    pub input_string: String,
    /// Ordered candidate strings. At least one is required.
    pub candidates: Vec<String>,
    /// Optional path of an external prompt template; overrides
    /// [`Settings::prompt_path`](crate::Settings::prompt_path) for this request.
    #[serde(default, rename = "prompt_path")]
    pub prompt_override: Option<String>,
}

impl MatchRequest {
    pub fn new(input_string: impl Into<String>, candidates: Vec<String>) -> Self {
        Self {
            input_string: input_string.into(),
            candidates,
            prompt_override: None,
        }
    }

    pub fn with_prompt_override(mut self, path: impl Into<String>) -> Self {
        self.prompt_override = Some(path.into());
        self
    }

    /// Check the request shape, collecting every offending field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut fields = Vec::new();

        if self.input_string.is_empty() {
            fields.push(FieldError::new(
                "input_string",
                "must be at least 1 character long",
            ));
        }

        if self.candidates.is_empty() {
            fields.push(FieldError::new("candidates", "must contain at least 1 item"));
        }

        for (idx, candidate) in self.candidates.iter().enumerate() {
            if candidate.is_empty() {
                fields.push(FieldError::new(
                    format!("candidates[{idx}]"),
                    "must be at least 1 character long",
                ));
            }
        }

        if fields.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { fields })
        }
    }
}

/// Outcome of matching one input string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchResult {
    pub input_string: String,
    /// The matched text, or `None` when no candidate was good enough.
    #[serde(rename = "match")]
    pub matched: Option<String>,
    /// Model output exactly as returned.
    pub raw: String,
}

/// A single rejected request field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Malformed request. Carries one entry per offending field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub fields: Vec<FieldError>,
}

impl ValidationError {
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            fields: vec![FieldError::new(field, message)],
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|fe| format!("{}: {}", fe.field, fe.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationError {}

/// Errors produced by the matching layer.
#[derive(Debug, Error)]
pub enum MatchError {
    /// The request failed shape validation.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
    /// Remote mode was requested without the settings it needs.
    #[error("Missing required env vars: {}", .missing.join(", "))]
    Configuration { missing: Vec<String> },
    /// The prompt template file could not be read.
    #[error("Prompt file not found: {path}")]
    TemplateNotFound { path: String },
    /// The prompt template lacks a placeholder or contains an unknown one.
    #[error("malformed prompt template {path}: {detail}")]
    TemplateMalformed { path: String, detail: String },
    /// The chat model call failed or returned an unusable payload.
    #[error("model error: {0}")]
    Model(String),
    /// Low-level IO failures.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl From<reqwest::Error> for MatchError {
    fn from(err: reqwest::Error) -> Self {
        MatchError::Model(err.to_string())
    }
}
