//! Chat-model abstraction.
//!
//! Everything the matching service needs from a language model is one call:
//! send a conversation, get text back. [`MockChatModel`] answers locally with a
//! string-similarity heuristic; [`AzureChatModel`] calls a hosted deployment.
//! [`ModelFactory`] picks between them from [`Settings`].

mod azure;
mod mock;

use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::types::MatchError;

pub use azure::AzureChatModel;
pub use mock::MockChatModel;

/// Author of a conversation message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One role-tagged message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// A model that answers a conversation with text.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send the full conversation and return the reply text.
    async fn invoke(&self, messages: &[Message]) -> Result<String, MatchError>;
}

/// Chooses the chat model for each request.
///
/// In mock mode a fresh [`MockChatModel`] is built per request from that
/// request's candidates. Otherwise a single remote client is built on first
/// use and shared; a failed build is not cached, so later requests retry it.
pub struct ModelFactory {
    settings: Arc<Settings>,
    remote: OnceCell<Arc<dyn ChatModel>>,
}

impl ModelFactory {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self {
            settings,
            remote: OnceCell::new(),
        }
    }

    /// Factory whose shared remote slot is already filled with `model`.
    ///
    /// Only consulted when mock mode is off.
    pub fn with_remote_model(settings: Arc<Settings>, model: Arc<dyn ChatModel>) -> Self {
        Self {
            settings,
            remote: OnceCell::with_value(model),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Model to use for a request offering `candidates`.
    pub fn chat_model(&self, candidates: &[String]) -> Result<Arc<dyn ChatModel>, MatchError> {
        if self.settings.use_mock_llm {
            return Ok(Arc::new(MockChatModel::new(
                candidates.to_vec(),
                self.settings.mock_similarity_threshold,
            )));
        }

        self.remote
            .get_or_try_init(|| {
                let model = AzureChatModel::from_settings(&self.settings).inspect_err(|err| {
                    tracing::warn!(error = %err, "remote chat model unavailable");
                })?;
                tracing::info!(
                    deployment = %self.settings.azure_openai_deployment_name,
                    "remote chat model initialized"
                );
                Ok(Arc::new(model) as Arc<dyn ChatModel>)
            })
            .cloned()
    }
}
