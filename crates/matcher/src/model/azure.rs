use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{ChatModel, Message};
use crate::config::Settings;
use crate::types::MatchError;

/// Chat client for an Azure OpenAI deployment.
///
/// Holds one pooled `reqwest::Client`; build it once and share it.
#[derive(Debug, Clone)]
pub struct AzureChatModel {
    client: reqwest::Client,
    url: String,
    api_key: String,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    messages: &'a [Message],
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl AzureChatModel {
    /// Build a client from settings, failing with every missing setting named.
    pub fn from_settings(settings: &Settings) -> Result<Self, MatchError> {
        let missing = settings.missing_remote_settings();
        if !missing.is_empty() {
            return Err(MatchError::Configuration {
                missing: missing.into_iter().map(String::from).collect(),
            });
        }

        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| MatchError::Model(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: completions_url(
                &settings.azure_openai_endpoint,
                &settings.azure_openai_deployment_name,
                &settings.azure_openai_api_version,
            ),
            api_key: settings.azure_openai_key.trim().to_string(),
            temperature: settings.azure_openai_temperature,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

fn completions_url(endpoint: &str, deployment: &str, api_version: &str) -> String {
    format!(
        "{}/openai/deployments/{}/chat/completions?api-version={}",
        endpoint.trim().trim_end_matches('/'),
        deployment.trim(),
        api_version.trim()
    )
}

#[async_trait]
impl ChatModel for AzureChatModel {
    async fn invoke(&self, messages: &[Message]) -> Result<String, MatchError> {
        let response = self
            .client
            .post(&self.url)
            .header("api-key", &self.api_key)
            .json(&ChatCompletionRequest {
                messages,
                temperature: self.temperature,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MatchError::Model(format!(
                "chat completion failed with status {status}: {body}"
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| MatchError::Model(format!("invalid chat completion response: {e}")))?;

        Ok(extract_content(completion))
    }
}

fn extract_content(completion: ChatCompletionResponse) -> String {
    completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .unwrap_or_default()
}
