use serde::{Deserialize, Serialize};

/// Process-wide matching settings.
///
/// Built once at startup (see `server::config::load_settings`) and shared by
/// reference; nothing in the matching layer reads the environment directly.
///
/// # Example
/// ```
/// use matcher::Settings;
///
/// let settings = Settings {
///     use_mock_llm: false,
///     azure_openai_endpoint: "https://example.openai.azure.com".into(),
///     ..Default::default()
/// };
///
/// assert_eq!(
///     settings.missing_remote_settings(),
///     vec![
///         "AZURE_OPENAI_KEY",
///         "AZURE_OPENAI_DEPLOYMENT_NAME",
///         "AZURE_OPENAI_API_VERSION",
///     ]
/// );
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// Use the local similarity heuristic instead of the hosted model.
    #[serde(default = "default_true")]
    pub use_mock_llm: bool,
    /// Minimum ratio a candidate must reach to be accepted in mock mode.
    #[serde(default = "default_similarity_threshold")]
    pub mock_similarity_threshold: f64,
    /// Default prompt template used when a request does not name one.
    #[serde(default)]
    pub prompt_path: Option<String>,
    #[serde(default)]
    pub azure_openai_endpoint: String,
    #[serde(default)]
    pub azure_openai_key: String,
    #[serde(default)]
    pub azure_openai_deployment_name: String,
    #[serde(default)]
    pub azure_openai_api_version: String,
    /// Sampling temperature sent with every remote completion.
    #[serde(default = "default_temperature")]
    pub azure_openai_temperature: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            use_mock_llm: default_true(),
            mock_similarity_threshold: default_similarity_threshold(),
            prompt_path: None,
            azure_openai_endpoint: String::new(),
            azure_openai_key: String::new(),
            azure_openai_deployment_name: String::new(),
            azure_openai_api_version: String::new(),
            azure_openai_temperature: default_temperature(),
        }
    }
}

impl Settings {
    /// Names of the remote-model settings that are blank, in a fixed order.
    pub fn missing_remote_settings(&self) -> Vec<&'static str> {
        [
            ("AZURE_OPENAI_ENDPOINT", &self.azure_openai_endpoint),
            ("AZURE_OPENAI_KEY", &self.azure_openai_key),
            (
                "AZURE_OPENAI_DEPLOYMENT_NAME",
                &self.azure_openai_deployment_name,
            ),
            ("AZURE_OPENAI_API_VERSION", &self.azure_openai_api_version),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    /// Prompt template to use for a request: the override wins, blank means none.
    pub fn effective_prompt_path<'a>(
        &'a self,
        prompt_override: Option<&'a str>,
    ) -> Option<&'a str> {
        prompt_override
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .or_else(|| {
                self.prompt_path
                    .as_deref()
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
            })
    }
}

fn default_true() -> bool {
    true
}

fn default_similarity_threshold() -> f64 {
    0.85
}

fn default_temperature() -> f32 {
    1.0
}
