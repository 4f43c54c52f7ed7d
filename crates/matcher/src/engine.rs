use std::sync::Arc;
use std::time::Instant;

use crate::config::Settings;
use crate::metrics::{metrics_recorder, MatchOutcome};
use crate::model::{ChatModel, Message, ModelFactory};
use crate::normalize::normalize;
use crate::prompt::build_prompt;
use crate::types::{MatchError, MatchRequest, MatchResult};

#[cfg(test)]
mod tests;

/// Matches input strings against candidate lists through a chat model.
///
/// Cheap to share behind an `Arc`; all state is read-only after construction
/// apart from the once-initialized remote client inside the factory.
pub struct MatchService {
    factory: ModelFactory,
}

impl MatchService {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self::with_factory(ModelFactory::new(settings))
    }

    pub fn with_factory(factory: ModelFactory) -> Self {
        Self { factory }
    }

    pub fn settings(&self) -> &Settings {
        self.factory.settings()
    }

    /// Match a validated request.
    pub async fn match_request(&self, request: &MatchRequest) -> Result<MatchResult, MatchError> {
        self.match_string(
            &request.input_string,
            &request.candidates,
            request.prompt_override.as_deref(),
        )
        .await
    }

    /// Match `input_string` against `candidates` with the configured model.
    ///
    /// In mock mode the model sees the candidates exactly as supplied; the
    /// prompt lists them with the input string itself removed.
    pub async fn match_string(
        &self,
        input_string: &str,
        candidates: &[String],
        prompt_override: Option<&str>,
    ) -> Result<MatchResult, MatchError> {
        let start = Instant::now();
        let label = if self.settings().use_mock_llm {
            "mock"
        } else {
            "remote"
        };
        let result = match self.factory.chat_model(candidates) {
            Ok(model) => {
                self.run(input_string, candidates, prompt_override, model.as_ref())
                    .await
            }
            Err(err) => Err(err),
        };
        observe(label, start, &result);
        result
    }

    /// Match against an explicitly supplied model instead of the configured one.
    ///
    /// Reported to the metrics recorder under the `"injected"` label.
    pub async fn match_with_model(
        &self,
        input_string: &str,
        candidates: &[String],
        prompt_override: Option<&str>,
        model: &dyn ChatModel,
    ) -> Result<MatchResult, MatchError> {
        let start = Instant::now();
        let result = self
            .run(input_string, candidates, prompt_override, model)
            .await;
        observe("injected", start, &result);
        result
    }

    async fn run(
        &self,
        input_string: &str,
        candidates: &[String],
        prompt_override: Option<&str>,
        model: &dyn ChatModel,
    ) -> Result<MatchResult, MatchError> {
        let shown = filter_self_matches(input_string, candidates);
        let template = self.settings().effective_prompt_path(prompt_override);
        let prompt = build_prompt(input_string, &shown, template)?;

        let messages = [Message::system(prompt), Message::user(input_string)];

        tracing::info!(
            input = %input_string,
            candidates = candidates.len(),
            shown = shown.len(),
            template = template.unwrap_or("default"),
            "matching input string"
        );
        let raw = model.invoke(&messages).await?;
        tracing::debug!(input = %input_string, raw = %raw, "model response");

        Ok(MatchResult {
            input_string: input_string.to_string(),
            matched: normalize(&raw),
            raw,
        })
    }
}

fn observe(model: &'static str, start: Instant, result: &Result<MatchResult, MatchError>) {
    let Some(recorder) = metrics_recorder() else {
        return;
    };
    let outcome = match result {
        Ok(r) if r.matched.is_some() => MatchOutcome::Matched,
        Ok(_) => MatchOutcome::NoMatch,
        Err(_) => MatchOutcome::Failed,
    };
    recorder.record_match(model, start.elapsed(), outcome);
}

/// Candidates with every exact (case-sensitive) copy of `input_string` removed.
///
/// Keeps the order and any duplicates of the remaining entries. A noisy name
/// that was itself pasted into the candidate list must not match itself.
pub fn filter_self_matches(input_string: &str, candidates: &[String]) -> Vec<String> {
    candidates
        .iter()
        .filter(|candidate| candidate.as_str() != input_string)
        .cloned()
        .collect()
}
