//! Workspace umbrella crate for namematch.
//!
//! Re-exports the matching layer so callers can match a noisy name against
//! a candidate list with a single entry point. The HTTP surface lives in the
//! `namematch-server` crate.
//!
//! ```no_run
//! # async fn run() -> Result<(), namematch::MatchError> {
//! let settings = namematch::Settings::default(); // mock mode
//! let candidates = vec!["Home Office".to_string(), "HMRC".to_string()];
//! let result = namematch::match_string(settings, "Home Ofice", &candidates, None).await?;
//! assert_eq!(result.matched.as_deref(), Some("Home Office"));
//! # Ok(())
//! # }
//! ```

pub use matcher::{
    AzureChatModel, ChatModel, FieldError, MatchError, MatchMetrics, MatchOutcome, MatchRequest,
    MatchResult, MatchService, Message, MockChatModel, ModelFactory, Role, Settings,
    ValidationError, build_prompt, filter_self_matches, load_prompt_text, normalize,
    set_match_metrics, similarity_ratio,
};

use std::sync::Arc;

/// One-shot match with freshly supplied settings.
///
/// Validates the request before any model is built. Long-lived callers should
/// hold a [`MatchService`] instead so the remote client is created once.
pub async fn match_string(
    settings: Settings,
    input_string: &str,
    candidates: &[String],
    prompt_override: Option<&str>,
) -> Result<MatchResult, MatchError> {
    let mut request = MatchRequest::new(input_string, candidates.to_vec());
    if let Some(path) = prompt_override {
        request = request.with_prompt_override(path);
    }
    request.validate()?;

    MatchService::new(Arc::new(settings))
        .match_request(&request)
        .await
}
