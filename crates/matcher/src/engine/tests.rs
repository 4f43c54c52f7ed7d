use super::*;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::metrics::{set_match_metrics, MatchMetrics};
use crate::model::Role;

/// Replies with a fixed string and keeps every conversation it was sent.
struct ScriptedModel {
    reply: String,
    seen: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedModel {
    fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn conversations(&self) -> Vec<Vec<Message>> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn invoke(&self, messages: &[Message]) -> Result<String, MatchError> {
        self.seen.lock().unwrap().push(messages.to_vec());
        Ok(self.reply.clone())
    }
}

struct FailingModel;

#[async_trait]
impl ChatModel for FailingModel {
    async fn invoke(&self, _messages: &[Message]) -> Result<String, MatchError> {
        Err(MatchError::Model("upstream unavailable".into()))
    }
}

fn list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn mock_service() -> MatchService {
    MatchService::new(Arc::new(Settings::default()))
}

fn sample_candidates() -> Vec<String> {
    list(&[
        "Home Office",
        "HMRC",
        "Ministry of Defence",
        "Cabinet Office",
        "Department for Education",
    ])
}

#[test]
fn filter_removes_exact_match() {
    let candidates = list(&["DWP", "Department for Working Pensions", "HMRC"]);
    assert_eq!(
        filter_self_matches("DWP", &candidates),
        list(&["Department for Working Pensions", "HMRC"])
    );
}

#[test]
fn filter_removes_all_duplicates() {
    let candidates = list(&["DWP", "HMRC", "DWP", "DWP"]);
    assert_eq!(filter_self_matches("DWP", &candidates), list(&["HMRC"]));
}

#[test]
fn filter_is_case_sensitive_and_keeps_other_duplicates() {
    let candidates = list(&["dwp", "HMRC", "DWP ", "HMRC"]);
    assert_eq!(filter_self_matches("DWP", &candidates), candidates);
}

#[test]
fn filter_noop_does_not_mutate_original() {
    let candidates = list(&["HMRC", "Department for Working Pensions"]);
    let original = candidates.clone();

    let out = filter_self_matches("DWP", &candidates);

    assert_eq!(candidates, original);
    assert_eq!(out, original);
}

#[test]
fn filter_can_return_empty() {
    assert!(filter_self_matches("HMRC", &list(&["HMRC", "HMRC"])).is_empty());
}

#[tokio::test]
async fn mock_exact_match() {
    let result = mock_service()
        .match_string("Home Office", &sample_candidates(), None)
        .await
        .unwrap();
    assert_eq!(result.input_string, "Home Office");
    assert_eq!(result.matched.as_deref(), Some("Home Office"));
    assert_eq!(result.raw, "Home Office");
}

#[tokio::test]
async fn mock_sees_unfiltered_candidates() {
    let candidates = list(&["Home Office", "HMRC", "Cabinet Office"]);
    let result = mock_service()
        .match_string("HMRC", &candidates, None)
        .await
        .unwrap();
    assert_eq!(result.matched.as_deref(), Some("HMRC"));
}

#[tokio::test]
async fn mock_no_match_yields_none() {
    let result = mock_service()
        .match_string("Random Organization XYZ", &sample_candidates(), None)
        .await
        .unwrap();
    assert_eq!(result.matched, None);
    assert_eq!(result.raw, "None");
}

#[tokio::test]
async fn mock_typo_and_case() {
    let service = mock_service();
    for input in ["Home Ofice", "home office"] {
        let result = service
            .match_string(input, &sample_candidates(), None)
            .await
            .unwrap();
        assert_eq!(result.matched.as_deref(), Some("Home Office"), "input = {input}");
    }
}

#[tokio::test]
async fn council_name_matches_with_missing_word() {
    let candidates = list(&[
        "Birmingham City Council",
        "Manchester City Council",
        "Leeds City Council",
    ]);
    let result = mock_service()
        .match_string("Birmingham Council", &candidates, None)
        .await
        .unwrap();
    assert_eq!(result.matched.as_deref(), Some("Birmingham City Council"));
}

#[tokio::test]
async fn conversation_is_system_prompt_then_input() {
    let model = ScriptedModel::new("HMRC");
    let candidates = list(&["HMRC", "DWP", "Home Office"]);

    mock_service()
        .match_with_model("DWP", &candidates, None, &model)
        .await
        .unwrap();

    let conversations = model.conversations();
    assert_eq!(conversations.len(), 1);
    let messages = &conversations[0];
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, Role::System);
    assert!(messages[0].content.contains(r#"["HMRC", "Home Office"]"#));
    assert!(!messages[0].content.contains("\"DWP\""));
    assert_eq!(messages[1].role, Role::User);
    assert_eq!(messages[1].content, "DWP");
}

#[tokio::test]
async fn raw_output_is_kept_verbatim() {
    let model = ScriptedModel::new("  'Home Office'\n");
    let result = mock_service()
        .match_with_model("Home Ofice", &sample_candidates(), None, &model)
        .await
        .unwrap();
    assert_eq!(result.raw, "  'Home Office'\n");
    assert_eq!(result.matched.as_deref(), Some("Home Office"));
}

#[tokio::test]
async fn empty_model_output_means_no_match() {
    let model = ScriptedModel::new("");
    let result = mock_service()
        .match_with_model("HMRC", &sample_candidates(), None, &model)
        .await
        .unwrap();
    assert_eq!(result.raw, "");
    assert_eq!(result.matched, None);
}

#[tokio::test]
async fn matching_is_idempotent() {
    let service = mock_service();
    let candidates = sample_candidates();
    let first = service
        .match_string("Cabinet Ofice", &candidates, None)
        .await
        .unwrap();
    let second = service
        .match_string("Cabinet Ofice", &candidates, None)
        .await
        .unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn request_template_is_used() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "Name: {{input_name}}\nOptions: {{candidates}}").unwrap();
    let model = ScriptedModel::new("HMRC");

    let request = MatchRequest::new("H.M.R.C.", list(&["HMRC", "DWP"]))
        .with_prompt_override(file.path().to_str().unwrap());
    mock_service()
        .match_with_model(
            &request.input_string,
            &request.candidates,
            request.prompt_override.as_deref(),
            &model,
        )
        .await
        .unwrap();

    let conversations = model.conversations();
    assert_eq!(
        conversations[0][0].content,
        "Name: H.M.R.C.\nOptions: [\"HMRC\", \"DWP\"]"
    );
}

#[tokio::test]
async fn default_template_from_settings_is_used() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "Default {{input_name}} {{candidates}}").unwrap();
    let settings = Settings {
        prompt_path: Some(file.path().to_str().unwrap().to_string()),
        ..Default::default()
    };
    let service = MatchService::new(Arc::new(settings));
    let model = ScriptedModel::new("None");

    service
        .match_with_model("HMRC", &list(&["DWP"]), None, &model)
        .await
        .unwrap();

    assert_eq!(model.conversations()[0][0].content, "Default HMRC [\"DWP\"]");
}

#[tokio::test]
async fn missing_template_fails_before_model_call() {
    let model = ScriptedModel::new("HMRC");
    let err = mock_service()
        .match_with_model("HMRC", &list(&["DWP"]), Some("prompts/missing.txt"), &model)
        .await
        .expect_err("template should be missing");
    assert!(matches!(err, MatchError::TemplateNotFound { .. }));
    assert!(model.conversations().is_empty());
}

#[tokio::test]
async fn model_failure_propagates() {
    let err = mock_service()
        .match_with_model("HMRC", &list(&["DWP"]), None, &FailingModel)
        .await
        .expect_err("model should fail");
    assert!(err.to_string().contains("upstream unavailable"));
}

#[tokio::test]
async fn remote_mode_without_settings_is_a_configuration_error() {
    let settings = Settings {
        use_mock_llm: false,
        ..Default::default()
    };
    let service = MatchService::new(Arc::new(settings));
    let err = service
        .match_string("HMRC", &list(&["HMRC"]), None)
        .await
        .expect_err("configuration should be incomplete");
    assert!(matches!(err, MatchError::Configuration { .. }));
}

#[tokio::test]
async fn remote_mode_uses_shared_model() {
    let settings = Settings {
        use_mock_llm: false,
        ..Default::default()
    };
    let model = Arc::new(ScriptedModel::new("\"Department for Work and Pensions\""));
    let service = MatchService::with_factory(ModelFactory::with_remote_model(
        Arc::new(settings),
        model.clone(),
    ));

    let candidates = list(&["Department for Work and Pensions", "HMRC"]);
    let result = service.match_string("DWP", &candidates, None).await.unwrap();
    service.match_string("DWP", &candidates, None).await.unwrap();

    assert_eq!(
        result.matched.as_deref(),
        Some("Department for Work and Pensions")
    );
    assert_eq!(model.conversations().len(), 2);
}

#[derive(Default)]
struct RecordingMetrics {
    outcomes: Mutex<Vec<(&'static str, MatchOutcome)>>,
    calls: AtomicUsize,
}

impl MatchMetrics for RecordingMetrics {
    fn record_match(&self, model: &'static str, _latency: Duration, outcome: MatchOutcome) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcomes.lock().unwrap().push((model, outcome));
    }
}

#[tokio::test]
async fn metrics_recorder_tracks_outcomes() {
    let recorder = Arc::new(RecordingMetrics::default());
    set_match_metrics(Some(recorder.clone()));

    let service = mock_service();
    service
        .match_string("Home Office", &sample_candidates(), None)
        .await
        .unwrap();
    service
        .match_string("Random Organization XYZ", &sample_candidates(), None)
        .await
        .unwrap();
    let _ = service
        .match_with_model("HMRC", &sample_candidates(), None, &FailingModel)
        .await;

    let remote = MatchService::with_factory(ModelFactory::with_remote_model(
        Arc::new(Settings {
            use_mock_llm: false,
            ..Default::default()
        }),
        Arc::new(ScriptedModel::new("None")),
    ));
    remote
        .match_string("Unlisted Agency", &sample_candidates(), None)
        .await
        .unwrap();

    set_match_metrics(None);

    // Other tests may run concurrently and report through the same recorder.
    let outcomes = recorder.outcomes.lock().unwrap().clone();
    assert!(recorder.calls.load(Ordering::SeqCst) >= 4);
    assert!(outcomes.contains(&("mock", MatchOutcome::Matched)));
    assert!(outcomes.contains(&("mock", MatchOutcome::NoMatch)));
    assert!(outcomes.contains(&("injected", MatchOutcome::Failed)));
    assert!(outcomes.contains(&("remote", MatchOutcome::NoMatch)));
}
