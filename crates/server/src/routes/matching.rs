use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use axum_extra::extract::{Query, QueryRejection};
use matcher::{MatchRequest, MatchResult};
use serde::Deserialize;
use std::sync::Arc;

/// Query-string form of a match request.
///
/// `candidates` is repeated once per entry:
/// `?input_string=HMRC&candidates=Home%20Office&candidates=HMRC`.
/// Absent fields deserialize empty so that validation, not the extractor,
/// reports them.
#[derive(Debug, Default, Deserialize)]
pub struct MatchQuery {
    #[serde(default)]
    pub input_string: String,

    #[serde(default)]
    pub candidates: Vec<String>,

    #[serde(default)]
    pub prompt_path: Option<String>,
}

impl From<MatchQuery> for MatchRequest {
    fn from(query: MatchQuery) -> Self {
        let request = MatchRequest::new(query.input_string, query.candidates);
        match query.prompt_path {
            Some(path) => request.with_prompt_override(path),
            None => request,
        }
    }
}

/// Match an input string against candidates given in the query string.
///
/// Failures are returned as plain text.
pub async fn match_get(
    State(state): State<Arc<ServerState>>,
    query: Result<Query<MatchQuery>, QueryRejection>,
) -> Response {
    let outcome = match query {
        Ok(Query(query)) => run_match(&state, query.into()).await,
        Err(rejection) => Err(ServerError::from(rejection)),
    };

    match outcome {
        Ok(result) => Json(result).into_response(),
        Err(err) => err.into_plain_text_response(),
    }
}

/// Match an input string against candidates given as a JSON body.
///
/// # Request
///
/// ```json
/// {
///   "input_string": "Home Ofice",
///   "candidates": ["Home Office", "HMRC", "Cabinet Office"],
///   "prompt_path": "prompts/buyer_match.txt"
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "input_string": "Home Ofice",
///   "match": "Home Office",
///   "raw": "Home Office"
/// }
/// ```
pub async fn match_post(
    State(state): State<Arc<ServerState>>,
    body: Result<Json<MatchRequest>, JsonRejection>,
) -> ServerResult<Json<MatchResult>> {
    let Json(request) = body?;
    let result = run_match(&state, request).await?;
    Ok(Json(result))
}

async fn run_match(state: &ServerState, request: MatchRequest) -> ServerResult<MatchResult> {
    request.validate()?;

    tracing::debug!(
        input_string = %request.input_string,
        candidates = request.candidates.len(),
        "matching"
    );

    Ok(state.service.match_request(&request).await?)
}
