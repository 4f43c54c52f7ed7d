use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use axum_extra::extract::QueryRejection;
use matcher::{MatchError, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::json;

pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Match(#[from] MatchError),

    #[error("Not found")]
    NotFound,
}

/// API error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ServerError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::Validation(_) | ServerError::Match(MatchError::Validation(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ServerError::Match(MatchError::Configuration { .. }) => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::NotFound => StatusCode::NOT_FOUND,
            ServerError::Match(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code string
    fn error_code(&self) -> &'static str {
        match self {
            ServerError::Validation(_) | ServerError::Match(MatchError::Validation(_)) => {
                "VALIDATION_ERROR"
            }
            ServerError::Match(MatchError::Configuration { .. }) => "CONFIG_ERROR",
            ServerError::Match(MatchError::TemplateNotFound { .. }) => "TEMPLATE_NOT_FOUND",
            ServerError::Match(MatchError::TemplateMalformed { .. }) => "TEMPLATE_MALFORMED",
            ServerError::Match(MatchError::Model(_)) => "MODEL_ERROR",
            ServerError::Match(MatchError::Io(_)) => "INTERNAL_ERROR",
            ServerError::NotFound => "NOT_FOUND",
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ServerError::Validation(err) | ServerError::Match(MatchError::Validation(err)) => {
                Some(json!({ "fields": err.fields }))
            }
            ServerError::Match(MatchError::Configuration { missing }) => {
                Some(json!({ "missing": missing }))
            }
            ServerError::Match(MatchError::TemplateNotFound { path })
            | ServerError::Match(MatchError::TemplateMalformed { path, .. }) => {
                Some(json!({ "path": path }))
            }
            _ => None,
        }
    }

    /// Plain-text rendering used by the query-string endpoint.
    ///
    /// Validation problems keep their 422; every other failure is a 500.
    pub fn into_plain_text_response(self) -> Response {
        let status = match self.status_code() {
            StatusCode::UNPROCESSABLE_ENTITY => StatusCode::UNPROCESSABLE_ENTITY,
            StatusCode::NOT_FOUND => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        log_failure(&self, status);
        (status, self.to_string()).into_response()
    }
}

fn log_failure(err: &ServerError, status: StatusCode) {
    if status.is_server_error() {
        tracing::error!(status = %status, error = %err, "request failed");
    } else {
        tracing::debug!(status = %status, error = %err, "request rejected");
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        log_failure(&self, status);

        let body = ErrorResponse {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.to_string(),
                details: self.details(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        ServerError::Validation(ValidationError::single("body", rejection.body_text()))
    }
}

impl From<QueryRejection> for ServerError {
    fn from(rejection: QueryRejection) -> Self {
        ServerError::Validation(ValidationError::single("query", rejection.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_422() {
        let err = ServerError::from(ValidationError::single("input_string", "too short"));
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        let details = err.details().unwrap();
        assert_eq!(details["fields"][0]["field"], "input_string");
    }

    #[test]
    fn configuration_maps_to_503_with_missing_names() {
        let err = ServerError::from(MatchError::Configuration {
            missing: vec!["AZURE_OPENAI_KEY".into()],
        });
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(err.to_string().contains("AZURE_OPENAI_KEY"));
        assert_eq!(err.details().unwrap()["missing"][0], "AZURE_OPENAI_KEY");
    }

    #[test]
    fn template_errors_map_to_500_with_path() {
        let err = ServerError::from(MatchError::TemplateNotFound {
            path: "prompts/missing.txt".into(),
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), "TEMPLATE_NOT_FOUND");
        assert!(err.to_string().contains("prompts/missing.txt"));

        let err = ServerError::from(MatchError::TemplateMalformed {
            path: "p.txt".into(),
            detail: "missing placeholder(s) {candidates}".into(),
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("{candidates}"));
    }

    #[test]
    fn model_error_maps_to_500() {
        let err = ServerError::from(MatchError::Model("connection refused".into()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), "MODEL_ERROR");
    }

    #[test]
    fn plain_text_collapses_configuration_to_500() {
        let err = ServerError::from(MatchError::Configuration {
            missing: vec!["AZURE_OPENAI_ENDPOINT".into()],
        });
        let response = err.into_plain_text_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn plain_text_keeps_validation_status() {
        let err = ServerError::from(ValidationError::single("candidates", "empty"));
        let response = err.into_plain_text_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
