//! # Namematch Matcher (`matcher`)
//!
//! ## Purpose
//!
//! `matcher` maps a noisy free-text name (a supplier's spelling of a buyer,
//! an abbreviation, a typo) onto one entry of a caller-supplied candidate
//! list, or reports that none fits. The decision is delegated to a chat
//! model: a hosted Azure OpenAI deployment in production, or a local
//! string-similarity stand-in for development and tests.
//!
//! A match runs in five steps:
//! 1. pick the model ([`ModelFactory`]),
//! 2. drop candidates identical to the input ([`filter_self_matches`]),
//! 3. build the instruction prompt ([`build_prompt`]),
//! 4. send `[system(prompt), user(input)]` to the model ([`ChatModel::invoke`]),
//! 5. clean the reply into a match or `None` ([`normalize`]).
//!
//! ## Core Types
//!
//! - [`Settings`]: process-wide configuration (mock flag, threshold, prompt
//!   path, Azure credentials).
//! - [`MatchRequest`] / [`MatchResult`]: request and response shapes.
//! - [`ChatModel`]: the single-operation model capability, implemented by
//!   [`MockChatModel`] and [`AzureChatModel`].
//! - [`MatchService`]: orchestrates the steps above.
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use matcher::{MatchService, Settings};
//!
//! # async fn run() -> Result<(), matcher::MatchError> {
//! let service = MatchService::new(Arc::new(Settings::default()));
//! let candidates = vec!["Home Office".to_string(), "HMRC".to_string()];
//!
//! let result = service.match_string("Home Ofice", &candidates, None).await?;
//! assert_eq!(result.matched.as_deref(), Some("Home Office"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Observability
//!
//! Every match logs through `tracing`. Install a [`MatchMetrics`]
//! implementation via [`set_match_metrics`] to also record latency and
//! outcome per call.

pub mod config;
pub mod engine;
pub mod metrics;
pub mod model;
pub mod normalize;
pub mod prompt;
pub mod similarity;
pub mod types;

pub use crate::config::Settings;
pub use crate::engine::{filter_self_matches, MatchService};
pub use crate::metrics::{set_match_metrics, MatchMetrics, MatchOutcome};
pub use crate::model::{AzureChatModel, ChatModel, Message, MockChatModel, ModelFactory, Role};
pub use crate::normalize::normalize;
pub use crate::prompt::{build_prompt, load_prompt_text};
pub use crate::similarity::similarity_ratio;
pub use crate::types::{FieldError, MatchError, MatchRequest, MatchResult, ValidationError};
