use async_trait::async_trait;

use super::{ChatModel, Message};
use crate::similarity::similarity_ratio;
use crate::types::MatchError;

/// Reply used when no candidate is close enough.
const NO_MATCH: &str = "None";

/// Local stand-in for a language model.
///
/// Answers with the candidate most similar to the last message of the
/// conversation, or `None` when the best similarity ratio is under the
/// threshold. Deterministic: the reply depends only on the candidates, the
/// threshold and the query.
#[derive(Debug, Clone)]
pub struct MockChatModel {
    candidates: Vec<String>,
    similarity_threshold: f64,
}

impl MockChatModel {
    pub fn new(candidates: Vec<String>, similarity_threshold: f64) -> Self {
        Self {
            candidates,
            similarity_threshold,
        }
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Best candidate for `query`, compared case-insensitively.
    ///
    /// Ties keep the earliest candidate.
    pub fn best_match(&self, query: &str) -> Option<(&str, f64)> {
        let query = query.to_lowercase();

        let mut best: Option<(&str, f64)> = None;
        for candidate in &self.candidates {
            let score = similarity_ratio(&query, &candidate.to_lowercase());
            if score > best.map_or(0.0, |(_, s)| s) {
                best = Some((candidate.as_str(), score));
            }
        }
        best
    }

    /// Reply text for `query`: a candidate verbatim, or `None`.
    pub fn answer(&self, query: &str) -> String {
        match self.best_match(query) {
            Some((candidate, score)) if score >= self.similarity_threshold => {
                candidate.to_string()
            }
            _ => NO_MATCH.to_string(),
        }
    }
}

#[async_trait]
impl ChatModel for MockChatModel {
    async fn invoke(&self, messages: &[Message]) -> Result<String, MatchError> {
        let query = messages
            .last()
            .map(|m| m.content.trim())
            .unwrap_or_default();
        Ok(self.answer(query))
    }
}
