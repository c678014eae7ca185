//! The semantic judge seam.
//!
//! The judge is an external service (typically an LLM behind a prompt) that
//! this crate treats as an opaque oracle: given two text snippets it returns
//! a binary match verdict, and given an agent response plus the original
//! query it decides whether the response is a clarification request.
//!
//! Error handling is deliberately asymmetric. A failed clarification call
//! degrades to "not a clarification" via [`detect_clarification`] — a
//! mis-classified clarification skews one score, but must not abort the test
//! case. A failed match call has no safe binary default, so it propagates
//! and the case is recorded as errored.

use crate::state::AgentState;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from a semantic judge implementation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum JudgeError {
    /// The judge service call failed (network, timeout, quota).
    #[error("Judge call failed: {0}")]
    Call(String),

    /// The judge responded, but not with a usable verdict.
    #[error("Malformed judge verdict: {0}")]
    Malformed(String),
}

/// Answer type detected by the judge while comparing texts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerKind {
    /// True/false or yes/no.
    Boolean,
    /// A number with optional units, compared with tolerance.
    Numeric,
    /// A 4-digit year, compared exactly.
    Year,
    /// A country, region, place, or category, compared semantically.
    NamedEntity,
}

/// Binary match verdict, optionally tagged with the detected answer type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchVerdict {
    /// Whether the actual text captures the expected answer.
    pub matched: bool,

    /// Answer type the judge detected, when it reported one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_kind: Option<AnswerKind>,
}

impl MatchVerdict {
    /// A plain verdict without a detected answer type.
    pub fn new(matched: bool) -> Self {
        Self {
            matched,
            answer_kind: None,
        }
    }
}

/// Verdict on whether an agent response is a clarification request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClarificationVerdict {
    pub is_clarification: bool,

    /// The judge's explanation, recorded into diagnostics.
    #[serde(default)]
    pub explanation: String,
}

impl ClarificationVerdict {
    /// The fail-safe verdict: not a clarification.
    pub fn no() -> Self {
        Self {
            is_clarification: false,
            explanation: String::new(),
        }
    }

    /// A positive verdict with an explanation.
    pub fn yes(explanation: impl Into<String>) -> Self {
        Self {
            is_clarification: true,
            explanation: explanation.into(),
        }
    }
}

/// External judge of semantic equivalence and clarification behavior.
///
/// The comparison semantics (boolean affirmation, numeric tolerance, year
/// exactness, named-entity similarity) live entirely inside the
/// implementation; callers only consume the binary verdict.
///
/// Calls may block on an external service. Implementations that run inside
/// an async runtime should follow the pattern the runtime prescribes for
/// blocking work (e.g. `tokio::task::block_in_place`).
pub trait SemanticJudge: Send + Sync {
    /// Judge whether `actual` captures the essence of `expected`.
    fn judge_match(&self, expected: &str, actual: &str) -> Result<MatchVerdict, JudgeError>;

    /// Judge whether `response` asks for clarification instead of answering
    /// `query`.
    fn judge_clarification(
        &self,
        response: &str,
        query: &str,
    ) -> Result<ClarificationVerdict, JudgeError>;
}

/// Clarification detection with the fail-safe default.
///
/// Extracts the agent's final response from `state` (resolving the
/// polymorphic message shape once) and asks the judge whether it is a
/// clarification request. A missing response or a judge failure both yield
/// "not a clarification"; this helper is the only place that conversion
/// happens, so the asymmetry with match judging stays explicit.
pub fn detect_clarification(
    judge: &dyn SemanticJudge,
    state: &AgentState,
    query: &str,
) -> ClarificationVerdict {
    let Some(response) = state.final_response() else {
        return ClarificationVerdict::no();
    };

    match judge.judge_clarification(&response, query) {
        Ok(verdict) => verdict,
        Err(e) => {
            log::warn!("Clarification judge failed, treating as no clarification: {e}");
            ClarificationVerdict::no()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockJudge;
    use serde_json::json;

    fn state_with_reply(text: &str) -> AgentState {
        serde_json::from_value(json!({
            "messages": [{"content": text}]
        }))
        .unwrap()
    }

    #[test]
    fn test_detect_clarification_positive() {
        let judge = MockJudge::new().clarifying("asked which Georgia");
        let state = state_with_reply("Did you mean the country or the US state?");

        let verdict = detect_clarification(&judge, &state, "deforestation in georgia");
        assert!(verdict.is_clarification);
        assert_eq!(verdict.explanation, "asked which Georgia");
    }

    #[test]
    fn test_detect_clarification_no_response_skips_judge() {
        let judge = MockJudge::new().clarifying("should not be consulted");
        let state = AgentState::default();

        let verdict = detect_clarification(&judge, &state, "some query");
        assert!(!verdict.is_clarification);
        assert_eq!(judge.clarification_calls(), 0);
    }

    #[test]
    fn test_detect_clarification_fails_safe_on_judge_error() {
        let judge = MockJudge::new().failing();
        let state = state_with_reply("Could you narrow that down?");

        let verdict = detect_clarification(&judge, &state, "some query");
        assert!(!verdict.is_clarification);
    }

    #[test]
    fn test_answer_kind_serde_names() {
        assert_eq!(
            serde_json::to_string(&AnswerKind::NamedEntity).unwrap(),
            "\"named_entity\""
        );
    }
}
