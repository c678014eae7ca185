//! Deterministic doubles for offline evaluation.
//!
//! [`MockJudge`] and [`ScriptedRunner`] stand in for the semantic judge and
//! the agent under test, enabling:
//!
//! - **Offline testing**: exercise the full pipeline without API calls
//! - **Deterministic testing**: fixed verdicts and canned states for
//!   reproducible scores
//! - **Failure injection**: judge and runner errors on demand

use crate::judge::{ClarificationVerdict, JudgeError, MatchVerdict, SemanticJudge};
use crate::runner::{AgentRunner, RunnerError};
use crate::state::AgentState;
use crate::TestCase;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone)]
enum MatchMode {
    Always,
    Never,
    /// Match when the normalized actual text contains the normalized
    /// expected text.
    Contains,
    Fail,
}

#[derive(Debug, Clone)]
enum ClarificationMode {
    Never,
    Always(String),
    Fail,
}

/// Scripted semantic judge.
///
/// Defaults to substring matching (lowercased, whitespace-collapsed) and
/// "never a clarification". Both behaviors are reconfigurable, and calls are
/// counted so tests can assert the judge was or was not consulted.
#[derive(Debug)]
pub struct MockJudge {
    match_mode: MatchMode,
    clarification_mode: ClarificationMode,
    match_calls: AtomicUsize,
    clarification_calls: AtomicUsize,
}

impl MockJudge {
    /// Substring-matching judge that never detects clarification.
    pub fn new() -> Self {
        Self {
            match_mode: MatchMode::Contains,
            clarification_mode: ClarificationMode::Never,
            match_calls: AtomicUsize::new(0),
            clarification_calls: AtomicUsize::new(0),
        }
    }

    /// Every match call returns a positive verdict.
    #[must_use]
    pub fn always_matching(mut self) -> Self {
        self.match_mode = MatchMode::Always;
        self
    }

    /// Every match call returns a negative verdict.
    #[must_use]
    pub fn never_matching(mut self) -> Self {
        self.match_mode = MatchMode::Never;
        self
    }

    /// Every clarification call reports a clarification with the given
    /// explanation.
    #[must_use]
    pub fn clarifying(mut self, explanation: impl Into<String>) -> Self {
        self.clarification_mode = ClarificationMode::Always(explanation.into());
        self
    }

    /// Every judge call fails.
    #[must_use]
    pub fn failing(mut self) -> Self {
        self.match_mode = MatchMode::Fail;
        self.clarification_mode = ClarificationMode::Fail;
        self
    }

    /// Only match calls fail; clarification calls keep their behavior.
    #[must_use]
    pub fn failing_matches(mut self) -> Self {
        self.match_mode = MatchMode::Fail;
        self
    }

    /// Number of match verdicts requested so far.
    pub fn match_calls(&self) -> usize {
        self.match_calls.load(Ordering::SeqCst)
    }

    /// Number of clarification verdicts requested so far.
    pub fn clarification_calls(&self) -> usize {
        self.clarification_calls.load(Ordering::SeqCst)
    }
}

impl Default for MockJudge {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

impl SemanticJudge for MockJudge {
    fn judge_match(&self, expected: &str, actual: &str) -> Result<MatchVerdict, JudgeError> {
        self.match_calls.fetch_add(1, Ordering::SeqCst);
        match self.match_mode {
            MatchMode::Always => Ok(MatchVerdict::new(true)),
            MatchMode::Never => Ok(MatchVerdict::new(false)),
            MatchMode::Contains => {
                Ok(MatchVerdict::new(normalize(actual).contains(&normalize(expected))))
            }
            MatchMode::Fail => Err(JudgeError::Call("mock judge configured to fail".to_string())),
        }
    }

    fn judge_clarification(
        &self,
        _response: &str,
        _query: &str,
    ) -> Result<ClarificationVerdict, JudgeError> {
        self.clarification_calls.fetch_add(1, Ordering::SeqCst);
        match &self.clarification_mode {
            ClarificationMode::Never => Ok(ClarificationVerdict::no()),
            ClarificationMode::Always(explanation) => {
                Ok(ClarificationVerdict::yes(explanation.clone()))
            }
            ClarificationMode::Fail => {
                Err(JudgeError::Call("mock judge configured to fail".to_string()))
            }
        }
    }
}

/// Agent runner that replays canned states keyed by query.
///
/// Queries without a canned state fail the invocation, which doubles as
/// failure injection for batch-isolation tests.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    states: HashMap<String, AgentState>,
    invocations: AtomicUsize,
}

impl ScriptedRunner {
    /// Empty runner; every invocation fails until states are added.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the state returned for a query.
    #[must_use]
    pub fn with_state(mut self, query: impl Into<String>, state: AgentState) -> Self {
        self.states.insert(query.into(), state);
        self
    }

    /// Number of invocations so far.
    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }
}

impl AgentRunner for ScriptedRunner {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn invoke(&self, case: &TestCase) -> Result<AgentState, RunnerError> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        self.states
            .get(&case.query)
            .cloned()
            .ok_or_else(|| RunnerError::Agent(format!("no scripted state for query: {}", case.query)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_mode_normalizes() {
        let judge = MockJudge::new();
        assert!(judge.judge_match("Brazil", "  BRAZIL had the most ").unwrap().matched);
        assert!(!judge.judge_match("Brazil", "Australia").unwrap().matched);
        assert_eq!(judge.match_calls(), 2);
    }

    #[test]
    fn test_failing_modes() {
        let judge = MockJudge::new().failing();
        assert!(judge.judge_match("a", "b").is_err());
        assert!(judge.judge_clarification("r", "q").is_err());

        let judge = MockJudge::new().failing_matches();
        assert!(judge.judge_match("a", "b").is_err());
        assert!(!judge.judge_clarification("r", "q").unwrap().is_clarification);
    }

    #[tokio::test]
    async fn test_scripted_runner_replays_and_fails() {
        let runner = ScriptedRunner::new().with_state("known", AgentState::default());

        let known = TestCase {
            query: "known".to_string(),
            ..Default::default()
        };
        let unknown = TestCase {
            query: "unknown".to_string(),
            ..Default::default()
        };

        assert!(runner.invoke(&known).await.is_ok());
        assert!(runner.invoke(&unknown).await.is_err());
        assert_eq!(runner.invocations(), 2);
    }
}
