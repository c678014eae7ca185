//! Final-answer evaluator.
//!
//! Two independently scored channels: the structured chart insight and the
//! free-text conversational reply. Either may be absent without the other
//! being wrong, so each channel gates to not-applicable on its own.

use crate::judge::{JudgeError, SemanticJudge};
use crate::score::Score;
use crate::state::AgentState;
use serde::{Deserialize, Serialize};

/// Result of the final-answer dimension.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnswerEvaluation {
    pub charts_answer_score: Score,
    pub agent_answer_score: Score,

    /// Chart insight that was judged; `None` when there was none to judge.
    pub actual_charts_answer: Option<String>,
    /// Conversational reply that was judged; `None` when there was none.
    pub actual_agent_answer: Option<String>,
}

/// Judge the agent's answer(s) against the expected answer.
///
/// Not applicable when no answer is expected. A judge failure propagates:
/// unlike clarification detection there is no safe binary default for a
/// match verdict, and the caller records the case as errored.
pub fn evaluate_final_answer(
    state: &AgentState,
    expected_answer: &str,
    judge: &dyn SemanticJudge,
) -> Result<AnswerEvaluation, JudgeError> {
    if expected_answer.is_empty() {
        return Ok(AnswerEvaluation::default());
    }

    // Chart channel: first artifact's insight, when it carries text.
    let (charts_answer_score, actual_charts_answer) = match state.first_chart_insight() {
        Some(insight) if !insight.is_empty() => {
            let verdict = judge.judge_match(expected_answer, insight)?;
            (Score::from_bool(verdict.matched), Some(insight.to_string()))
        }
        // An artifact without content is still "no insight to judge".
        _ => (Score::NotApplicable, None),
    };

    // Conversational channel: the last message's effective text.
    let (agent_answer_score, actual_agent_answer) = match state.final_message_text() {
        Some(text) if !text.is_empty() => {
            let verdict = judge.judge_match(expected_answer, &text)?;
            (Score::from_bool(verdict.matched), Some(text))
        }
        _ => (Score::NotApplicable, None),
    };

    Ok(AnswerEvaluation {
        charts_answer_score,
        agent_answer_score,
        actual_charts_answer,
        actual_agent_answer,
    })
}
