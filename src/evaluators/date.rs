//! Date-range selection evaluator.
//!
//! Pure comparison with no clarification branch: dates are evaluated from
//! whatever the agent stored in state, regardless of whether the data pull
//! succeeded or a clarification was requested.

use crate::expected::ExpectedRecord;
use crate::normalize::normalize_date;
use crate::score::Score;
use crate::state::AgentState;
use serde::{Deserialize, Serialize};

/// Result of the date-selection dimension.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DateEvaluation {
    pub date_match_score: Score,
    pub date_success: Option<bool>,
    pub actual_start_date: Option<String>,
    pub actual_end_date: Option<String>,
}

/// Check whether the agent resolved the expected date range.
///
/// Not applicable unless both expected dates normalize to valid dates.
/// Against valid expectations, missing or unparsable actual dates are a
/// failure: an expectation existed and was not met.
pub fn evaluate_date_selection(state: &AgentState, expected: &ExpectedRecord) -> DateEvaluation {
    let actual_start = state.start_date.clone().unwrap_or_default();
    let actual_end = state.end_date.clone().unwrap_or_default();

    if expected.expected_start_date.is_empty() || expected.expected_end_date.is_empty() {
        return DateEvaluation {
            date_match_score: Score::NotApplicable,
            date_success: None,
            actual_start_date: non_empty(actual_start),
            actual_end_date: non_empty(actual_end),
        };
    }

    let expected_start = normalize_date(&expected.expected_start_date);
    let expected_end = normalize_date(&expected.expected_end_date);

    // Unparsable expectations cannot be checked fairly.
    if expected_start.is_empty() || expected_end.is_empty() {
        return DateEvaluation {
            date_match_score: Score::NotApplicable,
            date_success: None,
            actual_start_date: non_empty(actual_start),
            actual_end_date: non_empty(actual_end),
        };
    }

    if actual_start.is_empty() || actual_end.is_empty() {
        return DateEvaluation {
            date_match_score: Score::Fail,
            date_success: Some(false),
            actual_start_date: None,
            actual_end_date: None,
        };
    }

    let normalized_start = normalize_date(&actual_start);
    let normalized_end = normalize_date(&actual_end);

    if normalized_start.is_empty() || normalized_end.is_empty() {
        return DateEvaluation {
            date_match_score: Score::Fail,
            date_success: Some(false),
            actual_start_date: Some(actual_start),
            actual_end_date: Some(actual_end),
        };
    }

    let matched = expected_start == normalized_start && expected_end == normalized_end;

    DateEvaluation {
        date_match_score: Score::from_bool(matched),
        date_success: Some(matched),
        actual_start_date: Some(actual_start),
        actual_end_date: Some(actual_end),
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
