//! Data-pull evaluator.
//!
//! Date selection is evaluated separately; this dimension only checks that
//! data was actually retrieved.

use crate::expected::ExpectedRecord;
use crate::judge::{detect_clarification, SemanticJudge};
use crate::score::Score;
use crate::state::AgentState;
use serde::{Deserialize, Serialize};

/// Result of the data-pull dimension.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataPullEvaluation {
    pub data_pull_exists_score: Score,
    pub clarification_requested_score: Score,
    pub row_count: usize,
    pub data_pull_success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Check whether data was successfully pulled, or whether the agent asked
/// for clarification instead.
///
/// An absent or empty pulled-data collection counts as "no data". Success
/// requires at least `min_rows` rows.
pub fn evaluate_data_pull(
    state: &AgentState,
    expected: &ExpectedRecord,
    query: &str,
    min_rows: usize,
    judge: &dyn SemanticJudge,
) -> DataPullEvaluation {
    let rows = state.raw_data.as_deref().filter(|r| !r.is_empty());

    if rows.is_none() && !query.is_empty() {
        let clarification = detect_clarification(judge, state, query);
        if clarification.is_clarification {
            return DataPullEvaluation {
                clarification_requested_score: Score::from_bool(expected.expected_clarification),
                data_pull_exists_score: Score::NotApplicable,
                row_count: 0,
                data_pull_success: false,
                error: None,
            };
        }
    }

    let Some(rows) = rows else {
        return DataPullEvaluation {
            data_pull_exists_score: Score::Fail,
            clarification_requested_score: Score::NotApplicable,
            row_count: 0,
            data_pull_success: false,
            error: Some("Error pulling data".to_string()),
        };
    };

    let row_count = rows.len();
    let data_pull_success = row_count >= min_rows;

    DataPullEvaluation {
        data_pull_exists_score: Score::from_bool(data_pull_success),
        clarification_requested_score: Score::NotApplicable,
        row_count,
        data_pull_success,
        error: None,
    }
}
