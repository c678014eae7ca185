//! Dataset selection evaluator.

use crate::expected::ExpectedRecord;
use crate::judge::{detect_clarification, SemanticJudge};
use crate::normalize::normalize_value;
use crate::score::Score;
use crate::state::AgentState;
use serde::{Deserialize, Serialize};

/// Result of the dataset-selection dimension.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatasetEvaluation {
    pub dataset_id_match_score: Score,
    pub context_layer_match_score: Score,
    pub clarification_requested_score: Score,

    pub actual_dataset_id: Option<String>,
    pub actual_dataset_name: Option<String>,
    pub actual_context_layer: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Check whether the correct dataset was selected, or whether the agent
/// asked for clarification instead.
///
/// Not applicable when no dataset id is expected. Unlike the AOI dimension,
/// a missing selection against a real expectation is a failure, not
/// not-applicable: dataset selection has no legitimate "nothing to select"
/// outcome once a dataset was expected.
pub fn evaluate_dataset_selection(
    state: &AgentState,
    expected: &ExpectedRecord,
    query: &str,
    judge: &dyn SemanticJudge,
) -> DatasetEvaluation {
    if expected.expected_dataset_id.is_empty() {
        return DatasetEvaluation::default();
    }

    let Some(dataset) = state.dataset.as_ref() else {
        if !query.is_empty() {
            let clarification = detect_clarification(judge, state, query);
            if clarification.is_clarification {
                return DatasetEvaluation {
                    clarification_requested_score: Score::from_bool(
                        expected.expected_clarification,
                    ),
                    dataset_id_match_score: Score::NotApplicable,
                    context_layer_match_score: Score::NotApplicable,
                    actual_dataset_id: Some(format!(
                        "CLARIFICATION_REQUEST: {}",
                        clarification.explanation
                    )),
                    actual_dataset_name: Some("Agent requested clarification".to_string()),
                    actual_context_layer: Some("N/A".to_string()),
                    error: None,
                };
            }
        }

        return DatasetEvaluation {
            dataset_id_match_score: Score::Fail,
            context_layer_match_score: Score::NotApplicable,
            clarification_requested_score: Score::NotApplicable,
            actual_dataset_id: None,
            actual_dataset_name: None,
            actual_context_layer: None,
            error: Some("Missing dataset data".to_string()),
        };
    };

    let expected_id = normalize_value(&expected.expected_dataset_id);
    let actual_id = normalize_value(&dataset.dataset_id);
    let dataset_match = expected_id == actual_id;

    let expected_context = normalize_value(&expected.expected_context_layer);
    let actual_context = normalize_value(&dataset.context_layer);

    let context_layer_match_score = if expected_context.is_empty() {
        Score::NotApplicable
    } else {
        Score::from_bool(expected_context == actual_context)
    };

    DatasetEvaluation {
        dataset_id_match_score: Score::from_bool(dataset_match),
        context_layer_match_score,
        clarification_requested_score: Score::NotApplicable,
        actual_dataset_id: Some(dataset.dataset_id.clone()),
        actual_dataset_name: Some(dataset.dataset_name.clone()),
        actual_context_layer: Some(dataset.context_layer.clone()),
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockJudge;
    use serde_json::json;

    fn expected_with_dataset(id: &str) -> ExpectedRecord {
        ExpectedRecord {
            expected_dataset_id: id.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_no_expectation_is_not_applicable() {
        let judge = MockJudge::new();
        let state: AgentState = serde_json::from_value(json!({
            "dataset": {"dataset_id": "tree_cover_loss"}
        }))
        .unwrap();

        let eval = evaluate_dataset_selection(&state, &ExpectedRecord::default(), "q", &judge);
        assert_eq!(eval.dataset_id_match_score, Score::NotApplicable);
        assert_eq!(eval.context_layer_match_score, Score::NotApplicable);
    }

    #[test]
    fn test_id_compared_as_normalized_text() {
        let judge = MockJudge::new();
        let state: AgentState = serde_json::from_value(json!({
            "dataset": {"dataset_id": 42, "dataset_name": "Tree cover loss"}
        }))
        .unwrap();

        let eval =
            evaluate_dataset_selection(&state, &expected_with_dataset("42"), "q", &judge);
        assert_eq!(eval.dataset_id_match_score, Score::Pass);
        assert_eq!(eval.actual_dataset_id.as_deref(), Some("42"));
        assert_eq!(eval.actual_dataset_name.as_deref(), Some("Tree cover loss"));
    }

    #[test]
    fn test_wrong_id_fails() {
        let judge = MockJudge::new();
        let state: AgentState = serde_json::from_value(json!({
            "dataset": {"dataset_id": "tree_cover_gain"}
        }))
        .unwrap();

        let eval = evaluate_dataset_selection(
            &state,
            &expected_with_dataset("tree_cover_loss"),
            "q",
            &judge,
        );
        assert_eq!(eval.dataset_id_match_score, Score::Fail);
    }

    #[test]
    fn test_missing_selection_is_failure_not_na() {
        let judge = MockJudge::new();
        let state: AgentState = serde_json::from_value(json!({
            "messages": [{"content": "done"}]
        }))
        .unwrap();

        let eval = evaluate_dataset_selection(
            &state,
            &expected_with_dataset("tree_cover_loss"),
            "q",
            &judge,
        );
        assert_eq!(eval.dataset_id_match_score, Score::Fail);
        assert_eq!(eval.context_layer_match_score, Score::NotApplicable);
        assert_eq!(eval.error.as_deref(), Some("Missing dataset data"));
    }

    #[test]
    fn test_clarification_supersedes_selection_checks() {
        let judge = MockJudge::new().clarifying("which dataset?");
        let state: AgentState = serde_json::from_value(json!({
            "messages": [{"content": "Do you want loss or gain?"}]
        }))
        .unwrap();
        let mut expected = expected_with_dataset("tree_cover_loss");
        expected.expected_clarification = false;

        let eval = evaluate_dataset_selection(&state, &expected, "tree cover", &judge);
        assert_eq!(eval.clarification_requested_score, Score::Fail);
        assert_eq!(eval.dataset_id_match_score, Score::NotApplicable);
        assert_eq!(
            eval.actual_dataset_id.as_deref(),
            Some("CLARIFICATION_REQUEST: which dataset?")
        );
    }

    #[test]
    fn test_context_layer_gate_and_comparison() {
        let judge = MockJudge::new();
        let state: AgentState = serde_json::from_value(json!({
            "dataset": {
                "dataset_id": "tcl",
                "context_layer": "primary-forest"
            }
        }))
        .unwrap();

        let mut expected = expected_with_dataset("tcl");
        let eval = evaluate_dataset_selection(&state, &expected, "q", &judge);
        assert_eq!(eval.context_layer_match_score, Score::NotApplicable);

        expected.expected_context_layer = "primary-forest".to_string();
        let eval = evaluate_dataset_selection(&state, &expected, "q", &judge);
        assert_eq!(eval.context_layer_match_score, Score::Pass);

        expected.expected_context_layer = "plantations".to_string();
        let eval = evaluate_dataset_selection(&state, &expected, "q", &judge);
        assert_eq!(eval.context_layer_match_score, Score::Fail);
    }
}
