//! Integration tests for end-to-end case scoring.
//!
//! Each test builds a final agent state and an expected record, runs every
//! dimension evaluator, and checks both the per-dimension verdicts and the
//! aggregated overall score.

use geoeval::{evaluators, overall_score, AgentState, ExpectedRecord, MockJudge, Score};
use serde_json::json;

fn state(value: serde_json::Value) -> AgentState {
    serde_json::from_value(value).unwrap()
}

fn expected(value: serde_json::Value) -> ExpectedRecord {
    serde_json::from_value(value).unwrap()
}

#[test]
fn test_fully_aligned_case_scores_one() {
    let state = state(json!({
        "aoi_selection": {"aois": [{"src_id": "BRA", "name": "Brazil", "source": "gadm"}]},
        "dataset": {"dataset_id": "tree_cover_loss"},
        "start_date": "2023-01-01",
        "end_date": "2023-12-31",
        "raw_data": [{"loss_ha": 100}, {"loss_ha": 200}],
        "messages": [{"content": "Brazil lost 2.9 Mha of tree cover in 2023."}]
    }));
    let expected = expected(json!({
        "expected_aoi_ids": "BRA",
        "expected_dataset_id": "tree_cover_loss",
        "expected_start_date": "1/1/2023",
        "expected_end_date": "12/31/2023",
        "expected_answer": "2.9 Mha"
    }));

    let judge = MockJudge::new();
    let evals = evaluators::run_all(&state, &expected, "tree cover loss in Brazil in 2023", 1, &judge)
        .unwrap();

    assert_eq!(evals.aoi.aoi_id_match_score, Score::Pass);
    assert_eq!(evals.dataset.dataset_id_match_score, Score::Pass);
    // Differently formatted but equivalent dates still match.
    assert_eq!(evals.date.date_match_score, Score::Pass);
    assert_eq!(evals.data_pull.data_pull_exists_score, Score::Pass);
    assert_eq!(evals.data_pull.row_count, 2);
    // No chart artifact: the chart channel is not applicable, not wrong.
    assert_eq!(evals.answer.charts_answer_score, Score::NotApplicable);
    assert_eq!(evals.answer.agent_answer_score, Score::Pass);

    assert_eq!(overall_score(&evals, &expected), 1.0);
}

#[test]
fn test_chart_only_answer() {
    let state = state(json!({
        "charts_data": [{"insight": "Brazil had the highest tree cover loss"}],
        "raw_data": [{"row": 1}]
    }));
    let expected = expected(json!({"expected_answer": "Brazil"}));

    let judge = MockJudge::new();
    let evals = evaluators::run_all(&state, &expected, "which country lost most?", 1, &judge)
        .unwrap();

    assert_eq!(evals.answer.charts_answer_score, Score::Pass);
    assert_eq!(evals.answer.agent_answer_score, Score::NotApplicable);
    assert_eq!(
        evals.answer.actual_charts_answer.as_deref(),
        Some("Brazil had the highest tree cover loss")
    );

    assert_eq!(overall_score(&evals, &expected), 1.0);
}

#[test]
fn test_mixed_verdicts_average() {
    // AOI, dataset, and data pull pass; the chart insight misses the answer
    // while the conversational reply hits it: 4 of 5 applicable -> 0.8.
    let state = state(json!({
        "aoi_selection": {"aois": [{"src_id": "BRA", "source": "gadm"}]},
        "dataset": {"dataset_id": "tcl"},
        "raw_data": [{"row": 1}],
        "charts_data": [{"insight": "see the chart below"}],
        "messages": [{"content": "The loss was 2.9 Mha."}]
    }));
    let expected = expected(json!({
        "expected_aoi_ids": "BRA",
        "expected_dataset_id": "tcl",
        "expected_answer": "2.9 Mha"
    }));

    let judge = MockJudge::new();
    let evals = evaluators::run_all(&state, &expected, "q", 1, &judge).unwrap();

    assert_eq!(evals.answer.charts_answer_score, Score::Fail);
    assert_eq!(evals.answer.agent_answer_score, Score::Pass);
    assert_eq!(overall_score(&evals, &expected), 0.8);
}

#[test]
fn test_expected_clarification_supersedes_everything() {
    // The agent produced nothing but a question back, and that is exactly
    // what the case expected.
    let state = state(json!({
        "messages": [{"content": "Did you mean the country Georgia or the US state?"}]
    }));
    let expected = expected(json!({
        "expected_aoi_ids": "GEO",
        "expected_dataset_id": "tcl",
        "expected_clarification": true
    }));

    let judge = MockJudge::new().clarifying("ambiguous place name");
    let evals = evaluators::run_all(&state, &expected, "forest loss in georgia", 1, &judge)
        .unwrap();

    assert_eq!(evals.data_pull.clarification_requested_score, Score::Pass);
    assert_eq!(evals.aoi.aoi_id_match_score, Score::NotApplicable);
    assert_eq!(evals.dataset.dataset_id_match_score, Score::NotApplicable);
    assert_eq!(evals.data_pull.data_pull_exists_score, Score::NotApplicable);

    // Only the clarification verdict enters the aggregate.
    assert_eq!(overall_score(&evals, &expected), 1.0);
}

#[test]
fn test_unexpected_clarification_scores_zero() {
    let state = state(json!({
        "messages": [{"content": "Can you be more specific about the region?"}]
    }));
    let expected = expected(json!({
        "expected_aoi_ids": "BRA",
        "expected_dataset_id": "tcl"
    }));

    let judge = MockJudge::new().clarifying("asked back");
    let evals = evaluators::run_all(&state, &expected, "forest loss", 1, &judge).unwrap();

    // Every evaluator that saw the clarification records the mismatch.
    assert_eq!(evals.aoi.clarification_requested_score, Score::Fail);
    assert_eq!(evals.dataset.clarification_requested_score, Score::Fail);
    assert_eq!(evals.data_pull.clarification_requested_score, Score::Fail);

    // The clarification dimension is not expected, so it never enters the
    // aggregate; with everything else superseded, nothing is applicable.
    assert_eq!(overall_score(&evals, &expected), 0.0);
}

#[test]
fn test_expected_clarification_but_agent_completed() {
    // The agent went ahead and answered instead of asking.
    let state = state(json!({
        "aoi_selection": {"aois": [{"src_id": "GEO", "source": "gadm"}]},
        "dataset": {"dataset_id": "tcl"},
        "raw_data": [{"row": 1}]
    }));
    let expected = expected(json!({
        "expected_aoi_ids": "GEO",
        "expected_dataset_id": "tcl",
        "expected_clarification": true
    }));

    let judge = MockJudge::new();
    let evals = evaluators::run_all(&state, &expected, "q", 1, &judge).unwrap();

    // With data pulled, the clarification branch never fires and the
    // expected-clarification gate finds nothing applicable to reward.
    assert_eq!(
        evals.data_pull.clarification_requested_score,
        Score::NotApplicable
    );

    // The agent still gets credit for the selections it made.
    assert_eq!(overall_score(&evals, &expected), 1.0);
}

#[test]
fn test_missing_dataset_fails_but_missing_aoi_does_not() {
    // State with neither selection and data pulled, so no clarification
    // branch fires.
    let state = state(json!({"raw_data": [{"row": 1}]}));
    let expected = expected(json!({
        "expected_aoi_ids": "BRA",
        "expected_dataset_id": "tcl"
    }));

    let judge = MockJudge::new();
    let evals = evaluators::run_all(&state, &expected, "q", 1, &judge).unwrap();

    // A missing dataset selection is a failure with a recorded error...
    assert_eq!(evals.dataset.dataset_id_match_score, Score::Fail);
    assert_eq!(evals.dataset.error.as_deref(), Some("Missing dataset data"));

    // ...while a missing AOI selection is merely not applicable.
    assert_eq!(evals.aoi.aoi_id_match_score, Score::NotApplicable);

    // dataset 0, data pull 1 -> 0.5
    assert_eq!(overall_score(&evals, &expected), 0.5);
}

#[test]
fn test_empty_raw_data_counts_as_no_pull() {
    let state = state(json!({
        "dataset": {"dataset_id": "tcl"},
        "raw_data": []
    }));
    let expected = expected(json!({"expected_dataset_id": "tcl"}));

    let judge = MockJudge::new();
    let evals = evaluators::run_all(&state, &expected, "q", 1, &judge).unwrap();

    assert_eq!(evals.data_pull.data_pull_exists_score, Score::Fail);
    assert_eq!(evals.data_pull.error.as_deref(), Some("Error pulling data"));
    assert_eq!(overall_score(&evals, &expected), 0.5);
}

#[test]
fn test_round_to_two_decimals() {
    // aoi 1, dataset 0, data pull 1 -> 2/3 -> 0.67
    let state = state(json!({
        "aoi_selection": {"aois": [{"src_id": "BRA", "source": "gadm"}]},
        "dataset": {"dataset_id": "wrong"},
        "raw_data": [{"row": 1}]
    }));
    let expected = expected(json!({
        "expected_aoi_ids": "BRA",
        "expected_dataset_id": "tcl"
    }));

    let judge = MockJudge::new();
    let evals = evaluators::run_all(&state, &expected, "q", 1, &judge).unwrap();

    assert_eq!(overall_score(&evals, &expected), 0.67);
}

#[test]
fn test_serialized_scores_use_numeric_and_null() {
    let state = state(json!({
        "aoi_selection": {"aois": [{"src_id": "BRA", "source": "gadm"}]}
    }));
    let expected = expected(json!({"expected_aoi_ids": "BRA"}));

    let judge = MockJudge::new();
    let evals = evaluators::run_all(&state, &expected, "q", 1, &judge).unwrap();

    let value = serde_json::to_value(&evals).unwrap();
    assert_eq!(value["aoi"]["aoi_id_match_score"], json!(1.0));
    assert_eq!(value["aoi"]["subregion_match_score"], json!(null));
    assert_eq!(value["dataset"]["dataset_id_match_score"], json!(null));
}
