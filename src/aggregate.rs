//! Overall-score aggregation.
//!
//! The expected record is the authoritative applicability gate: a dimension
//! enters the candidate list only when its expectation was actually
//! supplied, and not-applicable results are then discarded before averaging
//! (a dimension gated "on" can still come back not-applicable, e.g. when a
//! clarification superseded the check).

use crate::evaluators::CaseEvaluations;
use crate::expected::ExpectedRecord;
use crate::score::Score;

/// Combine the dimension results into one overall score in `[0, 1]`.
///
/// Candidates are appended in a fixed order: clarification, AOI id,
/// subregion, dataset id, context layer, data-pull existence (gated on the
/// dataset expectation, since a pull is only relevant when a dataset was
/// expected), date match, then both answer channels. The applicable ones
/// are averaged and rounded to 2 decimals; no applicable candidates yields
/// `0.0`.
pub fn overall_score(evaluations: &CaseEvaluations, expected: &ExpectedRecord) -> f64 {
    let mut candidates: Vec<Score> = Vec::new();

    if expected.expected_clarification {
        // The data-pull evaluator fires on the same no-output condition as
        // the other clarification gates and is the one whose verdict the
        // merged result carries.
        candidates.push(evaluations.data_pull.clarification_requested_score);
    }

    if !expected.expected_aoi_ids.is_empty() {
        candidates.push(evaluations.aoi.aoi_id_match_score);
    }
    if !expected.expected_subregion.is_empty() {
        candidates.push(evaluations.aoi.subregion_match_score);
    }

    if !expected.expected_dataset_id.is_empty() {
        candidates.push(evaluations.dataset.dataset_id_match_score);
    }
    if !expected.expected_context_layer.is_empty() {
        candidates.push(evaluations.dataset.context_layer_match_score);
    }

    if !expected.expected_dataset_id.is_empty() {
        candidates.push(evaluations.data_pull.data_pull_exists_score);
    }
    if !expected.expected_start_date.is_empty() && !expected.expected_end_date.is_empty() {
        candidates.push(evaluations.date.date_match_score);
    }

    if !expected.expected_answer.is_empty() {
        candidates.push(evaluations.answer.charts_answer_score);
        candidates.push(evaluations.answer.agent_answer_score);
    }

    let values: Vec<f64> = candidates.iter().filter_map(Score::value).collect();
    if values.is_empty() {
        return 0.0;
    }

    round2(values.iter().sum::<f64>() / values.len() as f64)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
