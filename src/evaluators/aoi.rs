//! Area-of-interest selection evaluator.

use crate::expected::ExpectedRecord;
use crate::judge::{detect_clarification, SemanticJudge};
use crate::normalize::{normalize_gadm_id, normalize_value};
use crate::score::Score;
use crate::state::AgentState;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Result of the AOI-selection dimension.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AoiEvaluation {
    pub aoi_id_match_score: Score,
    pub subregion_match_score: Score,
    pub clarification_requested_score: Score,

    pub actual_id: Option<String>,
    pub actual_name: Option<String>,
    pub actual_subtype: Option<String>,
    pub actual_source: Option<String>,
    pub actual_subregion: Option<String>,

    pub match_aoi_id: bool,
    pub match_subregion: Option<bool>,
}

/// Check whether the correct AOIs were selected, or whether the agent
/// appropriately asked for clarification instead.
///
/// Not applicable when no AOI ids are expected. Matching is order-insensitive
/// set equality over normalized ids; when the first actual AOI's source is
/// `"gadm"`, both sides go through the hierarchical GADM normalizer,
/// otherwise both are lowercased.
pub fn evaluate_aoi_selection(
    state: &AgentState,
    expected: &ExpectedRecord,
    query: &str,
    judge: &dyn SemanticJudge,
) -> AoiEvaluation {
    if expected.expected_aoi_ids.is_empty() {
        return AoiEvaluation::default();
    }

    let aois = state.aois();
    let subregion = state.effective_subregion();

    // No selection at all may mean the agent bounced the query back.
    if aois.is_empty() && !query.is_empty() {
        let clarification = detect_clarification(judge, state, query);
        if clarification.is_clarification {
            return AoiEvaluation {
                clarification_requested_score: Score::from_bool(expected.expected_clarification),
                aoi_id_match_score: Score::NotApplicable,
                subregion_match_score: Score::NotApplicable,
                actual_id: Some(format!(
                    "CLARIFICATION_REQUEST: {}",
                    clarification.explanation
                )),
                actual_name: Some("Agent requested clarification".to_string()),
                actual_subtype: Some("clarification".to_string()),
                actual_source: Some("agent".to_string()),
                actual_subregion: Some("N/A".to_string()),
                match_aoi_id: false,
                match_subregion: None,
            };
        }
    }

    if aois.is_empty() {
        return AoiEvaluation::default();
    }

    let actual_ids: Vec<&str> = aois.iter().map(|a| a.src_id.as_str()).collect();

    let (normalized_actual, normalized_expected): (BTreeSet<String>, BTreeSet<String>) =
        if aois[0].source == "gadm" {
            (
                actual_ids.iter().map(|id| normalize_gadm_id(id)).collect(),
                expected
                    .expected_aoi_ids
                    .iter()
                    .map(|id| normalize_gadm_id(id))
                    .collect(),
            )
        } else {
            (
                actual_ids.iter().map(|id| id.to_lowercase()).collect(),
                expected
                    .expected_aoi_ids
                    .iter()
                    .map(|id| id.to_lowercase())
                    .collect(),
            )
        };

    let match_aoi_id = normalized_actual == normalized_expected;

    let expected_subregion = normalize_value(&expected.expected_subregion);
    let actual_subregion = normalize_value(subregion);

    let (match_subregion, subregion_match_score) = if expected_subregion.is_empty() {
        (None, Score::NotApplicable)
    } else {
        let matched = expected_subregion == actual_subregion;
        (Some(matched), Score::from_bool(matched))
    };

    AoiEvaluation {
        aoi_id_match_score: Score::from_bool(match_aoi_id),
        subregion_match_score,
        clarification_requested_score: Score::NotApplicable,
        actual_id: Some(actual_ids.join(", ")),
        actual_name: Some(join_field(aois.iter().map(|a| a.name.as_str()))),
        actual_subtype: Some(join_field(aois.iter().map(|a| a.subtype.as_str()))),
        actual_source: Some(join_field(aois.iter().map(|a| a.source.as_str()))),
        actual_subregion: Some(actual_subregion),
        match_aoi_id,
        match_subregion,
    }
}

fn join_field<'a>(values: impl Iterator<Item = &'a str>) -> String {
    values.collect::<Vec<_>>().join(", ")
}
