//! Expected ground truth for one test case.
//!
//! Every expectation field defaults to emptiness (empty string, empty list,
//! `false`) rather than a missing-value marker: "no expectation" is
//! represented by the empty sentinel, and the evaluators and aggregator gate
//! applicability on exactly that emptiness.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Ground-truth expectations for one test case.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpectedRecord {
    /// Expected AOI identifiers, order-insensitive. Accepts a JSON array or
    /// a `";"`-separated string (the spreadsheet cell convention).
    #[serde(default, deserialize_with = "id_list")]
    pub expected_aoi_ids: Vec<String>,

    /// Expected subregion label (e.g. "state-province").
    #[serde(default)]
    pub expected_subregion: String,

    /// Expected AOI identifier source (e.g. "gadm").
    #[serde(default)]
    pub expected_aoi_source: String,

    /// Expected dataset identifier, compared as text.
    #[serde(default)]
    pub expected_dataset_id: String,

    #[serde(default)]
    pub expected_dataset_name: String,

    /// Expected context layer label.
    #[serde(default)]
    pub expected_context_layer: String,

    /// Expected date range, free-text in any format `normalize_date` accepts.
    #[serde(default)]
    pub expected_start_date: String,
    #[serde(default)]
    pub expected_end_date: String,

    /// Expected final answer text.
    #[serde(default)]
    pub expected_answer: String,

    /// Whether the agent is expected to ask for clarification instead of
    /// completing the task.
    #[serde(default)]
    pub expected_clarification: bool,

    /// Grouping metadata.
    #[serde(default = "default_test_group")]
    pub test_group: String,

    /// Review status of the test case.
    #[serde(default = "default_status")]
    pub status: String,

    /// Unknown columns from the source sheet, carried through verbatim.
    #[serde(default, flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

fn default_test_group() -> String {
    "unknown".to_string()
}

fn default_status() -> String {
    "ready".to_string()
}

/// One test case: the query to send plus its expectations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestCase {
    /// Unique identifier for the case.
    #[serde(default)]
    pub id: String,

    /// The user query sent to the agent.
    pub query: String,

    /// Ground truth for scoring.
    #[serde(flatten)]
    pub expected: ExpectedRecord,
}

/// Deserialize an AOI id list from either an array or a `";"`-separated
/// string, dropping empty items.
fn id_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        List(Vec<String>),
        Cell(String),
    }

    let raw = Option::<Raw>::deserialize(deserializer)?;
    Ok(match raw {
        None => Vec::new(),
        Some(Raw::List(items)) => items,
        Some(Raw::Cell(cell)) => cell
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
    })
}
