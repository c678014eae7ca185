//! Final agent state, as returned by one agent invocation.
//!
//! The state is an opaque JSON document produced by the agent backend; this
//! module gives it just enough shape for the evaluators to read from. The
//! evaluators never mutate a state.
//!
//! Message content arrives in two shapes depending on the upstream model
//! (a plain string, or a list of parts). [`MessageContent`] models that as a
//! tagged union and [`MessageContent::effective_text`] resolves it once, so
//! no caller ever branches on the shape again.

use serde::{Deserialize, Serialize};

/// One selected area of interest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Aoi {
    /// Source-specific identifier (e.g. a GADM code).
    #[serde(default)]
    pub src_id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Region subtype (e.g. "country", "state-province").
    #[serde(default)]
    pub subtype: String,
    /// Identifier source (e.g. "gadm", "kba", "wdpa").
    #[serde(default)]
    pub source: String,
}

/// The agent's area-of-interest selection (multi-AOI schema).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AoiSelection {
    #[serde(default)]
    pub aois: Vec<Aoi>,
}

/// The agent's dataset selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatasetSelection {
    /// Dataset identifier; numeric in some backend revisions, so it is
    /// ingested as text.
    #[serde(default, deserialize_with = "stringly")]
    pub dataset_id: String,
    #[serde(default)]
    pub dataset_name: String,
    #[serde(default)]
    pub context_layer: String,
}

/// One chart artifact produced by the agent, carrying its insight text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChartArtifact {
    #[serde(default)]
    pub insight: String,
}

/// One conversational message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub content: MessageContent,
}

/// Message content: a single string, or a sequence of parts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    /// Direct string content.
    PlainText(String),
    /// A sequence of content parts; the last part is the effective text.
    PartedText(Vec<ContentPart>),
}

/// One part of a parted message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentPart {
    /// A bare string part.
    Text(String),
    /// A structured part carrying a `text` field.
    Block { text: String },
    /// Anything else; stringified when it ends up as the effective text.
    Other(serde_json::Value),
}

impl MessageContent {
    /// Resolve the content to a single effective text.
    ///
    /// For parted content the last part wins (earlier parts hold thinking
    /// or the echoed query). Returns `None` when there is nothing textual.
    pub fn effective_text(&self) -> Option<String> {
        match self {
            MessageContent::PlainText(text) => {
                if text.is_empty() {
                    None
                } else {
                    Some(text.clone())
                }
            }
            MessageContent::PartedText(parts) => match parts.last()? {
                ContentPart::Text(text) => Some(text.clone()),
                ContentPart::Block { text } => Some(text.clone()),
                ContentPart::Other(value) => Some(value.to_string()),
            }
            .filter(|t| !t.is_empty()),
        }
    }
}

/// Final state of one agent invocation.
///
/// Every field is optional or defaults to empty: agent runs fail in partial
/// ways and the evaluators are responsible for deciding what absence means.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentState {
    /// Selected areas of interest, when any were selected.
    #[serde(default)]
    pub aoi_selection: Option<AoiSelection>,

    /// Subregion label chosen during AOI selection.
    #[serde(default)]
    pub subregion: Option<String>,

    /// Subtype of the main AOI; fallback when `subregion` was not set.
    #[serde(default)]
    pub subtype: Option<String>,

    /// Selected dataset, when one was selected.
    #[serde(default)]
    pub dataset: Option<DatasetSelection>,

    /// Resolved analysis date range.
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,

    /// Pulled data rows; `None` when the pull never ran or failed.
    #[serde(default)]
    pub raw_data: Option<Vec<serde_json::Value>>,

    /// Chart artifacts, each carrying an insight text.
    #[serde(default)]
    pub charts_data: Vec<ChartArtifact>,

    /// Conversational messages; the last one holds the agent's final reply.
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl AgentState {
    /// Selected AOIs, empty when none were selected.
    pub fn aois(&self) -> &[Aoi] {
        self.aoi_selection
            .as_ref()
            .map(|s| s.aois.as_slice())
            .unwrap_or_default()
    }

    /// Subregion label, falling back to the main AOI subtype.
    pub fn effective_subregion(&self) -> &str {
        self.subregion
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.subtype.as_deref())
            .unwrap_or("")
    }

    /// Insight text of the first chart artifact, if any artifact exists.
    pub fn first_chart_insight(&self) -> Option<&str> {
        self.charts_data.first().map(|c| c.insight.as_str())
    }

    /// Effective text of the last conversational message.
    pub fn final_message_text(&self) -> Option<String> {
        self.messages.last().and_then(|m| m.content.effective_text())
    }

    /// The agent's final response text: the first chart insight when one is
    /// non-empty, otherwise the last message's effective text.
    pub fn final_response(&self) -> Option<String> {
        if let Some(insight) = self.first_chart_insight() {
            if !insight.is_empty() {
                return Some(insight.to_string());
            }
        }
        self.final_message_text()
    }
}

fn stringly<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(D::Error::custom(format!(
            "expected string or number for dataset_id, got {other}"
        ))),
    }
}
