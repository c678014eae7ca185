//! Dimension evaluators.
//!
//! Five independent evaluators, each a pure function of (agent state,
//! expected record) apart from the semantic-judge calls. They share only the
//! read-only state and may run in any order; [`run_all`] runs them in the
//! canonical order and bundles the results.

pub mod answer;
pub mod aoi;
pub mod data_pull;
pub mod dataset;
pub mod date;

pub use answer::{evaluate_final_answer, AnswerEvaluation};
pub use aoi::{evaluate_aoi_selection, AoiEvaluation};
pub use data_pull::{evaluate_data_pull, DataPullEvaluation};
pub use dataset::{evaluate_dataset_selection, DatasetEvaluation};
pub use date::{evaluate_date_selection, DateEvaluation};

use crate::expected::ExpectedRecord;
use crate::judge::{JudgeError, SemanticJudge};
use crate::state::AgentState;
use serde::{Deserialize, Serialize};

/// All dimension results for one test case.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaseEvaluations {
    pub aoi: AoiEvaluation,
    pub dataset: DatasetEvaluation,
    pub date: DateEvaluation,
    pub data_pull: DataPullEvaluation,
    pub answer: AnswerEvaluation,
}

/// Run every evaluator against one agent state.
///
/// Answer judging is the only fallible step: a failed match verdict has no
/// safe default and propagates, marking the whole case as errored. All
/// clarification judging inside the other evaluators fails safe.
pub fn run_all(
    state: &AgentState,
    expected: &ExpectedRecord,
    query: &str,
    min_rows: usize,
    judge: &dyn SemanticJudge,
) -> Result<CaseEvaluations, JudgeError> {
    Ok(CaseEvaluations {
        aoi: evaluate_aoi_selection(state, expected, query, judge),
        dataset: evaluate_dataset_selection(state, expected, query, judge),
        date: evaluate_date_selection(state, expected),
        data_pull: evaluate_data_pull(state, expected, query, min_rows, judge),
        answer: evaluate_final_answer(state, &expected.expected_answer, judge)?,
    })
}
