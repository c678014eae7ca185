//! Per-case results and run summaries.
//!
//! [`CaseResult`] carries the complete, stable field set for one test case
//! (all dimension records, the expected values, the overall score, and any
//! error), regardless of which dimensions were applicable. [`RunSummary`]
//! aggregates a batch, computing per-dimension statistics only over
//! applicable values.

use crate::aggregate::overall_score;
use crate::evaluators::CaseEvaluations;
use crate::expected::TestCase;
use crate::score::Score;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Overall score at or above which a case counts as passed in summaries.
pub const PASS_THRESHOLD: f64 = 0.7;

/// Result of evaluating a single test case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseResult {
    /// Case identifier.
    pub id: String,

    /// The query that was sent to the agent.
    pub query: String,

    /// Aggregated score in `[0, 1]`.
    pub overall_score: f64,

    /// Every dimension's result record.
    pub evaluations: CaseEvaluations,

    /// The expected values this case was scored against, echoed for export.
    #[serde(flatten)]
    pub expected: crate::expected::ExpectedRecord,

    /// Error message when the pipeline failed for this case.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CaseResult {
    /// Build a result from a completed evaluation pipeline.
    pub fn evaluated(case: &TestCase, evaluations: CaseEvaluations) -> Self {
        let score = overall_score(&evaluations, &case.expected);
        Self {
            id: case.id.clone(),
            query: case.query.clone(),
            overall_score: score,
            evaluations,
            expected: case.expected.clone(),
            error: None,
        }
    }

    /// Build a result for a case whose pipeline failed.
    ///
    /// Every dimension is recorded as not-applicable, the overall score is
    /// `0.0`, and the error field is set, so a failed case is reported once
    /// rather than silently dropped from the batch.
    pub fn failure(case: &TestCase, error: impl Into<String>) -> Self {
        Self {
            id: case.id.clone(),
            query: case.query.clone(),
            overall_score: 0.0,
            evaluations: CaseEvaluations::default(),
            expected: case.expected.clone(),
            error: Some(error.into()),
        }
    }

    /// Whether this case's pipeline completed.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// The clarification score the merged record carries (the data-pull
    /// evaluator's verdict).
    pub fn clarification_requested_score(&self) -> Score {
        self.evaluations.data_pull.clarification_requested_score
    }
}

/// Mean and applicability counts for one dimension across a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DimensionStats {
    /// Mean over applicable values; `None` when nothing was applicable.
    pub mean: Option<f64>,
    /// Number of cases where the dimension was applicable.
    pub applicable: usize,
    /// Number of cases where it was not.
    pub not_applicable: usize,
}

impl DimensionStats {
    fn from_scores(scores: impl Iterator<Item = Score>) -> Self {
        let mut sum = 0.0;
        let mut applicable = 0;
        let mut not_applicable = 0;

        for score in scores {
            match score.value() {
                Some(v) => {
                    sum += v;
                    applicable += 1;
                }
                None => not_applicable += 1,
            }
        }

        Self {
            mean: (applicable > 0).then(|| sum / applicable as f64),
            applicable,
            not_applicable,
        }
    }
}

/// Per-dimension statistics for a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DimensionSummary {
    pub aoi_id: DimensionStats,
    pub subregion: DimensionStats,
    pub dataset_id: DimensionStats,
    pub context_layer: DimensionStats,
    pub data_pull: DimensionStats,
    pub date: DimensionStats,
    pub charts_answer: DimensionStats,
    pub agent_answer: DimensionStats,
    pub clarification: DimensionStats,
}

/// Summary of an entire evaluation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Name of the test suite used.
    pub suite_name: String,

    /// Name of the agent runner evaluated.
    pub runner_name: String,

    /// Total number of cases evaluated.
    pub total_cases: usize,

    /// Cases whose pipeline completed.
    pub completed: usize,

    /// Cases that errored.
    pub failed: usize,

    /// Mean overall score across all cases (errored cases count as 0.0).
    pub average_score: f64,

    /// Cases at or above [`PASS_THRESHOLD`].
    pub passed: usize,

    /// Per-dimension statistics over applicable values only.
    pub dimensions: DimensionSummary,

    /// Individual results for each case.
    pub results: Vec<CaseResult>,

    /// Total duration of the run.
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
}

impl RunSummary {
    /// Create a summary from a batch of case results.
    pub fn from_results(
        suite_name: String,
        runner_name: String,
        results: Vec<CaseResult>,
        total_duration: Duration,
    ) -> Self {
        let total_cases = results.len();
        let completed = results.iter().filter(|r| r.is_success()).count();
        let failed = total_cases - completed;
        let passed = results
            .iter()
            .filter(|r| r.overall_score >= PASS_THRESHOLD)
            .count();

        let average_score = if total_cases > 0 {
            results.iter().map(|r| r.overall_score).sum::<f64>() / total_cases as f64
        } else {
            0.0
        };

        let dimensions = DimensionSummary {
            aoi_id: DimensionStats::from_scores(
                results.iter().map(|r| r.evaluations.aoi.aoi_id_match_score),
            ),
            subregion: DimensionStats::from_scores(
                results.iter().map(|r| r.evaluations.aoi.subregion_match_score),
            ),
            dataset_id: DimensionStats::from_scores(
                results
                    .iter()
                    .map(|r| r.evaluations.dataset.dataset_id_match_score),
            ),
            context_layer: DimensionStats::from_scores(
                results
                    .iter()
                    .map(|r| r.evaluations.dataset.context_layer_match_score),
            ),
            data_pull: DimensionStats::from_scores(
                results
                    .iter()
                    .map(|r| r.evaluations.data_pull.data_pull_exists_score),
            ),
            date: DimensionStats::from_scores(
                results.iter().map(|r| r.evaluations.date.date_match_score),
            ),
            charts_answer: DimensionStats::from_scores(
                results
                    .iter()
                    .map(|r| r.evaluations.answer.charts_answer_score),
            ),
            agent_answer: DimensionStats::from_scores(
                results
                    .iter()
                    .map(|r| r.evaluations.answer.agent_answer_score),
            ),
            clarification: DimensionStats::from_scores(
                results.iter().map(|r| r.clarification_requested_score()),
            ),
        };

        Self {
            suite_name,
            runner_name,
            total_cases,
            completed,
            failed,
            average_score,
            passed,
            dimensions,
            results,
            total_duration,
        }
    }

    /// Print a summary to stdout.
    pub fn print_summary(&self) {
        println!();
        println!("=== Evaluation Summary ===");
        println!("Suite: {}", self.suite_name);
        println!("Runner: {}", self.runner_name);
        println!();
        println!(
            "Cases: {} total, {} completed, {} failed",
            self.total_cases, self.completed, self.failed
        );
        println!("Average score: {:.2}", self.average_score);
        println!(
            "Passed (>= {:.1}): {}/{} ({:.1}%)",
            PASS_THRESHOLD,
            self.passed,
            self.total_cases,
            if self.total_cases > 0 {
                (self.passed as f64 / self.total_cases as f64) * 100.0
            } else {
                0.0
            }
        );
        println!();

        println!("Dimensions (mean over applicable cases):");
        for (name, stats) in [
            ("AOI id", &self.dimensions.aoi_id),
            ("Subregion", &self.dimensions.subregion),
            ("Dataset id", &self.dimensions.dataset_id),
            ("Context layer", &self.dimensions.context_layer),
            ("Data pull", &self.dimensions.data_pull),
            ("Date", &self.dimensions.date),
            ("Charts answer", &self.dimensions.charts_answer),
            ("Agent answer", &self.dimensions.agent_answer),
            ("Clarification", &self.dimensions.clarification),
        ] {
            match stats.mean {
                Some(mean) => println!(
                    "  {}: {:.2} ({} n/a)",
                    name, mean, stats.not_applicable
                ),
                None => println!("  {}: n/a ({} n/a)", name, stats.not_applicable),
            }
        }
        println!();
        println!("Duration: {:.1}s", self.total_duration.as_secs_f64());
    }

    /// Write the summary to a JSON file.
    pub fn write_json(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, json)
    }
}

/// Custom serde for Duration to serialize as seconds (f64).
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Ok(Duration::from_secs_f64(secs))
    }
}
