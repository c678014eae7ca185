//! # Geoeval
//!
//! Offline evaluation harness for conversational geospatial-analysis agents.
//!
//! ## Overview
//!
//! `geoeval` scores an agent's *final state* (AOI selection, dataset
//! selection, date range, pulled data, final answer) against expert-authored
//! ground truth, dimension by dimension:
//!
//! - **Suites**: Load test cases (query + expected values) from JSON files
//! - **Runners**: Drive the agent under test over HTTP, or script states for tests
//! - **Evaluators**: Five independent dimension evaluators with three-valued
//!   scores (pass, fail, not applicable)
//! - **Aggregation**: Per-case overall score over applicable dimensions only
//! - **Results**: Structured JSON output with per-dimension run statistics
//!
//! ## Scoring model
//!
//! Every dimension yields a [`Score`]: `Pass` (1.0), `Fail` (0.0), or
//! `NotApplicable` (null). A dimension is applicable only when the test case
//! declares an expectation for it, so a case that never mentions dates is
//! neither rewarded nor punished for the agent's date handling. The overall
//! score is the mean of the applicable dimensions, rounded to two decimals.
//!
//! When a case expects the agent to ask for clarification instead of
//! completing the task, the clarification verdict alone decides the score
//! and every other dimension is skipped.
//!
//! ## Quick Start
//!
//! ```no_run
//! use geoeval::{EvalConfig, EvalHarness, HttpAgentRunner, JsonSuite, MockJudge};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Agent under test, reachable over HTTP
//! let runner = HttpAgentRunner::new("https://agent.example.com")
//!     .with_api_token("secret");
//!
//! // Expert-authored test cases
//! let suite = JsonSuite::new("cases/golden.json".into());
//!
//! // Semantic judge for answer and clarification verdicts. MockJudge is for
//! // tests; production runs plug in an LLM-backed SemanticJudge.
//! let judge: Arc<dyn geoeval::SemanticJudge> = Arc::new(MockJudge::new());
//!
//! // Run evaluation
//! let harness = EvalHarness::new(EvalConfig::default());
//! let summary = harness.evaluate(&runner, &suite, Some(100), judge).await?;
//!
//! // Output results
//! summary.print_summary();
//! summary.write_json(std::path::Path::new("results.json"))?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Scoring a state directly
//!
//! The evaluators are plain functions over an [`AgentState`] and an
//! [`ExpectedRecord`], usable without the harness:
//!
//! ```
//! use geoeval::{evaluators, AgentState, ExpectedRecord, MockJudge};
//!
//! let state: AgentState = serde_json::from_str(
//!     r#"{"aoi_selection": {"aois": [{"src_id": "BRA", "source": "gadm"}]}}"#,
//! ).unwrap();
//! let expected = ExpectedRecord {
//!     expected_aoi_ids: vec!["BRA".to_string()],
//!     ..Default::default()
//! };
//!
//! let evals = evaluators::run_all(&state, &expected, "forest loss in Brazil", 1, &MockJudge::new())
//!     .unwrap();
//! assert!(evals.aoi.aoi_id_match_score.is_pass());
//! ```

pub mod aggregate;
pub mod evaluators;
pub mod expected;
pub mod harness;
pub mod judge;
pub mod mock;
pub mod normalize;
pub mod results;
pub mod runner;
pub mod score;
pub mod state;
pub mod suite;

// Re-export public API
pub use aggregate::overall_score;
pub use evaluators::{
    AnswerEvaluation, AoiEvaluation, CaseEvaluations, DataPullEvaluation, DatasetEvaluation,
    DateEvaluation,
};
pub use expected::{ExpectedRecord, TestCase};
pub use harness::{EvalConfig, EvalError, EvalHarness, EvalProgress};
pub use judge::{
    AnswerKind, ClarificationVerdict, JudgeError, MatchVerdict, SemanticJudge,
};
pub use mock::{MockJudge, ScriptedRunner};
pub use results::{CaseResult, DimensionStats, DimensionSummary, RunSummary, PASS_THRESHOLD};
pub use runner::{AgentRunner, HttpAgentRunner, RunnerError};
pub use score::Score;
pub use state::{AgentState, Aoi};
pub use suite::{JsonSuite, Suite, SuiteError};
