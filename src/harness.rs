//! Evaluation harness for batch execution.
//!
//! The [`EvalHarness`] orchestrates running an agent against a test suite,
//! managing concurrency and aggregating results. Each case is isolated: a
//! runner or judge failure is recorded as a failed [`CaseResult`] and the
//! rest of the batch proceeds.

use crate::evaluators;
use crate::judge::SemanticJudge;
use crate::results::{CaseResult, RunSummary};
use crate::runner::AgentRunner;
use crate::suite::{Suite, SuiteError};
use futures_util::stream::{self, StreamExt};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

/// Errors that can occur during an evaluation run.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EvalError {
    /// Failed to load the test suite
    #[error("Suite error: {0}")]
    Suite(#[from] SuiteError),
}

/// Progress events emitted during evaluation.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum EvalProgress {
    /// Suite loaded, evaluation starting.
    Started {
        /// Total number of cases to evaluate.
        total: usize,
    },
    /// A case completed (evaluated or failed).
    CaseCompleted {
        /// Number of cases completed so far.
        completed: usize,
        /// Total number of cases.
        total: usize,
        /// The case's overall score.
        score: f64,
    },
}

/// Configuration for the evaluation harness.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct EvalConfig {
    /// Maximum number of concurrent case evaluations (default: 5)
    pub concurrency: usize,

    /// Minimum number of rows a data pull must return to count as
    /// successful (default: 1).
    pub min_rows: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            concurrency: 5,
            min_rows: 1,
        }
    }
}

impl EvalConfig {
    /// Create a new configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the concurrency limit.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1); // At least 1
        self
    }

    /// Set the minimum row count for a successful data pull.
    #[must_use]
    pub fn with_min_rows(mut self, min_rows: usize) -> Self {
        self.min_rows = min_rows;
        self
    }
}

/// Evaluation harness for scoring conversational geospatial agents.
///
/// Runs each case end to end (invoke the agent, evaluate every dimension,
/// aggregate) with bounded concurrency, and collects a [`RunSummary`].
///
/// # Example
///
/// ```no_run
/// use geoeval::{EvalConfig, EvalHarness, HttpAgentRunner, JsonSuite, MockJudge};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let runner = HttpAgentRunner::new("https://agent.example.com".to_string());
/// let suite = JsonSuite::new("cases/golden.json".into());
/// let judge: Arc<dyn geoeval::SemanticJudge> = Arc::new(MockJudge::new());
///
/// let harness = EvalHarness::new(EvalConfig::default());
/// let summary = harness.evaluate(&runner, &suite, Some(10), judge).await?;
///
/// summary.print_summary();
/// # Ok(())
/// # }
/// ```
pub struct EvalHarness {
    config: EvalConfig,
}

impl EvalHarness {
    /// Create a new evaluation harness.
    pub fn new(config: EvalConfig) -> Self {
        Self { config }
    }

    /// Run an evaluation against a test suite.
    ///
    /// # Arguments
    ///
    /// * `runner` - The agent runner to evaluate
    /// * `suite` - The test suite to score against
    /// * `sample_size` - Optional limit on cases to evaluate
    /// * `judge` - Semantic judge for answer and clarification verdicts
    ///
    /// # Returns
    ///
    /// A [`RunSummary`] with aggregated statistics and per-case details.
    pub async fn evaluate<R, S>(
        &self,
        runner: &R,
        suite: &S,
        sample_size: Option<usize>,
        judge: Arc<dyn SemanticJudge>,
    ) -> Result<RunSummary, EvalError>
    where
        R: AgentRunner,
        S: Suite,
    {
        self.evaluate_with_progress(runner, suite, sample_size, judge, |_| {})
            .await
    }

    /// Run an evaluation with progress callbacks.
    ///
    /// Same as [`evaluate`](Self::evaluate), but calls the provided callback
    /// with progress events as the run proceeds.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use geoeval::{EvalConfig, EvalHarness, EvalProgress, HttpAgentRunner, JsonSuite, MockJudge};
    /// use std::sync::Arc;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let runner = HttpAgentRunner::new("https://agent.example.com".to_string());
    /// let suite = JsonSuite::new("cases/golden.json".into());
    /// let judge: Arc<dyn geoeval::SemanticJudge> = Arc::new(MockJudge::new());
    /// let harness = EvalHarness::new(EvalConfig::default());
    ///
    /// let summary = harness
    ///     .evaluate_with_progress(&runner, &suite, None, judge, |progress| {
    ///         match progress {
    ///             EvalProgress::Started { total } => println!("Starting {} cases", total),
    ///             EvalProgress::CaseCompleted { completed, total, score } => {
    ///                 println!("[{}/{}] {:.2}", completed, total, score);
    ///             }
    ///             _ => {} // Handle future variants
    ///         }
    ///     })
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn evaluate_with_progress<R, S, F>(
        &self,
        runner: &R,
        suite: &S,
        sample_size: Option<usize>,
        judge: Arc<dyn SemanticJudge>,
        on_progress: F,
    ) -> Result<RunSummary, EvalError>
    where
        R: AgentRunner,
        S: Suite,
        F: Fn(EvalProgress) + Send + Sync,
    {
        let start_time = Instant::now();

        let cases = suite.load(sample_size).await?;
        let total_cases = cases.len();

        if cases.is_empty() {
            return Ok(RunSummary::from_results(
                suite.name().to_string(),
                runner.name().to_string(),
                vec![],
                start_time.elapsed(),
            ));
        }

        on_progress(EvalProgress::Started { total: total_cases });

        log::info!(
            "Evaluating {} cases with concurrency {}",
            total_cases,
            self.config.concurrency
        );

        let completed = Arc::new(AtomicUsize::new(0));
        let on_progress = Arc::new(on_progress);

        let results: Vec<CaseResult> = stream::iter(cases)
            .map(|case| {
                let judge = judge.clone();
                let min_rows = self.config.min_rows;
                let completed = completed.clone();
                let on_progress = on_progress.clone();

                async move {
                    let result = evaluate_case(runner, &case, min_rows, judge.as_ref()).await;
                    let count = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    on_progress(EvalProgress::CaseCompleted {
                        completed: count,
                        total: total_cases,
                        score: result.overall_score,
                    });
                    result
                }
            })
            .buffer_unordered(self.config.concurrency)
            .collect()
            .await;

        Ok(RunSummary::from_results(
            suite.name().to_string(),
            runner.name().to_string(),
            results,
            start_time.elapsed(),
        ))
    }
}

impl Default for EvalHarness {
    fn default() -> Self {
        Self::new(EvalConfig::default())
    }
}

/// Evaluate a single case end to end.
async fn evaluate_case<R: AgentRunner>(
    runner: &R,
    case: &crate::expected::TestCase,
    min_rows: usize,
    judge: &dyn SemanticJudge,
) -> CaseResult {
    let state = match runner.invoke(case).await {
        Ok(state) => state,
        Err(e) => {
            log::warn!("Case {} failed: {}", case.id, e);
            return CaseResult::failure(case, e.to_string());
        }
    };

    match evaluators::run_all(&state, &case.expected, &case.query, min_rows, judge) {
        Ok(evaluations) => CaseResult::evaluated(case, evaluations),
        Err(e) => {
            log::warn!("Case {} judge failed: {}", case.id, e);
            CaseResult::failure(case, e.to_string())
        }
    }
}
