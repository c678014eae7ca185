//! Agent invocation.
//!
//! The agent under test lives behind [`AgentRunner`]: one invocation per
//! test case, one final [`AgentState`] back. The core only reads the
//! returned state and never inspects how it was produced.

use crate::expected::TestCase;
use crate::state::AgentState;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

/// Errors from invoking the agent under test.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RunnerError {
    /// Transport-level failure talking to the agent endpoint.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The agent reported a failed run.
    #[error("Agent invocation failed: {0}")]
    Agent(String),

    /// The agent did not reach a final state before the deadline.
    #[error("Agent did not complete within {0:?}")]
    Timeout(Duration),

    /// The endpoint returned something that is not an agent state.
    #[error("Failed to parse agent state: {0}")]
    Parse(String),
}

/// Drives one agent invocation per test case.
pub trait AgentRunner: Send + Sync {
    /// The name of this runner (used in reports).
    fn name(&self) -> &str;

    /// Invoke the agent with the case's query and return its final state.
    fn invoke(
        &self,
        case: &TestCase,
    ) -> impl std::future::Future<Output = Result<AgentState, RunnerError>> + Send;
}

/// Agent runner that submits the query to an HTTP endpoint and polls for the
/// final state.
///
/// Expected endpoint contract:
/// - `POST {base_url}/threads` with `{"query": ...}` returns
///   `{"thread_id": "..."}`
/// - `GET {base_url}/threads/{thread_id}` returns
///   `{"status": "running" | "complete" | "failed", "state": {...}, "error": "..."}`
///
/// Polling stops at `complete` (state returned), `failed` (error returned),
/// or the configured deadline.
pub struct HttpAgentRunner {
    client: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
    poll_interval: Duration,
    deadline: Duration,
}

impl HttpAgentRunner {
    /// Create a runner against the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_token: None,
            poll_interval: Duration::from_secs(2),
            deadline: Duration::from_secs(300),
        }
    }

    /// Attach a bearer token to every request.
    #[must_use]
    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Set the interval between state polls.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the overall per-invocation deadline.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn submit(&self, case: &TestCase) -> Result<String, RunnerError> {
        let url = format!("{}/threads", self.base_url);
        let response = self
            .authorize(self.client.post(&url))
            .json(&json!({ "query": case.query }))
            .send()
            .await?
            .error_for_status()?;

        let submitted: SubmitResponse = response
            .json()
            .await
            .map_err(|e| RunnerError::Parse(e.to_string()))?;
        Ok(submitted.thread_id)
    }

    async fn poll(&self, thread_id: &str) -> Result<ThreadStatus, RunnerError> {
        let url = format!("{}/threads/{}", self.base_url, thread_id);
        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await?
            .error_for_status()?;

        response
            .json()
            .await
            .map_err(|e| RunnerError::Parse(e.to_string()))
    }
}

impl AgentRunner for HttpAgentRunner {
    fn name(&self) -> &str {
        "http_agent"
    }

    async fn invoke(&self, case: &TestCase) -> Result<AgentState, RunnerError> {
        let thread_id = self.submit(case).await?;
        log::debug!("Submitted case {} as thread {}", case.id, thread_id);

        let started = Instant::now();
        loop {
            let status = self.poll(&thread_id).await?;
            match status.status.as_str() {
                "complete" => {
                    return status.state.ok_or_else(|| {
                        RunnerError::Parse("complete thread carried no state".to_string())
                    });
                }
                "failed" => {
                    return Err(RunnerError::Agent(
                        status.error.unwrap_or_else(|| "unspecified failure".to_string()),
                    ));
                }
                _ => {}
            }

            if started.elapsed() >= self.deadline {
                return Err(RunnerError::Timeout(self.deadline));
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

#[derive(Deserialize)]
struct SubmitResponse {
    thread_id: String,
}

#[derive(Deserialize)]
struct ThreadStatus {
    status: String,
    #[serde(default)]
    state: Option<AgentState>,
    #[serde(default)]
    error: Option<String>,
}
