use std::time::Duration;

use serde_json::Value;

use crate::error::{Result, TubetoolError};

use super::extract;
use super::TaskStatus;

/// Polls a remote task to a terminal state under a bounded attempt budget.
///
/// Each attempt sleeps the interval first, then issues one status GET. A
/// poll that cannot be reached or parsed counts against the budget but does
/// not fail the operation; a provider-reported terminal state stops the
/// loop immediately in either direction.
pub struct TaskPoller {
    client: reqwest::Client,
    status_base_url: String,
    api_key: String,
}

impl TaskPoller {
    pub fn new(status_base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            status_base_url: status_base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Poll `task_id` up to `max_attempts` times, sleeping `interval`
    /// before every request, and return the completed task's artifact URL.
    pub async fn poll(
        &self,
        task_id: &str,
        max_attempts: u32,
        interval: Duration,
    ) -> Result<String> {
        for attempt in 1..=max_attempts {
            tokio::time::sleep(interval).await;
            match self.check(task_id).await {
                PollOutcome::Pending => {
                    tracing::debug!(%task_id, attempt, max_attempts, "task still pending");
                }
                PollOutcome::Unreachable { detail } => {
                    tracing::warn!(%task_id, attempt, %detail, "status endpoint unreachable, will retry");
                }
                PollOutcome::Completed { result } => match result {
                    Some(url) => return Ok(url),
                    None => {
                        return Err(TubetoolError::TaskCompletedWithoutResult {
                            task_id: task_id.to_string(),
                        });
                    }
                },
                PollOutcome::Failed { status, detail } => {
                    return Err(TubetoolError::TaskFailed { status, detail });
                }
            }
        }
        Err(TubetoolError::TaskTimeout {
            attempts: max_attempts,
        })
    }

    async fn check(&self, task_id: &str) -> PollOutcome {
        let url = format!("{}/{}", self.status_base_url, task_id);
        let resp = match self
            .client
            .get(&url)
            .header("x-api-key", &self.api_key)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(err) => {
                return PollOutcome::Unreachable {
                    detail: err.to_string(),
                };
            }
        };
        if !resp.status().is_success() {
            return PollOutcome::Unreachable {
                detail: format!("status {}", resp.status()),
            };
        }
        let body: Value = match resp.json().await {
            Ok(body) => body,
            Err(err) => {
                return PollOutcome::Unreachable {
                    detail: format!("malformed body: {err}"),
                };
            }
        };
        let status = extract::status(&body).unwrap_or_default().to_string();
        match TaskStatus::from_provider(&status) {
            TaskStatus::Completed => PollOutcome::Completed {
                result: extract::result_url(&body),
            },
            TaskStatus::Failed => PollOutcome::Failed {
                status,
                detail: extract::failure_detail(&body),
            },
            _ => PollOutcome::Pending,
        }
    }
}

/// Classification of one poll attempt.
enum PollOutcome {
    Pending,
    Unreachable { detail: String },
    Completed { result: Option<String> },
    Failed { status: String, detail: String },
}
