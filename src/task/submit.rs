use serde_json::Value;

use crate::error::{Result, TubetoolError};

use super::extract;

/// Issues the request that starts an asynchronous remote job.
pub struct TaskSubmitter {
    client: reqwest::Client,
    create_url: String,
    api_key: String,
}

impl TaskSubmitter {
    pub fn new(create_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            create_url: create_url.into(),
            api_key: api_key.into(),
        }
    }

    /// One POST; returns the new task's identifier.
    ///
    /// The id is probed across the provider's known envelope shapes; a
    /// success response with no resolvable id is [`TubetoolError::MissingTaskId`].
    pub async fn submit(&self, request: &Value) -> Result<String> {
        let resp = self
            .client
            .post(&self.create_url)
            .header("x-api-key", &self.api_key)
            .json(request)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TubetoolError::api(status.as_u16(), body));
        }
        let body: Value = resp.json().await?;
        let task_id = extract::task_id(&body).ok_or(TubetoolError::MissingTaskId)?;
        tracing::debug!(%task_id, "generation task submitted");
        Ok(task_id)
    }
}
