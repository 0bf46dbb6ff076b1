//! Image generation against the asynchronous task service.
//!
//! A static API key is all the service needs; no OAuth is involved here.

use std::time::Duration;

use serde_json::{Map, Value};

use crate::error::Result;
use crate::task::{TaskPoller, TaskSubmitter};

const DEFAULT_MAX_ATTEMPTS: u32 = 30;
const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);

/// Submit-then-poll client for the generation task endpoints.
///
/// # Example
/// ```no_run
/// use tubetool::generation::GenerationClient;
///
/// # async fn example() -> tubetool::error::Result<()> {
/// let client = GenerationClient::new("https://api.example.com/v1/task", "api-key");
/// let url = client
///     .generate_image("a thumbnail of a mountain at dawn", None)
///     .await?;
/// println!("{url}");
/// # Ok(())
/// # }
/// ```
pub struct GenerationClient {
    submitter: TaskSubmitter,
    poller: TaskPoller,
    max_attempts: u32,
    interval: Duration,
}

impl GenerationClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url = base_url.into();
        let api_key = api_key.into();
        Self {
            submitter: TaskSubmitter::new(base_url.clone(), api_key.clone()),
            poller: TaskPoller::new(base_url, api_key),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            interval: DEFAULT_INTERVAL,
        }
    }

    /// Override the polling budget (attempts x interval bounds the wait).
    pub fn with_polling(mut self, max_attempts: u32, interval: Duration) -> Self {
        self.max_attempts = max_attempts;
        self.interval = interval;
        self
    }

    /// Generate an image and return its artifact URL.
    ///
    /// `params` merges provider-specific generation parameters (aspect
    /// ratio, model selection) into the request body next to the prompt.
    pub async fn generate_image(&self, prompt: &str, params: Option<Value>) -> Result<String> {
        let mut body = Map::new();
        body.insert("prompt".to_string(), Value::String(prompt.to_string()));
        if let Some(Value::Object(extra)) = params {
            body.extend(extra);
        }
        let request = Value::Object(body);
        let task_id = self.submitter.submit(&request).await?;
        tracing::info!(%task_id, "image generation task submitted, polling");
        self.poller
            .poll(&task_id, self.max_attempts, self.interval)
            .await
    }
}
