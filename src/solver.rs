use crate::error::{Result, ScraperError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Turns a base64 captcha image into its text.
///
/// Implementations may be slow or fail. The pipeline calls `solve` exactly once
/// per scrape and reports any error as-is.
#[async_trait]
pub trait CaptchaSolver: Send + Sync {
    async fn solve(&self, encoded_image: &str) -> Result<String>;
}

#[derive(Serialize)]
struct SolveRequest<'a> {
    image: &'a str,
}

#[derive(Deserialize)]
struct SolveResponse {
    text: String,
}

/// Solver backed by an HTTP service that answers `{"text": ...}`.
pub struct RemoteCaptchaSolver {
    client: reqwest::Client,
    endpoint: String,
}

impl RemoteCaptchaSolver {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl CaptchaSolver for RemoteCaptchaSolver {
    async fn solve(&self, encoded_image: &str) -> Result<String> {
        debug!(endpoint = %self.endpoint, "sending captcha to solver");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&SolveRequest {
                image: encoded_image,
            })
            .send()
            .await
            .map_err(|e| ScraperError::SolverError(format!("Captcha solver unreachable: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::SolverError(format!(
                "Captcha solver returned {}",
                status
            )));
        }

        let answer: SolveResponse = response
            .json()
            .await
            .map_err(|e| ScraperError::SolverError(format!("Captcha solver reply unreadable: {}", e)))?;

        let text = answer.text.trim();
        if text.is_empty() {
            return Err(ScraperError::SolverError(
                "Captcha solver returned no text".to_string(),
            ));
        }
        Ok(text.to_string())
    }
}
