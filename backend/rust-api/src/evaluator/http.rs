use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};

use super::FeedbackEvaluator;
use crate::models::{SpeakingAssessment, WritingAssessment, WritingTask};

#[derive(Debug, Serialize)]
struct WritingEvaluationRequest<'a> {
    content: &'a str,
    task_type: WritingTask,
}

#[derive(Debug, Serialize)]
struct SpeakingEvaluationRequest {
    part_number: u8,
}

/// Forwards evaluation to an external scoring service.
///
/// `POST {base}/evaluate/writing` and `POST {base}/evaluate/speaking`, both
/// answering with the assessment JSON. Failures are not retried.
pub struct HttpEvaluator {
    http_client: Client,
    base_url: String,
}

impl HttpEvaluator {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build evaluator HTTP client")?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("Calling evaluator: {}", url);

        let response = self
            .http_client
            .post(&url)
            .json(body)
            .send()
            .await
            .context("Failed to call evaluator")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow!("Evaluator returned error {}: {}", status, error_text));
        }

        response
            .json()
            .await
            .context("Failed to parse evaluator response")
    }
}

#[async_trait]
impl FeedbackEvaluator for HttpEvaluator {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn evaluate_writing(
        &self,
        content: &str,
        task_type: WritingTask,
    ) -> Result<WritingAssessment> {
        self.post(
            "/evaluate/writing",
            &WritingEvaluationRequest { content, task_type },
        )
        .await
    }

    async fn evaluate_speaking(&self, part_number: u8) -> Result<SpeakingAssessment> {
        self.post("/evaluate/speaking", &SpeakingEvaluationRequest { part_number })
            .await
    }
}
