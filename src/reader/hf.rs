use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::consts::{DEFAULT_HUB_URL, DEFAULT_INFERENCE_URL, DEFAULT_TIMEOUT_SECS};
use crate::registry::ModelSpec;

use super::{Prediction, Reader};

const TASK: &str = "question-answering";

/// Connection settings for the hosted inference service.
#[derive(Debug, Clone)]
pub struct HfConfig {
    pub inference_url: String,
    pub hub_url: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

impl Default for HfConfig {
    fn default() -> Self {
        Self {
            inference_url: DEFAULT_INFERENCE_URL.to_string(),
            hub_url: DEFAULT_HUB_URL.to_string(),
            token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// A reader backed by the Hugging Face hub and inference API.
pub struct HfReader {
    client: reqwest::Client,
    config: HfConfig,
}

impl HfReader {
    pub fn new(config: HfConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("qa-compare/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client, config })
    }

    fn inference_endpoint(&self, model: &ModelSpec) -> String {
        format!(
            "{}/models/{}",
            self.config.inference_url.trim_end_matches('/'),
            model.repo_id
        )
    }

    fn hub_endpoint(&self, model: &ModelSpec) -> String {
        format!(
            "{}/api/models/{}",
            self.config.hub_url.trim_end_matches('/'),
            model.repo_id
        )
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.token {
            Some(token) => req.header("authorization", format!("Bearer {token}")),
            None => req,
        }
    }

    fn parse_prediction(body: &str) -> Result<Prediction> {
        let response: ApiResponse = serde_json::from_str(body)
            .map_err(|e| anyhow::anyhow!("failed to parse inference response: {e}\nraw: {body}"))?;
        match response {
            ApiResponse::Single(prediction) => Ok(prediction),
            ApiResponse::Ranked(predictions) => predictions
                .into_iter()
                .next()
                .ok_or_else(|| anyhow::anyhow!("inference API returned no answers")),
        }
    }

    /// Pull the service's `error` message out of a failure body, if there is one.
    fn error_message(body: &str) -> String {
        serde_json::from_str::<ApiError>(body)
            .map(|e| e.error)
            .unwrap_or_else(|_| body.trim().to_string())
    }
}

#[async_trait]
impl Reader for HfReader {
    async fn load(&self, model: &ModelSpec) -> Result<()> {
        let url = self.hub_endpoint(model);
        tracing::debug!(model = %model.label, %url, "checking model on hub");

        let resp = self.authorize(self.client.get(&url)).send().await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            bail!("hub error ({}): {}", status, Self::error_message(&text));
        }

        let info: ModelInfo = resp.json().await.context("failed to parse hub model info")?;
        if let Some(tag) = info.pipeline_tag
            && tag != TASK
        {
            bail!("{} is a {tag} model, not {TASK}", model.repo_id);
        }
        Ok(())
    }

    async fn answer(
        &self,
        model: &ModelSpec,
        question: &str,
        context: &str,
    ) -> Result<Prediction> {
        let body = ApiRequest {
            inputs: Inputs { question, context },
            options: Options {
                wait_for_model: true,
            },
        };

        let url = self.inference_endpoint(model);
        tracing::debug!(model = %model.label, %url, "running inference");

        let resp = self
            .authorize(self.client.post(&url))
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            bail!("inference API error ({}): {}", status, Self::error_message(&text));
        }

        let text = resp
            .text()
            .await
            .context("failed to read inference response")?;
        Self::parse_prediction(&text)
    }
}

// --- API types ---

#[derive(Serialize)]
struct ApiRequest<'a> {
    inputs: Inputs<'a>,
    options: Options,
}

#[derive(Serialize)]
struct Inputs<'a> {
    question: &'a str,
    context: &'a str,
}

#[derive(Serialize)]
struct Options {
    wait_for_model: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ApiResponse {
    Single(Prediction),
    Ranked(Vec<Prediction>),
}

#[derive(Deserialize)]
struct ApiError {
    error: String,
}

#[derive(Deserialize)]
struct ModelInfo {
    pipeline_tag: Option<String>,
}
