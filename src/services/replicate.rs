use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.replicate.com";

#[derive(Debug, Serialize)]
struct PredictionRequest<'a> {
    version: &'a str,
    input: Value,
}

#[derive(Debug, Deserialize)]
struct Prediction {
    id: String,
    status: PredictionStatus,
    #[serde(default)]
    output: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
    #[serde(default)]
    urls: Option<PredictionUrls>,
}

#[derive(Debug, Deserialize)]
struct PredictionUrls {
    get: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum PredictionStatus {
    Starting,
    Processing,
    Succeeded,
    Failed,
    Canceled,
}

impl PredictionStatus {
    fn is_terminal(&self) -> bool {
        matches!(
            self,
            PredictionStatus::Succeeded | PredictionStatus::Failed | PredictionStatus::Canceled
        )
    }
}

/// Replicate predictions API client
pub struct ReplicateClient {
    api_token: String,
    base_url: String,
    poll_interval: Duration,
    client: reqwest::Client,
}

impl ReplicateClient {
    pub fn new(api_token: String, base_url: String) -> Self {
        Self {
            api_token,
            base_url: base_url.trim_end_matches('/').to_string(),
            poll_interval: Duration::from_secs(1),
            client: reqwest::Client::new(),
        }
    }

    #[cfg(test)]
    fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Run `model` (`owner/name:version`) on `input` and return its raw output.
    pub async fn run(&self, model: &str, input: Value) -> Result<Value> {
        let version = version_id(model);

        log::info!("🤖 Creating Replicate prediction for {}", model.split(':').next().unwrap_or(model));

        let response = self
            .client
            .post(format!("{}/v1/predictions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_token))
            .header("Prefer", "wait")
            .json(&PredictionRequest { version, input })
            .send()
            .await?;

        let mut prediction = self.parse_prediction(response).await?;
        log::debug!("📥 Prediction {} is {:?}", prediction.id, prediction.status);

        while !prediction.status.is_terminal() {
            let get_url = prediction
                .urls
                .as_ref()
                .map(|urls| urls.get.clone())
                .with_context(|| format!("Prediction {} has no polling URL", prediction.id))?;

            tokio::time::sleep(self.poll_interval).await;

            let response = self
                .client
                .get(&get_url)
                .header("Authorization", format!("Bearer {}", self.api_token))
                .send()
                .await?;

            prediction = self.parse_prediction(response).await?;
            log::debug!("🔄 Prediction {} is {:?}", prediction.id, prediction.status);
        }

        match prediction.status {
            PredictionStatus::Succeeded => {
                log::info!("✅ Prediction {} succeeded", prediction.id);
                prediction
                    .output
                    .filter(|output| !output.is_null())
                    .with_context(|| format!("Prediction {} succeeded without output", prediction.id))
            }
            status => {
                let reason = prediction
                    .error
                    .map(|e| e.as_str().map(str::to_string).unwrap_or_else(|| e.to_string()))
                    .unwrap_or_else(|| "no error message".to_string());
                log::error!("❌ Prediction {} ended as {:?}: {}", prediction.id, status, reason);
                anyhow::bail!("Replicate prediction {} {:?}: {}", prediction.id, status, reason);
            }
        }
    }

    async fn parse_prediction(&self, response: reqwest::Response) -> Result<Prediction> {
        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            log::error!("❌ Replicate API error response: {}", error_text);
            anyhow::bail!("Replicate API error ({}): {}", status, error_text);
        }

        let text = response.text().await?;
        let prediction = serde_json::from_str(&text).context("Malformed Replicate prediction")?;
        Ok(prediction)
    }
}

/// `owner/name:version` -> `version`; bare version ids pass through.
fn version_id(model: &str) -> &str {
    model.rsplit_once(':').map(|(_, version)| version).unwrap_or(model)
}

/// Flatten model output into text. Language models stream an array of
/// fragments, captioning models return a single string.
pub fn output_text(output: &Value) -> Result<String> {
    match output {
        Value::String(s) => Ok(s.clone()),
        Value::Array(parts) => parts
            .iter()
            .map(|part| {
                part.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| anyhow::anyhow!("Unexpected output fragment: {}", part))
            })
            .collect::<Result<Vec<_>>>()
            .map(|parts| parts.concat()),
        other => anyhow::bail!("Unexpected model output: {}", other),
    }
}
