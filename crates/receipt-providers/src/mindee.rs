//! Mindee V2 structured-extraction client.
//!
//! Flow: enqueue the image through the inference endpoint, poll the job's
//! polling URL until it leaves the queue, then fetch the result document
//! and pass its field map through untouched.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::error::ProviderError;
use crate::settings::ProviderSettings;
use crate::{ExtractedFields, ExtractionProvider};

const DEFAULT_BASE_URL: &str = "https://api-v2.mindee.net/v2";
const POLL_INTERVAL: Duration = Duration::from_secs(2);
const MAX_POLLS: u32 = 30;

pub struct MindeeExtractionClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model_id: String,
}

#[derive(Debug, Deserialize)]
struct JobEnvelope {
    job: Job,
}

#[derive(Debug, Deserialize)]
struct Job {
    status: String,
    #[serde(default)]
    polling_url: Option<String>,
    #[serde(default)]
    result_url: Option<String>,
    #[serde(default)]
    error: Option<JobError>,
}

#[derive(Debug, Deserialize)]
struct JobError {
    detail: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InferenceEnvelope {
    inference: Inference,
}

#[derive(Debug, Deserialize)]
struct Inference {
    result: InferenceResult,
}

#[derive(Debug, Deserialize)]
struct InferenceResult {
    fields: serde_json::Map<String, serde_json::Value>,
}

impl MindeeExtractionClient {
    pub fn new(settings: &ProviderSettings) -> Result<Self, ProviderError> {
        Self::with_base_url(settings, DEFAULT_BASE_URL)
    }

    /// Point the client at a different API root (test seam).
    pub fn with_base_url(
        settings: &ProviderSettings,
        base_url: &str,
    ) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: settings.mindee_api_key.clone(),
            model_id: settings.mindee_model_id.clone(),
        })
    }

    fn configured(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.model_id.trim().is_empty()
    }

    #[instrument(skip(self, image), fields(filename = %filename, bytes = image.len()))]
    async fn run_inference(
        &self,
        image: &[u8],
        filename: &str,
    ) -> Result<ExtractedFields, ProviderError> {
        if !self.configured() {
            return Err(ProviderError::NotConfigured("Mindee"));
        }

        let form = Form::new()
            .part(
                "file",
                Part::bytes(image.to_vec()).file_name(filename.to_string()),
            )
            .text("model_id", self.model_id.clone());

        let response = self
            .http
            .post(format!("{}/inferences/enqueue", self.base_url))
            .header("Authorization", &self.api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unreadable error body".to_string());
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let enqueued: JobEnvelope = response.json().await?;
        debug!(status = %enqueued.job.status, "inference enqueued");
        let polling_url = enqueued.job.polling_url.ok_or_else(|| {
            ProviderError::InvalidResponse("enqueue response carried no polling_url".to_string())
        })?;

        let result_url = self.poll_job(&polling_url).await?;
        self.fetch_result(&result_url).await
    }

    async fn poll_job(&self, url: &str) -> Result<String, ProviderError> {
        for attempt in 1..=MAX_POLLS {
            tokio::time::sleep(POLL_INTERVAL).await;

            let envelope: JobEnvelope = self
                .http
                .get(url)
                .header("Authorization", &self.api_key)
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;

            match envelope.job.status.as_str() {
                "Processed" => {
                    return envelope.job.result_url.ok_or_else(|| {
                        ProviderError::InvalidResponse(
                            "processed job carried no result_url".to_string(),
                        )
                    });
                }
                "Failed" => {
                    let detail = envelope
                        .job
                        .error
                        .and_then(|error| error.detail)
                        .unwrap_or_else(|| "no reason given".to_string());
                    return Err(ProviderError::AnalysisFailed(detail));
                }
                other => debug!(status = other, attempt, "inference still queued"),
            }
        }

        Err(ProviderError::PollTimeout(MAX_POLLS))
    }

    async fn fetch_result(&self, url: &str) -> Result<ExtractedFields, ProviderError> {
        let envelope: InferenceEnvelope = self
            .http
            .get(url)
            .header("Authorization", &self.api_key)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let fields = envelope.inference.result.fields;
        info!(field_count = fields.len(), "extraction finished");
        Ok(ExtractedFields {
            summary: summarize_fields(&fields),
            fields,
        })
    }
}

#[async_trait]
impl ExtractionProvider for MindeeExtractionClient {
    async fn extract_fields(
        &self,
        image: &[u8],
        filename: &str,
    ) -> Result<ExtractedFields, ProviderError> {
        self.run_inference(image, filename).await
    }
}

/// Compact description of which fields came back, for logs and summaries.
fn summarize_fields(fields: &serde_json::Map<String, serde_json::Value>) -> String {
    if fields.is_empty() {
        return "no fields extracted".to_string();
    }
    let names: Vec<&str> = fields.keys().map(String::as_str).collect();
    format!("{} field(s): {}", fields.len(), names.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn client(api_key: &str, model_id: &str) -> MindeeExtractionClient {
        MindeeExtractionClient::new(&ProviderSettings {
            mindee_api_key: api_key.to_string(),
            mindee_model_id: model_id.to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_unconfigured_client_short_circuits() {
        let client = client("", "");
        let err = client.extract_fields(b"img", "r.jpg").await.unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured(_)));
    }

    #[test]
    fn test_enqueued_job_deserializes() {
        let payload = r#"{
            "job": {
                "id": "12345",
                "model_id": "model-abc",
                "filename": "receipt.jpg",
                "status": "Waiting",
                "polling_url": "https://api-v2.mindee.net/v2/jobs/12345"
            }
        }"#;

        let envelope: JobEnvelope = serde_json::from_str(payload).unwrap();
        assert_eq!(envelope.job.status, "Waiting");
        assert_eq!(
            envelope.job.polling_url.as_deref(),
            Some("https://api-v2.mindee.net/v2/jobs/12345")
        );
        assert_eq!(envelope.job.result_url, None);
    }

    #[test]
    fn test_processed_job_carries_result_url() {
        let payload = r#"{
            "job": {
                "id": "12345",
                "status": "Processed",
                "result_url": "https://api-v2.mindee.net/v2/inferences/67890"
            }
        }"#;

        let envelope: JobEnvelope = serde_json::from_str(payload).unwrap();
        assert_eq!(envelope.job.status, "Processed");
        assert_eq!(
            envelope.job.result_url.as_deref(),
            Some("https://api-v2.mindee.net/v2/inferences/67890")
        );
    }

    #[test]
    fn test_inference_fields_pass_through_verbatim() {
        let payload = r#"{
            "inference": {
                "model": { "id": "model-abc" },
                "result": {
                    "fields": {
                        "supplier_name": { "value": "CARREFOUR" },
                        "total_amount": { "value": 24.5, "confidence": 0.98 }
                    }
                }
            }
        }"#;

        let envelope: InferenceEnvelope = serde_json::from_str(payload).unwrap();
        let fields = envelope.inference.result.fields;

        assert_eq!(fields.len(), 2);
        assert_eq!(fields["supplier_name"]["value"], "CARREFOUR");
        assert_eq!(fields["total_amount"]["confidence"], 0.98);
    }

    #[test]
    fn test_field_summary() {
        let empty = serde_json::Map::new();
        assert_eq!(summarize_fields(&empty), "no fields extracted");

        let mut fields = serde_json::Map::new();
        fields.insert("date".to_string(), serde_json::json!(null));
        fields.insert("total_amount".to_string(), serde_json::json!(null));
        assert_eq!(summarize_fields(&fields), "2 field(s): date, total_amount");
    }
}
