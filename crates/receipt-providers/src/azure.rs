//! Azure Document Intelligence OCR client (prebuilt-read model).
//!
//! Flow: POST the image bytes to the analyze endpoint, receive a 202 with
//! an `operation-location` header, then poll that URL until the analysis
//! reports `succeeded` or `failed`.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::error::ProviderError;
use crate::settings::ProviderSettings;
use crate::OcrProvider;

const API_VERSION: &str = "2023-07-31";
const KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const POLL_INTERVAL: Duration = Duration::from_secs(1);
const MAX_POLLS: u32 = 60;

pub struct AzureOcrClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct AnalyzeOperation {
    status: String,
    #[serde(rename = "analyzeResult")]
    analyze_result: Option<AnalyzeResult>,
    error: Option<AzureError>,
}

#[derive(Debug, Deserialize)]
struct AnalyzeResult {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AzureError {
    message: Option<String>,
}

impl AzureOcrClient {
    pub fn new(settings: &ProviderSettings) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;

        Ok(Self {
            http,
            endpoint: settings.azure_endpoint.trim_end_matches('/').to_string(),
            api_key: settings.azure_key.clone(),
        })
    }

    fn analyze_url(&self) -> String {
        format!(
            "{}/formrecognizer/documentModels/prebuilt-read:analyze?api-version={}",
            self.endpoint, API_VERSION
        )
    }

    fn configured(&self) -> bool {
        !self.endpoint.trim().is_empty() && !self.api_key.trim().is_empty()
    }

    /// Submit the image and wait for the recognized text.
    #[instrument(skip(self, image), fields(bytes = image.len()))]
    async fn analyze(&self, image: &[u8], content_type: &str) -> Result<String, ProviderError> {
        if !self.configured() {
            return Err(ProviderError::NotConfigured("Azure Document Intelligence"));
        }

        let response = self
            .http
            .post(self.analyze_url())
            .header(KEY_HEADER, &self.api_key)
            .header("Content-Type", content_type)
            .body(image.to_vec())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = match describe_azure_status(status.as_u16()) {
                Some(description) => description.to_string(),
                None => response
                    .text()
                    .await
                    .unwrap_or_else(|_| "unreadable error body".to_string()),
            };
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let operation_url = response
            .headers()
            .get("operation-location")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| {
                ProviderError::InvalidResponse("missing operation-location header".to_string())
            })?;

        self.poll_operation(&operation_url).await
    }

    async fn poll_operation(&self, url: &str) -> Result<String, ProviderError> {
        for attempt in 1..=MAX_POLLS {
            tokio::time::sleep(POLL_INTERVAL).await;

            let operation: AnalyzeOperation = self
                .http
                .get(url)
                .header(KEY_HEADER, &self.api_key)
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;

            match operation.status.as_str() {
                "succeeded" => {
                    let content = operation
                        .analyze_result
                        .and_then(|result| result.content)
                        .unwrap_or_default();
                    info!(chars = content.len(), polls = attempt, "OCR analysis finished");
                    return Ok(content);
                }
                "failed" => {
                    let message = operation
                        .error
                        .and_then(|error| error.message)
                        .unwrap_or_else(|| "no reason given".to_string());
                    return Err(ProviderError::AnalysisFailed(message));
                }
                other => debug!(status = other, attempt, "analysis still running"),
            }
        }

        Err(ProviderError::PollTimeout(MAX_POLLS))
    }
}

#[async_trait]
impl OcrProvider for AzureOcrClient {
    async fn extract_text(
        &self,
        image: &[u8],
        content_type: &str,
    ) -> Result<String, ProviderError> {
        self.analyze(image, content_type).await
    }
}

/// Human descriptions for the analyze endpoint's common failure statuses.
fn describe_azure_status(status: u16) -> Option<&'static str> {
    match status {
        401 => Some("invalid or expired API key"),
        403 => Some("access denied, check the resource key and region"),
        404 => Some("endpoint not found, check the resource URL"),
        429 => Some("rate limit exceeded, retry later"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn client(endpoint: &str, key: &str) -> AzureOcrClient {
        AzureOcrClient::new(&ProviderSettings {
            azure_endpoint: endpoint.to_string(),
            azure_key: key.to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_analyze_url_trims_trailing_slash() {
        let client = client("https://r.cognitiveservices.azure.com/", "key");
        assert_eq!(
            client.analyze_url(),
            "https://r.cognitiveservices.azure.com/formrecognizer/documentModels/prebuilt-read:analyze?api-version=2023-07-31"
        );
    }

    #[tokio::test]
    async fn test_unconfigured_client_short_circuits() {
        let client = client("", "");
        let err = client.extract_text(b"img", "image/png").await.unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured(_)));
    }

    #[test]
    fn test_succeeded_operation_deserializes() {
        let payload = r#"{
            "status": "succeeded",
            "createdDateTime": "2024-05-01T10:00:00Z",
            "analyzeResult": {
                "apiVersion": "2023-07-31",
                "content": "TICKET DE CAISSE\nTOTAL 12,50"
            }
        }"#;

        let operation: AnalyzeOperation = serde_json::from_str(payload).unwrap();
        assert_eq!(operation.status, "succeeded");
        assert_eq!(
            operation.analyze_result.unwrap().content.unwrap(),
            "TICKET DE CAISSE\nTOTAL 12,50"
        );
    }

    #[test]
    fn test_failed_operation_carries_message() {
        let payload = r#"{
            "status": "failed",
            "error": { "code": "InvalidImage", "message": "image too small" }
        }"#;

        let operation: AnalyzeOperation = serde_json::from_str(payload).unwrap();
        assert_eq!(operation.status, "failed");
        assert_eq!(operation.error.unwrap().message.unwrap(), "image too small");
    }

    #[test]
    fn test_status_descriptions() {
        assert_eq!(
            describe_azure_status(401),
            Some("invalid or expired API key")
        );
        assert_eq!(
            describe_azure_status(429),
            Some("rate limit exceeded, retry later")
        );
        assert_eq!(describe_azure_status(500), None);
    }
}
