//! OCR and structured-extraction providers.
//!
//! Both external services sit behind object-safe traits so the HTTP layer
//! and its tests can swap in fakes. [`AzureOcrClient`] reads text out of an
//! image with Azure Document Intelligence; [`MindeeExtractionClient`] pulls
//! structured receipt fields from Mindee.

pub mod azure;
pub mod error;
pub mod mindee;
pub mod settings;

use async_trait::async_trait;
use serde::Serialize;
use tracing::warn;

pub use azure::AzureOcrClient;
pub use error::ProviderError;
pub use mindee::MindeeExtractionClient;
pub use settings::ProviderSettings;

/// Reads printed or handwritten text out of an image.
#[async_trait]
pub trait OcrProvider: Send + Sync {
    async fn extract_text(&self, image: &[u8], content_type: &str)
        -> Result<String, ProviderError>;
}

/// Pulls structured receipt fields out of an image.
#[async_trait]
pub trait ExtractionProvider: Send + Sync {
    async fn extract_fields(
        &self,
        image: &[u8],
        filename: &str,
    ) -> Result<ExtractedFields, ProviderError>;
}

/// Raw output of an extraction call: the service's field map passed through
/// verbatim, plus a short summary of what came back.
#[derive(Debug, Clone)]
pub struct ExtractedFields {
    pub fields: serde_json::Map<String, serde_json::Value>,
    pub summary: String,
}

/// Extraction envelope embedded in API responses. Failures are carried in
/// here rather than failing the surrounding request.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExtractionResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtractionResult {
    pub fn completed(extracted: ExtractedFields) -> Self {
        Self {
            success: true,
            fields: Some(extracted.fields),
            raw_summary: Some(extracted.summary),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            fields: None,
            raw_summary: None,
            error: Some(message.into()),
        }
    }
}

/// Run extraction and absorb any failure into the result envelope. The
/// surrounding request keeps succeeding whatever the extraction service
/// does.
pub async fn dispatch_extraction(
    provider: &dyn ExtractionProvider,
    image: &[u8],
    filename: &str,
) -> ExtractionResult {
    match provider.extract_fields(image, filename).await {
        Ok(extracted) => ExtractionResult::completed(extracted),
        Err(err) => {
            warn!(filename = %filename, error = %err, "extraction failed, continuing without data");
            ExtractionResult::failure(err.to_string())
        }
    }
}
