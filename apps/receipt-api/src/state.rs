//! Shared application state.

use std::sync::Arc;

use receipt_engine::ReceiptClassifier;
use receipt_providers::{
    AzureOcrClient, ExtractionProvider, MindeeExtractionClient, OcrProvider, ProviderError,
    ProviderSettings,
};

/// Shared application state: the classifier plus both provider handles.
pub struct AppState {
    /// Keyword classifier, taxonomy compiled at startup
    pub classifier: ReceiptClassifier,
    /// OCR provider used to read text out of uploads
    pub ocr: Arc<dyn OcrProvider>,
    /// Structured-extraction provider
    pub extraction: Arc<dyn ExtractionProvider>,
    /// Azure credentials were present at startup
    pub azure_configured: bool,
    /// Mindee credentials were present at startup
    pub mindee_configured: bool,
}

impl AppState {
    /// Wire the real providers from environment credentials.
    pub fn from_env() -> Result<Self, ProviderError> {
        let settings = ProviderSettings::from_env();
        let classifier = ReceiptClassifier::default();
        let ocr: Arc<dyn OcrProvider> = Arc::new(AzureOcrClient::new(&settings)?);
        let extraction: Arc<dyn ExtractionProvider> =
            Arc::new(MindeeExtractionClient::new(&settings)?);

        Ok(Self {
            classifier,
            ocr,
            extraction,
            azure_configured: settings.azure_configured(),
            mindee_configured: settings.mindee_configured(),
        })
    }

    /// Build state around arbitrary providers (used by tests).
    pub fn with_providers(
        classifier: ReceiptClassifier,
        ocr: Arc<dyn OcrProvider>,
        extraction: Arc<dyn ExtractionProvider>,
    ) -> Self {
        Self {
            classifier,
            ocr,
            extraction,
            azure_configured: true,
            mindee_configured: true,
        }
    }
}
