//! Provider error taxonomy.

use thiserror::Error;

/// Failures surfaced by the external OCR and extraction services.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{0} credentials are not configured")]
    NotConfigured(&'static str),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("service returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("analysis failed: {0}")]
    AnalysisFailed(String),

    #[error("unexpected response: {0}")]
    InvalidResponse(String),

    #[error("analysis did not complete after {0} polls")]
    PollTimeout(u32),
}
