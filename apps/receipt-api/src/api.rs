//! API handlers for the receipt service.
//!
//! Endpoints:
//! - `POST /process-receipt`: classify and, when positive, extract
//! - `POST /check-receipt`: classify only
//! - `POST /extract-receipt-data`: extract only, no classification
//! - `GET /keywords`: the active taxonomy and detection rule
//! - `GET /health`: liveness and credential status

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use tracing::info;

use receipt_engine::RecognitionDetails;
use receipt_providers::{dispatch_extraction, ExtractionResult};

use crate::error::ApiError;
use crate::state::AppState;

/// Fallback name for file parts uploaded without one.
const DEFAULT_FILENAME: &str = "upload";

/// A validated image upload.
pub struct ImageUpload {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Pull the image out of a multipart body: the first field named `file`,
/// or failing that the first field carrying a filename.
async fn read_image_upload(mut multipart: Multipart) -> Result<ImageUpload, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::Multipart(err.to_string()))?
    {
        let is_file_field = field.name() == Some("file") || field.file_name().is_some();
        if !is_file_field {
            continue;
        }

        let filename = field
            .file_name()
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_FILENAME)
            .to_string();
        let content_type = field.content_type().unwrap_or("").to_string();

        if !content_type.starts_with("image/") {
            return Err(ApiError::NotAnImage(content_type));
        }

        let data = field
            .bytes()
            .await
            .map_err(|err| ApiError::Multipart(err.to_string()))?;
        if data.is_empty() {
            return Err(ApiError::EmptyUpload);
        }

        return Ok(ImageUpload {
            filename,
            content_type,
            data: data.to_vec(),
        });
    }

    Err(ApiError::MissingFile)
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub azure_configured: bool,
    pub mindee_configured: bool,
}

/// Handler: GET /health
pub async fn handle_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "receipt-api",
        version: env!("CARGO_PKG_VERSION"),
        azure_configured: state.azure_configured,
        mindee_configured: state.mindee_configured,
    })
}

/// Keyword taxonomy response
#[derive(Serialize)]
pub struct KeywordsResponse {
    pub main_keywords: BTreeMap<String, Vec<String>>,
    pub secondary_keywords: Vec<String>,
    pub rule: &'static str,
}

/// Handler: GET /keywords
pub async fn handle_keywords(State(state): State<Arc<AppState>>) -> Json<KeywordsResponse> {
    let taxonomy = state.classifier.taxonomy();
    let main_keywords = taxonomy
        .primary
        .iter()
        .map(|category| (category.name.clone(), category.variants.clone()))
        .collect();

    Json(KeywordsResponse {
        main_keywords,
        secondary_keywords: taxonomy.secondary.clone(),
        rule: "at least one primary keyword required",
    })
}

/// Full pipeline response: classification plus, for positives, extraction.
#[derive(Serialize)]
pub struct ProcessReceiptResponse {
    pub is_receipt: bool,
    pub confidence: f64,
    pub message: String,
    pub recognition_details: RecognitionDetails,
    pub extracted_data: Option<ExtractionResult>,
    pub filename: String,
}

/// Classification-only response.
#[derive(Serialize)]
pub struct CheckReceiptResponse {
    pub is_receipt: bool,
    pub confidence: f64,
    pub message: String,
    pub recognition_details: RecognitionDetails,
    pub filename: String,
}

/// Extraction-only response.
#[derive(Serialize)]
pub struct ExtractReceiptDataResponse {
    pub filename: String,
    pub extracted_data: ExtractionResult,
}

/// Handler: POST /process-receipt
pub async fn handle_process_receipt(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<ProcessReceiptResponse>, ApiError> {
    let upload = read_image_upload(multipart).await?;
    info!(
        "Processing '{}' ({} bytes, {})",
        upload.filename,
        upload.data.len(),
        upload.content_type
    );

    let text = state
        .ocr
        .extract_text(&upload.data, &upload.content_type)
        .await?;
    let decision = state.classifier.classify(&text);
    info!(
        "Classified '{}': is_receipt={} confidence={}",
        upload.filename, decision.is_receipt, decision.confidence
    );

    // Extraction runs only for positive classifications, and its failures
    // stay inside the envelope
    let extracted_data = if decision.is_receipt {
        Some(dispatch_extraction(state.extraction.as_ref(), &upload.data, &upload.filename).await)
    } else {
        None
    };

    Ok(Json(ProcessReceiptResponse {
        is_receipt: decision.is_receipt,
        confidence: decision.confidence,
        message: decision.message,
        recognition_details: decision.recognition_details,
        extracted_data,
        filename: upload.filename,
    }))
}

/// Handler: POST /check-receipt
pub async fn handle_check_receipt(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<CheckReceiptResponse>, ApiError> {
    let upload = read_image_upload(multipart).await?;

    let text = state
        .ocr
        .extract_text(&upload.data, &upload.content_type)
        .await?;
    let decision = state.classifier.classify(&text);
    info!(
        "Checked '{}': is_receipt={} confidence={}",
        upload.filename, decision.is_receipt, decision.confidence
    );

    Ok(Json(CheckReceiptResponse {
        is_receipt: decision.is_receipt,
        confidence: decision.confidence,
        message: decision.message,
        recognition_details: decision.recognition_details,
        filename: upload.filename,
    }))
}

/// Handler: POST /extract-receipt-data
pub async fn handle_extract_receipt_data(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<ExtractReceiptDataResponse>, ApiError> {
    let upload = read_image_upload(multipart).await?;
    info!("Extracting '{}' without classification", upload.filename);

    let extracted_data =
        dispatch_extraction(state.extraction.as_ref(), &upload.data, &upload.filename).await;

    Ok(Json(ExtractReceiptDataResponse {
        filename: upload.filename,
        extracted_data,
    }))
}
