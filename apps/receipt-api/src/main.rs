//! Receipt scanning API server.
//!
//! Accepts image uploads, reads them with Azure Document Intelligence OCR,
//! decides whether they depict retail receipts via keyword classification,
//! and forwards confirmed receipts to Mindee for structured field
//! extraction. Provides REST endpoints for:
//!
//! - Full processing (classify + extract)
//! - Classification only
//! - Extraction only
//! - Taxonomy introspection

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::{
    routing::{get, post},
    Router,
};
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod error;
mod state;

use api::{
    handle_check_receipt, handle_extract_receipt_data, handle_health, handle_keywords,
    handle_process_receipt,
};
use state::AppState;

/// Command-line arguments for the receipt API server
#[derive(Parser, Debug)]
#[command(name = "receipt-api")]
#[command(about = "Receipt classification and extraction API")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "8000")]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Maximum upload size in megabytes
    #[arg(long, default_value = "10")]
    max_upload_mb: usize,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting receipt API server on {}:{}", args.host, args.port);

    // Wire providers from environment credentials
    let state = Arc::new(AppState::from_env()?);
    if !state.azure_configured {
        warn!("Azure OCR credentials missing, classification endpoints will report upstream errors");
    }
    if !state.mindee_configured {
        warn!("Mindee credentials missing, extraction will be reported as failed");
    }

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = Router::new()
        // Health check
        .route("/health", get(handle_health))
        // Classification and extraction endpoints
        .route("/process-receipt", post(handle_process_receipt))
        .route("/check-receipt", post(handle_check_receipt))
        .route("/extract-receipt-data", post(handle_extract_receipt_data))
        .route("/keywords", get(handle_keywords))
        // Apply middleware
        .layer(DefaultBodyLimit::max(args.max_upload_mb * 1024 * 1024))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);
    info!("Upload limit: {} MB", args.max_upload_mb);

    axum::serve(listener, app).await?;

    Ok(())
}
