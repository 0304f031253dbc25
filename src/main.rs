use std::env;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pdfgate::handlers::{create_router, AppState};
use pdfgate::models::UploadEvent;
use pdfgate::services::format_file_size;
use pdfgate::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pdfgate=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = Config::from_env()?;

    tracing::info!("Starting pdfgate PDF validation service");
    tracing::info!("Max file size: {}", format_file_size(config.max_file_size_bytes));
    tracing::info!("Accepted file types: {:?}", config.accepted_file_types);

    let (uploads_tx, uploads_rx) = mpsc::unbounded_channel();
    tokio::spawn(log_accepted_uploads(uploads_rx));

    let port = env::var("PORT")
        .ok()
        .and_then(|port| port.parse::<u16>().ok())
        .unwrap_or(config.server_port);
    let addr = format!("{}:{}", config.server_host, port);

    let state = AppState::new(config, uploads_tx)?;
    let app = create_router(state);

    tracing::info!("Server listening on {}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn log_accepted_uploads(mut uploads: mpsc::UnboundedReceiver<UploadEvent>) {
    while let Some(event) = uploads.recv().await {
        tracing::info!(
            file_name = %event.file_name,
            file_size = event.file_size,
            file_type = %event.file_type,
            accepted_at = %event.accepted_at,
            "Upload accepted"
        );
    }
}
