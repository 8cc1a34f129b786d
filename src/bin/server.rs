//! Chronosense server - serves the time perception error chart
//!
//! Runs the aggregation pipeline lazily: the chart is re-rendered only when
//! the sample log has changed since the last render, then served as a static
//! image. Suitable for leaving up while recording sessions happen elsewhere.
//!
//! # Usage
//! ```sh
//! LISTEN_ADDR=0.0.0.0:3000 cargo run --bin server
//! ```
//!
//! # Environment Variables
//! - `DATA_FILE` - Sample log path (default: data.txt)
//! - `CHART_FILE` - Rendered chart path (default: static/error.png)
//! - `LISTEN_ADDR` - Bind address (default: 127.0.0.1:3000)

use anyhow::Result;
use chronosense::application::pipeline::ChartPipeline;
use chronosense::config::Config;
use chronosense::infrastructure::SampleLog;
use chronosense::interfaces::web::{self, AppState};
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false).pretty();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    info!("Chronosense server {} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;
    info!(
        "Configuration loaded: data={:?}, chart={:?}, listen={}",
        config.data_path, config.chart_path, config.listen_addr
    );

    let pipeline = ChartPipeline::new(SampleLog::new(config.data_path), config.chart_path);
    // Warm the chart so the first page load never waits on a render.
    pipeline.refresh_if_stale()?;

    let app = web::router(AppState::new(pipeline));

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutdown signal received. Exiting...");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
