//! HTTP presentation shell.
//!
//! Serves the rendered chart and a JSON view of the same mapping. Handlers
//! take the pipeline behind a mutex so renders are serialized; the core
//! stays single-threaded.

use std::collections::BTreeMap;
use std::fs;
use std::sync::{Arc, Mutex};

use anyhow::{Context, anyhow};
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::error;

use crate::application::aggregator;
use crate::application::pipeline::ChartPipeline;

#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<Mutex<ChartPipeline>>,
}

impl AppState {
    pub fn new(pipeline: ChartPipeline) -> Self {
        Self {
            pipeline: Arc::new(Mutex::new(pipeline)),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/static/error.png", get(error_chart))
        .route("/api/errors", get(api_errors))
        .with_state(state)
}

/// JSON payload for `GET /api/errors`.
#[derive(Debug, Serialize)]
pub struct ErrorReport {
    pub samples: usize,
    pub average_errors: BTreeMap<u8, f64>,
}

async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let pipeline = lock_pipeline(&state)?;
    let samples = pipeline.log().read_all()?;
    let last_recorded = pipeline.log().modified_at().map(DateTime::<Local>::from);
    Ok(Html(render_index_page(samples.len(), last_recorded)))
}

async fn error_chart(State(state): State<AppState>) -> Result<Response, AppError> {
    let pipeline = lock_pipeline(&state)?;
    pipeline.refresh_if_stale()?;
    let bytes = fs::read(pipeline.chart_path())
        .with_context(|| format!("Failed to read chart at {:?}", pipeline.chart_path()))?;
    Ok(([(header::CONTENT_TYPE, "image/png")], bytes).into_response())
}

async fn api_errors(State(state): State<AppState>) -> Result<Json<ErrorReport>, AppError> {
    let pipeline = lock_pipeline(&state)?;
    let samples = pipeline.log().read_all()?;
    let average_errors = aggregator::average_errors(&aggregator::bucket_samples(&samples));
    Ok(Json(ErrorReport {
        samples: samples.len(),
        average_errors,
    }))
}

fn lock_pipeline(state: &AppState) -> Result<std::sync::MutexGuard<'_, ChartPipeline>, AppError> {
    state
        .pipeline
        .lock()
        .map_err(|_| AppError(anyhow!("Chart pipeline lock poisoned")))
}

fn render_index_page(sample_count: usize, last_recorded: Option<DateTime<Local>>) -> String {
    let status_line = match (sample_count, last_recorded) {
        (0, _) | (_, None) => "No samples recorded yet.".to_string(),
        (count, Some(at)) => format!(
            "{count} samples recorded, most recent at {}.",
            at.format("%Y-%m-%d %H:%M:%S")
        ),
    };
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>Time Perception Error</title>
</head>
<body>
    <h1>Average Error of Human Time Perception</h1>
    <p>Average error in seconds for each target time (1 to 10 seconds).</p>
    <p>{status_line}</p>
    <img src="/static/error.png" alt="Error Visualization">
</body>
</html>
"#
    )
}

/// Adapter so handlers can use `?` on anything anyhow can absorb.
#[derive(Debug)]
struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("Request failed: {:#}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Internal error: {}", self.0),
        )
            .into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::SampleLog;

    fn state_in(dir: &std::path::Path) -> AppState {
        AppState::new(ChartPipeline::new(
            SampleLog::new(dir.join("data.txt")),
            dir.join("static/error.png"),
        ))
    }

    #[test]
    fn test_index_page_embeds_chart() {
        let page = render_index_page(0, None);
        assert!(page.contains(r#"<img src="/static/error.png""#));
        assert!(page.contains("No samples recorded yet."));
    }

    #[test]
    fn test_index_page_reports_sample_count() {
        let at = DateTime::from_timestamp(1_700_000_000, 0).unwrap().with_timezone(&Local);
        let page = render_index_page(12, Some(at));
        assert!(page.contains("12 samples recorded"));
    }

    #[tokio::test]
    async fn test_api_errors_covers_all_targets() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(dir.path());

        let Json(report) = api_errors(State(state)).await.unwrap();

        assert_eq!(report.samples, 0);
        assert_eq!(report.average_errors.len(), 10);
        assert!(report.average_errors.values().all(|&error| error == 0.0));

        // The payload keys every target by its second count.
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["samples"], 0);
        assert!(value["average_errors"].get("1").is_some());
        assert!(value["average_errors"].get("10").is_some());
    }

    #[tokio::test]
    async fn test_error_chart_serves_png() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(dir.path());

        let response = error_chart(State(state)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "image/png"
        );
    }
}
