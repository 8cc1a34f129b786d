use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{debug, info};

use crate::application::aggregator;
use crate::infrastructure::{SampleLog, chart};

/// The full measurement pipeline: sample log in, chart artifact out.
///
/// The chart is a cached artifact. [`ChartPipeline::refresh_if_stale`]
/// compares file modification times and only re-renders when the log has
/// changed since the chart was last written, so page loads on an unchanged
/// log cost nothing. The comparison is stateless and therefore survives
/// process restarts.
pub struct ChartPipeline {
    log: SampleLog,
    chart_path: PathBuf,
}

impl ChartPipeline {
    pub fn new(log: SampleLog, chart_path: impl Into<PathBuf>) -> Self {
        Self {
            log,
            chart_path: chart_path.into(),
        }
    }

    pub fn log(&self) -> &SampleLog {
        &self.log
    }

    pub fn chart_path(&self) -> &Path {
        &self.chart_path
    }

    /// Rebuild the chart from the full log, unconditionally.
    ///
    /// Returns the error mapping that was rendered.
    pub fn run(&self) -> Result<BTreeMap<u8, f64>> {
        let samples = self.log.read_all()?;
        let errors = aggregator::average_errors(&aggregator::bucket_samples(&samples));
        chart::render_error_chart(&errors, &self.chart_path)?;
        info!(
            "Rendered error chart from {} samples to {:?}",
            samples.len(),
            self.chart_path
        );
        Ok(errors)
    }

    /// Re-render only when the chart no longer reflects the log on disk.
    pub fn refresh_if_stale(&self) -> Result<()> {
        if self.is_stale() {
            self.run()?;
        } else {
            debug!("Chart at {:?} is up to date", self.chart_path);
        }
        Ok(())
    }

    fn is_stale(&self) -> bool {
        let chart_mtime = match fs::metadata(&self.chart_path).and_then(|meta| meta.modified()) {
            Ok(mtime) => mtime,
            // No chart yet, or an unreadable one: render.
            Err(_) => return true,
        };
        match self.log.modified_at() {
            Some(log_mtime) => log_mtime > chart_mtime,
            // No log at all: the existing chart is the all-zero one.
            None => false,
        }
    }
}
