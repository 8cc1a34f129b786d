use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use plotters::prelude::*;
use tracing::info;

use crate::domain::sample::TARGET_RANGE;

const CHART_SIZE: (u32, u32) = (1000, 600);
// mediumseagreen
const BAR_COLOR: RGBColor = RGBColor(60, 179, 113);

/// Render the per-target average error mapping as a PNG bar chart.
///
/// One bar per target second, drawn in ascending key order. The image is
/// written to a sibling temp file and renamed into place, so a concurrent
/// reader never observes a half-written chart; a failed render leaves any
/// previous chart untouched. Overwrites whatever was at `output_path`.
pub fn render_error_chart(errors: &BTreeMap<u8, f64>, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create chart directory {parent:?}"))?;
    }

    let tmp_path = output_path.with_extension("tmp.png");

    let max_error = errors.values().copied().fold(0.0_f64, f64::max);
    // Keep a visible y axis even when every bucket is empty.
    let y_max = if max_error > 0.0 { max_error * 1.15 } else { 1.0 };

    {
        let root = BitMapBackend::new(&tmp_path, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| anyhow!("Failed to clear chart canvas: {e}"))?;

        let targets =
            u32::from(*TARGET_RANGE.start())..u32::from(*TARGET_RANGE.end()) + 1;
        let mut chart = ChartBuilder::on(&root)
            .caption("Average Error of Human Time Perception", ("sans-serif", 32))
            .margin(12)
            .x_label_area_size(48)
            .y_label_area_size(64)
            .build_cartesian_2d(targets.into_segmented(), 0.0..y_max)
            .map_err(|e| anyhow!("Failed to build chart axes: {e}"))?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("Time (seconds)")
            .y_desc("Average Error (seconds)")
            .axis_desc_style(("sans-serif", 18))
            .draw()
            .map_err(|e| anyhow!("Failed to draw chart mesh: {e}"))?;

        chart
            .draw_series(
                Histogram::vertical(&chart)
                    .style(BAR_COLOR.filled())
                    .margin(8)
                    .data(errors.iter().map(|(&target, &error)| (u32::from(target), error))),
            )
            .map_err(|e| anyhow!("Failed to draw error bars: {e}"))?;

        root.present()
            .map_err(|e| anyhow!("Failed to write chart image: {e}"))?;
    }

    fs::rename(&tmp_path, output_path)
        .with_context(|| format!("Failed to move chart into place at {output_path:?}"))?;
    info!("Wrote error chart to {:?}", output_path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zero_mapping() -> BTreeMap<u8, f64> {
        TARGET_RANGE.map(|target| (target, 0.0)).collect()
    }

    #[test]
    fn test_renders_all_zero_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("error.png");

        render_error_chart(&zero_mapping(), &output).unwrap();

        let meta = fs::metadata(&output).unwrap();
        assert!(meta.len() > 0);
    }

    #[test]
    fn test_creates_missing_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("static/error.png");

        let mut errors = zero_mapping();
        errors.insert(5, 0.83);
        render_error_chart(&errors, &output).unwrap();

        assert!(output.exists());
    }

    #[test]
    fn test_overwrites_existing_chart() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("error.png");
        fs::write(&output, b"stale bytes").unwrap();

        render_error_chart(&zero_mapping(), &output).unwrap();

        let meta = fs::metadata(&output).unwrap();
        assert!(meta.len() > 100, "placeholder was not replaced by an image");
    }

    #[test]
    fn test_leaves_no_temp_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("error.png");

        render_error_chart(&zero_mapping(), &output).unwrap();

        assert!(!output.with_extension("tmp.png").exists());
    }
}
