use chronosense::application::pipeline::ChartPipeline;
use chronosense::infrastructure::SampleLog;
use std::fs;

#[test]
fn test_full_pipeline_from_recorded_log() {
    let dir = tempfile::tempdir().unwrap();
    let data_path = dir.path().join("data.txt");
    fs::write(&data_path, "5 4.0\n5 6.0\n5 5.5\n3 3.5\n").unwrap();

    let chart_path = dir.path().join("static/error.png");
    let pipeline = ChartPipeline::new(SampleLog::new(&data_path), &chart_path);
    let errors = pipeline.run().unwrap();

    // Always exactly the ten targets, whatever the log holds.
    assert_eq!(errors.len(), 10);
    assert!((errors[&5] - 2.5 / 3.0).abs() < 1e-12);
    assert!((errors[&3] - 0.5).abs() < 1e-12);
    assert!(errors.iter().all(|(&t, &e)| t == 3 || t == 5 || e == 0.0));

    let chart = fs::metadata(&chart_path).unwrap();
    assert!(chart.len() > 0);
}

#[test]
fn test_pipeline_tolerates_missing_log() {
    let dir = tempfile::tempdir().unwrap();
    let chart_path = dir.path().join("error.png");
    let pipeline = ChartPipeline::new(SampleLog::new(dir.path().join("data.txt")), &chart_path);

    let errors = pipeline.run().unwrap();

    assert_eq!(errors.len(), 10);
    assert!(errors.values().all(|&error| error == 0.0));
    assert!(chart_path.exists());
}

#[test]
fn test_pipeline_rejects_malformed_log() {
    let dir = tempfile::tempdir().unwrap();
    let data_path = dir.path().join("data.txt");
    // The second record uses the legacy comma delimiter, which is no longer
    // accepted: whitespace is canonical.
    fs::write(&data_path, "2 1.5\n2,1.5\n").unwrap();

    let pipeline = ChartPipeline::new(SampleLog::new(&data_path), dir.path().join("error.png"));
    let err = pipeline.run().unwrap_err();

    let msg = err.to_string();
    assert!(msg.contains("line 2"), "unexpected error: {msg}");
    assert!(msg.contains("2,1.5"), "unexpected error: {msg}");
}
