pub mod chart;
pub mod sample_log;

pub use sample_log::SampleLog;
