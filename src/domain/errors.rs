use std::path::PathBuf;
use thiserror::Error;

/// Errors from parsing a single log record
#[derive(Debug, Error, PartialEq)]
pub enum SampleParseError {
    #[error("expected 2 whitespace-separated fields, found {found}")]
    FieldCount { found: usize },

    #[error("invalid {field} value '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    #[error("target time {value} outside supported range 1-10")]
    TargetOutOfRange { value: f64 },

    #[error("actual time {value} is not a positive duration")]
    NonPositiveActual { value: f64 },
}

/// Errors from reading the sample log as a whole
#[derive(Debug, Error)]
pub enum SampleLogError {
    #[error("Malformed record at line {line} ('{content}'): {reason}")]
    MalformedRecord {
        line: usize,
        content: String,
        reason: SampleParseError,
    },

    #[error("Failed to read sample log {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_record_formatting() {
        let error = SampleLogError::MalformedRecord {
            line: 7,
            content: "5 abc".to_string(),
            reason: SampleParseError::InvalidNumber {
                field: "actual",
                value: "abc".to_string(),
            },
        };

        let msg = error.to_string();
        assert!(msg.contains("line 7"));
        assert!(msg.contains("5 abc"));
        assert!(msg.contains("'abc'"));
    }

    #[test]
    fn test_target_out_of_range_formatting() {
        let error = SampleParseError::TargetOutOfRange { value: 42.0 };

        let msg = error.to_string();
        assert!(msg.contains("42"));
        assert!(msg.contains("1-10"));
    }
}
