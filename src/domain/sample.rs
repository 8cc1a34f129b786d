use std::fmt;
use std::ops::RangeInclusive;

use crate::domain::errors::SampleParseError;

/// Target durations a player can be asked to judge, in whole seconds.
pub const TARGET_RANGE: RangeInclusive<u8> = 1..=10;

/// One recorded round: the target duration the player was asked to judge
/// and the wall-clock duration they actually waited.
///
/// Samples are immutable once recorded. The canonical log encoding is one
/// sample per line, two whitespace-separated numeric fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub target_secs: u8,
    pub actual_secs: f64,
}

impl Sample {
    /// Absolute error of this round in seconds.
    pub fn error_secs(&self) -> f64 {
        (f64::from(self.target_secs) - self.actual_secs).abs()
    }

    /// Parse one log line.
    ///
    /// Older producers wrote the target as a float ("3.0"), so the field is
    /// parsed as a float and truncated toward zero. Anything else that
    /// deviates from the format is rejected: wrong field count, non-numeric
    /// fields, a target outside [`TARGET_RANGE`], or a non-positive actual
    /// duration.
    pub fn parse_line(line: &str) -> Result<Self, SampleParseError> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 2 {
            return Err(SampleParseError::FieldCount {
                found: fields.len(),
            });
        }

        let raw_target: f64 =
            fields[0]
                .parse()
                .map_err(|_| SampleParseError::InvalidNumber {
                    field: "target",
                    value: fields[0].to_string(),
                })?;
        let target = raw_target.trunc();
        if !raw_target.is_finite()
            || target < f64::from(*TARGET_RANGE.start())
            || target > f64::from(*TARGET_RANGE.end())
        {
            return Err(SampleParseError::TargetOutOfRange { value: raw_target });
        }

        let actual_secs: f64 =
            fields[1]
                .parse()
                .map_err(|_| SampleParseError::InvalidNumber {
                    field: "actual",
                    value: fields[1].to_string(),
                })?;
        if !actual_secs.is_finite() || actual_secs <= 0.0 {
            return Err(SampleParseError::NonPositiveActual { value: actual_secs });
        }

        Ok(Self {
            target_secs: target as u8,
            actual_secs,
        })
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.target_secs, self.actual_secs)
    }
}
