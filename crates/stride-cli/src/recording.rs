use csv::Reader;
use std::fs::File;
use std::path::Path;
use std::time::Duration;

use stride_providers::RawMotionEvent;

use crate::errors::{ReplayError, Result};

/// Parser for accelerometer recordings stored as CSV
pub struct RecordingParser;

impl RecordingParser {
    /// Parse motion events from a CSV file
    ///
    /// Expected format:
    /// timestamp_ms,accel_x,accel_y,accel_z
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Vec<RawMotionEvent>> {
        let file = File::open(path.as_ref()).map_err(|_| {
            ReplayError::RecordingNotFound(path.as_ref().display().to_string())
        })?;

        let mut reader = Reader::from_reader(file);
        let mut events = Vec::new();

        for (line_number, result) in reader.records().enumerate() {
            let record = result.map_err(|e| ReplayError::RecordingFormat {
                line: line_number + 2, // +1 for header, +1 for 1-based indexing
                message: format!("CSV error: {}", e),
            })?;

            if record.len() < 4 {
                return Err(ReplayError::RecordingFormat {
                    line: line_number + 2,
                    message: format!("Expected at least 4 columns, found {}", record.len()),
                });
            }

            let timestamp_ms: u64 = record[0]
                .trim()
                .parse()
                .map_err(|e| ReplayError::RecordingFormat {
                    line: line_number + 2,
                    message: format!("Invalid timestamp: {}", e),
                })?;

            let x: f64 = record[1]
                .trim()
                .parse()
                .map_err(|e| ReplayError::RecordingFormat {
                    line: line_number + 2,
                    message: format!("Invalid accel_x: {}", e),
                })?;

            let y: f64 = record[2]
                .trim()
                .parse()
                .map_err(|e| ReplayError::RecordingFormat {
                    line: line_number + 2,
                    message: format!("Invalid accel_y: {}", e),
                })?;

            let z: f64 = record[3]
                .trim()
                .parse()
                .map_err(|e| ReplayError::RecordingFormat {
                    line: line_number + 2,
                    message: format!("Invalid accel_z: {}", e),
                })?;

            events.push(RawMotionEvent {
                timestamp: Some(Duration::from_millis(timestamp_ms)),
                x,
                y,
                z,
            });
        }

        if events.is_empty() {
            return Err(ReplayError::NoSamples);
        }

        log::info!("Loaded {} motion events from recording", events.len());
        Ok(events)
    }
}
