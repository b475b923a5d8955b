use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde::{Deserialize, Serialize};
use stride_core::contracts::MetricsUpdate;

use crate::errors::Result;

/// Complete replay output in JSON format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayOutput {
    pub metadata: Metadata,
    pub updates: Vec<MetricsUpdate>,
    pub summary: Summary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    pub recording_file: String,
    pub sample_count: usize,
    pub duration_seconds: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub steps: u64,
    pub recorded_intervals: u64,
    pub dropped_samples: u64,
    pub final_cadence_spm: u32,
    pub final_symmetry: u8,
}

impl ReplayOutput {
    /// Write the report as pretty-printed JSON
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }
}
