use thiserror::Error;

/// Errors that can occur while replaying a recorded session
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("Recording file not found: {0}")]
    RecordingNotFound(String),

    #[error("Recording format error at line {line}: {message}")]
    RecordingFormat { line: usize, message: String },

    #[error("Recording contains no samples")]
    NoSamples,

    #[error("Session failed to start: {0}")]
    SessionStart(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ReplayError>;
