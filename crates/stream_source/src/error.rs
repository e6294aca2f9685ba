use std::{path::PathBuf, process::ExitStatus};

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The platform refuses to serve the item (removed, private, region locked, ...)
    #[error("content unavailable: {reason}")]
    Unavailable { reason: String },
    #[error("{0} executable not found, make sure it is installed and on PATH")]
    BinaryNotFound(&'static str),
    #[error("{program} exited with {status}: {stderr}")]
    Process {
        program: &'static str,
        status: ExitStatus,
        stderr: String,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse yt-dlp output: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Expected output file was not produced: {}", .0.display())]
    MissingOutput(PathBuf),
}

impl SourceError {
    #[cfg(test)]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, SourceError::Unavailable { .. })
    }
}
