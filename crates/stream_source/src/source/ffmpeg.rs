use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use crate::{source::AudioProcessor, SourceError};

#[derive(Debug, Clone)]
pub struct Ffmpeg {
    binary: PathBuf,
}

impl Ffmpeg {
    const PROGRAM: &str = "ffmpeg";

    /// Locates ffmpeg, either at `binary` or on `PATH`
    pub fn new(binary: Option<PathBuf>) -> Result<Self, SourceError> {
        let binary = which::which(binary.unwrap_or_else(|| PathBuf::from(Self::PROGRAM)))
            .map_err(|_| SourceError::BinaryNotFound(Self::PROGRAM))?;
        tracing::debug!(binary = %binary.display(), "Using ffmpeg");

        Ok(Ffmpeg { binary })
    }

    /// Defers locating ffmpeg until audio is first extracted
    pub fn unchecked(binary: Option<PathBuf>) -> Self {
        Ffmpeg {
            binary: binary.unwrap_or_else(|| PathBuf::from(Self::PROGRAM)),
        }
    }
}

impl AudioProcessor for Ffmpeg {
    #[tracing::instrument(skip(self))]
    fn extract_audio(&self, src: &Path, dest: &Path) -> Result<(), SourceError> {
        // -n: never overwrite, a clash is a bug in the caller's naming
        let output = Command::new(&self.binary)
            .args(["-nostdin", "-hide_banner", "-loglevel", "error", "-n", "-i"])
            .arg(src)
            .args(["-vn", "-codec:a", "libmp3lame", "-q:a", "2"])
            .arg(dest)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => SourceError::BinaryNotFound(Self::PROGRAM),
                _ => SourceError::Io(e),
            })?;

        if !output.status.success() {
            return Err(SourceError::Process {
                program: Self::PROGRAM,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        if !dest.exists() {
            return Err(SourceError::MissingOutput(dest.to_path_buf()));
        }
        Ok(())
    }
}
