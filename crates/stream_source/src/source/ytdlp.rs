use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    process::{Command, Output, Stdio},
    sync::LazyLock,
};

use regex::Regex;

use crate::{source::VideoSource, SourceError, StreamFormat, Video};

/// yt-dlp error lines that mean the item cannot be served at all, as opposed
/// to a transient or local failure
static UNAVAILABLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(video unavailable|private video|has been removed|no longer available|video is not available|not made this video available in your country|members[- ]only|join this channel|sign in to confirm your age|inappropriate for some users|this live event will begin|premieres in|account associated with this video has been terminated|copyright claim)",
    )
    .unwrap()
});

/// Thin wrapper around the `yt-dlp` executable
#[derive(Debug, Clone)]
pub struct YtDlp {
    binary: PathBuf,
    cookies: Option<PathBuf>,
}

impl YtDlp {
    const PROGRAM: &str = "yt-dlp";

    /// Locates yt-dlp, either at `binary` or on `PATH`
    pub fn new(binary: Option<PathBuf>) -> Result<Self, SourceError> {
        let binary = which::which(binary.unwrap_or_else(|| PathBuf::from(Self::PROGRAM)))
            .map_err(|_| SourceError::BinaryNotFound(Self::PROGRAM))?;
        tracing::debug!(binary = %binary.display(), "Using yt-dlp");

        Ok(YtDlp {
            binary,
            cookies: None,
        })
    }

    pub fn with_cookies(mut self, cookies: impl Into<PathBuf>) -> Self {
        self.cookies = Some(cookies.into());
        self
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.args(["--no-warnings", "--no-playlist"]);
        if let Some(cookies) = &self.cookies {
            cmd.arg("--cookies").arg(cookies);
        }
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }

    fn run(&self, mut cmd: Command) -> Result<Output, SourceError> {
        let output = cmd.output().map_err(|e| match e.kind() {
            ErrorKind::NotFound => SourceError::BinaryNotFound(Self::PROGRAM),
            _ => SourceError::Io(e),
        })?;

        if output.status.success() {
            Ok(output)
        } else {
            Err(classify_failure(&output))
        }
    }
}

/// Turns a failed yt-dlp run into either `Unavailable` or a generic process error
fn classify_failure(output: &Output) -> SourceError {
    let stderr = String::from_utf8_lossy(&output.stderr);

    let unavailable = stderr
        .lines()
        .filter(|line| line.starts_with("ERROR:"))
        .find(|line| UNAVAILABLE_RE.is_match(line));

    match unavailable {
        Some(line) => SourceError::Unavailable {
            reason: line.trim_start_matches("ERROR:").trim().to_string(),
        },
        None => SourceError::Process {
            program: YtDlp::PROGRAM,
            status: output.status,
            stderr: stderr.trim().to_string(),
        },
    }
}

// yt-dlp treats `-o` as a template, so literal percent signs must be doubled
fn output_template(dest: &Path) -> String {
    dest.to_string_lossy().replace('%', "%%")
}

impl VideoSource for YtDlp {
    #[tracing::instrument(skip(self))]
    fn resolve(&self, url: &str) -> Result<Video, SourceError> {
        let mut cmd = self.command();
        cmd.arg("--dump-json").arg(url);

        let output = self
            .run(cmd)
            .inspect_err(|e| tracing::debug!(error = ?e, "yt-dlp could not resolve url"))?;
        let video = serde_json::from_slice::<Video>(&output.stdout)?;
        tracing::debug!(
            id = %video.id,
            formats = video.formats.len(),
            "Resolved video"
        );

        Ok(video)
    }

    #[tracing::instrument(skip(self, video, stream), fields(id = %video.id, format = %stream.format_id))]
    fn download(
        &self,
        video: &Video,
        stream: &StreamFormat,
        dest: &Path,
    ) -> Result<(), SourceError> {
        let url = format!("https://www.youtube.com/watch?v={}", video.id);

        let mut cmd = self.command();
        cmd.args(["--quiet", "--no-part", "-f", &stream.format_id])
            .arg("-o")
            .arg(output_template(dest))
            .arg(&url);

        if let Err(e) = self.run(cmd) {
            // don't leave a truncated file behind under a name we reserved
            if dest.exists() {
                if let Err(rm) = std::fs::remove_file(dest) {
                    tracing::warn!(error = ?rm, path = ?dest, "Failed to remove partial download");
                }
            }
            return Err(e);
        }

        if !dest.exists() {
            return Err(SourceError::MissingOutput(dest.to_path_buf()));
        }
        Ok(())
    }
}
