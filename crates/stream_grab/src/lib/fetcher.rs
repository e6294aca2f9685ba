use std::{
    fmt,
    path::{Path, PathBuf},
};

use anyhow::Context;
use stream_source::{AudioProcessor, SourceError, VideoSource};

use crate::namer::{sanitize_filename, NameRegistry};

/// What to keep of a downloaded video
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Mode {
    /// Extract the audio track into an mp3
    #[value(name = "mp3")]
    Audio,
    /// Keep the mp4 as downloaded
    #[default]
    #[value(name = "mp4")]
    Video,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Audio => f.write_str("mp3"),
            Mode::Video => f.write_str("mp4"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub url: String,
    pub mode: Mode,
    pub output_dir: PathBuf,
}

impl DownloadRequest {
    pub fn new(url: impl Into<String>, mode: Mode, output_dir: impl Into<PathBuf>) -> Self {
        DownloadRequest {
            url: url.into(),
            mode,
            output_dir: output_dir.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Saved { title: String, path: PathBuf },
    /// The platform would not serve the item
    Skipped { url: String, reason: String },
}

impl FetchOutcome {
    pub fn path(&self) -> Option<&Path> {
        match self {
            FetchOutcome::Saved { path, .. } => Some(path),
            FetchOutcome::Skipped { .. } => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, FetchOutcome::Skipped { .. })
    }
}

/// Downloads a single video and optionally turns it into an mp3.
///
/// Everything here blocks; the orchestrator runs each fetch on its own
/// blocking worker.
#[derive(Debug)]
pub struct Fetcher<S, A> {
    source: S,
    audio_processor: A,
    names: NameRegistry,
}

impl<S, A> Fetcher<S, A>
where
    S: VideoSource,
    A: AudioProcessor,
{
    const VIDEO_EXT: &str = "mp4";
    const AUDIO_EXT: &str = "mp3";

    pub fn new(source: S, audio_processor: A) -> Self {
        Fetcher {
            source,
            audio_processor,
            names: NameRegistry::new(),
        }
    }

    /// Downloads `request.url` into `request.output_dir`.
    ///
    /// Items the platform reports as unavailable are skipped and returned as
    /// [`FetchOutcome::Skipped`]; every other failure is an error.
    #[tracing::instrument(skip(self, request), fields(url = %request.url, mode = %request.mode))]
    pub fn fetch(&self, request: &DownloadRequest) -> anyhow::Result<FetchOutcome> {
        let video = match self.source.resolve(&request.url) {
            Ok(video) => video,
            Err(e) => return skip_or_fail(request, e, "Failed to resolve video"),
        };

        let stream = video
            .best_stream(Self::VIDEO_EXT)
            .with_context(|| format!("No {} stream available for {}", Self::VIDEO_EXT, request.url))?;
        tracing::info!(title = %video.title, "Downloading {}", video.title);

        let base_name = match sanitize_filename(&video.title) {
            name if name.is_empty() => video.id.clone(),
            name => name,
        };

        let video_file = self
            .names
            .reserve(&request.output_dir, &base_name, Self::VIDEO_EXT)
            .with_context(|| {
                format!("Failed to pick a file name in {}", request.output_dir.display())
            })?;

        if let Err(e) = self.source.download(&video, stream, video_file.path()) {
            return skip_or_fail(request, e, "Failed to download video");
        }

        let path = match request.mode {
            Mode::Video => video_file.path().to_path_buf(),
            Mode::Audio => {
                self.convert_to_audio(&request.output_dir, &base_name, video_file.path())?
            }
        };

        tracing::info!(title = %video.title, path = %path.display(), "Downloaded {}", video.title);
        Ok(FetchOutcome::Saved {
            title: video.title,
            path,
        })
    }

    /// Extracts the audio of `video_path` next to it, then removes the video
    fn convert_to_audio(
        &self,
        output_dir: &Path,
        base_name: &str,
        video_path: &Path,
    ) -> anyhow::Result<PathBuf> {
        let audio_file = self
            .names
            .reserve(output_dir, base_name, Self::AUDIO_EXT)
            .with_context(|| format!("Failed to pick a file name in {}", output_dir.display()))?;

        self.audio_processor
            .extract_audio(video_path, audio_file.path())
            .inspect_err(|e| tracing::error!(error = ?e, "Failed to extract audio"))
            .with_context(|| format!("Failed to extract audio from {}", video_path.display()))?;

        std::fs::remove_file(video_path).with_context(|| {
            format!("Failed to remove intermediate video {}", video_path.display())
        })?;

        Ok(audio_file.path().to_path_buf())
    }
}

fn skip_or_fail(
    request: &DownloadRequest,
    error: SourceError,
    context: &'static str,
) -> anyhow::Result<FetchOutcome> {
    match error {
        SourceError::Unavailable { reason } => {
            tracing::warn!(%reason, "Video {} is unavailable", request.url);
            Ok(FetchOutcome::Skipped {
                url: request.url.clone(),
                reason,
            })
        }
        e => {
            tracing::error!(error = ?e, "{context}");
            Err(anyhow::Error::new(e).context(format!("{context}: {}", request.url)))
        }
    }
}
