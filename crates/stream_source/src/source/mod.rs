use std::path::Path;

use crate::{SourceError, StreamFormat, Video};

pub mod ffmpeg;
pub mod ytdlp;

/// Resolves and downloads content from the video platform.
///
/// Both operations block until the underlying transfer is done; async callers
/// are expected to run them on a blocking worker.
pub trait VideoSource {
    fn resolve(&self, url: &str) -> Result<Video, SourceError>;

    /// Writes `stream` of `video` to `dest`, which must not exist yet
    fn download(&self, video: &Video, stream: &StreamFormat, dest: &Path)
        -> Result<(), SourceError>;
}

pub trait AudioProcessor {
    /// Extracts the audio track of `src` into an mp3 at `dest`, which must not exist yet
    fn extract_audio(&self, src: &Path, dest: &Path) -> Result<(), SourceError>;
}
