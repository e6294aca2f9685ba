//! # Stream Source
//!
//! This crate wraps the external tools used to pull media off YouTube:
//! `yt-dlp` resolves a watch URL into its title and available formats and
//! downloads a chosen format, while `ffmpeg` extracts the audio track from a
//! downloaded video.
//!
//! Both tools are reached through the [`VideoSource`] and [`AudioProcessor`]
//! traits so callers can swap them out in tests.

mod domain;
mod error;
mod source;

pub use domain::{StreamFormat, Video};
pub use error::SourceError;
pub use source::ffmpeg::Ffmpeg;
pub use source::ytdlp::YtDlp;
pub use source::{AudioProcessor, VideoSource};
