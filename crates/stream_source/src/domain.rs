use itertools::Itertools;
use serde::Deserialize;

/// A watch URL resolved against the platform.
///
/// Deserializes straight from the `--dump-json` output of yt-dlp; every field
/// we do not use is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Video {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub formats: Vec<StreamFormat>,
}

/// One encoded representation of a video offered by the platform.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StreamFormat {
    pub format_id: String,
    pub ext: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub vcodec: Option<String>,
    #[serde(default)]
    pub acodec: Option<String>,
    /// Total bitrate in KBit/s
    #[serde(default)]
    pub tbr: Option<f64>,
}

impl StreamFormat {
    pub fn has_video(&self) -> bool {
        has_codec(self.vcodec.as_deref())
    }

    pub fn has_audio(&self) -> bool {
        has_codec(self.acodec.as_deref())
    }

    /// Carries both a video and an audio track, so needs no merging
    pub fn is_progressive(&self) -> bool {
        self.has_video() && self.has_audio()
    }
}

// yt-dlp reports a missing track as the literal "none"
fn has_codec(codec: Option<&str>) -> bool {
    matches!(codec, Some(c) if !c.is_empty() && c != "none")
}

impl Video {
    /// Progressive formats in the given container, lowest resolution first
    pub fn progressive_formats(&self, ext: &str) -> impl Iterator<Item = &StreamFormat> {
        self.formats
            .iter()
            .filter(|f| f.ext == ext && f.is_progressive())
            .sorted_by(|a, b| {
                a.height
                    .cmp(&b.height)
                    .then(a.tbr.unwrap_or_default().total_cmp(&b.tbr.unwrap_or_default()))
            })
    }

    /// Picks the highest resolution progressive format in the given container.
    /// Bitrate breaks ties between formats of the same height.
    pub fn best_stream(&self, ext: &str) -> Option<&StreamFormat> {
        self.progressive_formats(ext).last()
    }
}
