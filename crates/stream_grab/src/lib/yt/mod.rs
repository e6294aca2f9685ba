pub mod scraper;

use std::{future::Future, ops::Deref};

use itertools::Itertools;

pub trait ChannelScraper {
    /// Enumerates every video on the channel at `channel_url`
    fn list_videos(&self, channel_url: &str) -> impl Future<Output = anyhow::Result<ChannelListing>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelEntry {
    pub video_id: String,
    pub title: String,
}

impl ChannelEntry {
    const WATCH_URL: &str = "https://www.youtube.com/watch";

    pub fn new(video_id: impl Into<String>, title: impl Into<String>) -> Self {
        ChannelEntry {
            video_id: video_id.into(),
            title: title.into(),
        }
    }

    pub fn watch_url(&self) -> String {
        format!("{}?v={}", Self::WATCH_URL, self.video_id)
    }
}

/// The videos of one channel, in page order with duplicates removed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelListing(Vec<ChannelEntry>);

impl ChannelListing {
    pub fn urls(&self) -> Vec<String> {
        self.0.iter().map(ChannelEntry::watch_url).collect()
    }
}

impl Deref for ChannelListing {
    type Target = [ChannelEntry];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromIterator<ChannelEntry> for ChannelListing {
    fn from_iter<I: IntoIterator<Item = ChannelEntry>>(iter: I) -> Self {
        // pinned videos show up again further down the grid
        ChannelListing(
            iter.into_iter()
                .unique_by(|entry| entry.video_id.clone())
                .collect(),
        )
    }
}
