use std::sync::{Arc, Mutex};
use stream_grab::yt::{ChannelEntry, ChannelListing, ChannelScraper};

#[derive(Clone, Default)]
pub struct MockChannelScraper {
    pub entries: Vec<ChannelEntry>,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<String>,
}

impl MockChannelScraper {
    pub fn new(video_ids: &[&str]) -> Self {
        Self {
            entries: video_ids
                .iter()
                .map(|id| ChannelEntry::new(*id, format!("title of {id}")))
                .collect(),
            ..Default::default()
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Default::default()
        }
    }
}

impl ChannelScraper for MockChannelScraper {
    async fn list_videos(&self, channel_url: &str) -> anyhow::Result<ChannelListing> {
        self.calls.lock().unwrap().push(channel_url.to_string());
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }
        Ok(self.entries.iter().cloned().collect())
    }
}
