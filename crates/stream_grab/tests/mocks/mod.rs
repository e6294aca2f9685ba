#![allow(dead_code)]

pub mod audio_processor;
pub mod channel_scraper;
pub mod video_source;

pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={video_id}")
}
