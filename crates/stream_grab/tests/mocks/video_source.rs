use std::{
    collections::HashMap,
    fs::OpenOptions,
    io::{self, Write},
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};
use stream_source::{SourceError, StreamFormat, Video, VideoSource};

use super::watch_url;

#[derive(Clone)]
pub enum MockVideo {
    Available { title: String },
    /// Resolves, but only offers a webm stream
    WebmOnly { title: String },
    Unavailable,
    /// Resolves, then gets pulled while downloading
    UnavailableOnDownload { title: String },
    Failing(String),
}

#[derive(Clone, Default)]
pub struct MockVideoSource {
    pub videos: HashMap<String, MockVideo>,
    pub download_delay: Duration,
    pub resolve_calls: Arc<Mutex<Vec<String>>>,
    pub download_calls: Arc<Mutex<Vec<PathBuf>>>,
    pub in_flight: Arc<AtomicUsize>,
    pub max_in_flight: Arc<AtomicUsize>,
}

impl MockVideoSource {
    pub fn with_video(mut self, url: &str, title: &str) -> Self {
        self.videos.insert(
            url.to_string(),
            MockVideo::Available {
                title: title.to_string(),
            },
        );
        self
    }

    pub fn with_webm_only(mut self, url: &str, title: &str) -> Self {
        self.videos.insert(
            url.to_string(),
            MockVideo::WebmOnly {
                title: title.to_string(),
            },
        );
        self
    }

    pub fn with_unavailable(mut self, url: &str) -> Self {
        self.videos.insert(url.to_string(), MockVideo::Unavailable);
        self
    }

    pub fn with_unavailable_on_download(mut self, url: &str, title: &str) -> Self {
        self.videos.insert(
            url.to_string(),
            MockVideo::UnavailableOnDownload {
                title: title.to_string(),
            },
        );
        self
    }

    pub fn with_failure(mut self, url: &str, msg: &str) -> Self {
        self.videos
            .insert(url.to_string(), MockVideo::Failing(msg.to_string()));
        self
    }

    pub fn with_download_delay(mut self, delay: Duration) -> Self {
        self.download_delay = delay;
        self
    }
}

fn stream(ext: &str) -> StreamFormat {
    StreamFormat {
        format_id: "22".to_string(),
        ext: ext.to_string(),
        width: Some(1280),
        height: Some(720),
        vcodec: Some("avc1.64001F".to_string()),
        acodec: Some("mp4a.40.2".to_string()),
        tbr: Some(1200.0),
    }
}

impl VideoSource for MockVideoSource {
    fn resolve(&self, url: &str) -> Result<Video, SourceError> {
        self.resolve_calls.lock().unwrap().push(url.to_string());

        let (title, ext) = match self.videos.get(url) {
            Some(MockVideo::Available { title }) => (title.clone(), "mp4"),
            Some(MockVideo::WebmOnly { title }) => (title.clone(), "webm"),
            Some(MockVideo::UnavailableOnDownload { title }) => (title.clone(), "mp4"),
            Some(MockVideo::Unavailable) => {
                return Err(SourceError::Unavailable {
                    reason: format!("{url}: Video unavailable"),
                })
            }
            Some(MockVideo::Failing(msg)) => return Err(SourceError::Io(io::Error::other(msg.clone()))),
            None => return Err(SourceError::Io(io::Error::other(format!("unknown url {url}")))),
        };

        Ok(Video {
            id: url.rsplit('=').next().unwrap_or(url).to_string(),
            title,
            formats: vec![stream(ext)],
        })
    }

    fn download(
        &self,
        video: &Video,
        _stream: &StreamFormat,
        dest: &Path,
    ) -> Result<(), SourceError> {
        let pulled = matches!(
            self.videos.get(&watch_url(&video.id)),
            Some(MockVideo::UnavailableOnDownload { .. })
        );
        if pulled {
            self.download_calls.lock().unwrap().push(dest.to_path_buf());
            return Err(SourceError::Unavailable {
                reason: "This video has been removed by the uploader".to_string(),
            });
        }

        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);

        std::thread::sleep(self.download_delay);
        self.download_calls.lock().unwrap().push(dest.to_path_buf());

        // create_new: writing over an existing file is a naming bug
        let result = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(dest)
            .and_then(|mut file| file.write_all(b"video-bytes"));

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result.map_err(SourceError::from)
    }
}
