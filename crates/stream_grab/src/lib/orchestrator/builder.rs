use std::path::PathBuf;

use stream_source::{AudioProcessor, VideoSource};

use crate::{yt::ChannelScraper, DownloadOrchestrator, Fetcher, Mode};

pub struct DownloadOrchestratorBuilder<S = (), A = (), C = ()> {
    output_dir: PathBuf,
    video_source: S,
    audio_processor: A,
    channel_scraper: C,
    mode: Mode,
    max_concurrent_downloads: usize,
}

impl DownloadOrchestratorBuilder {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            video_source: (),
            audio_processor: (),
            channel_scraper: (),
            mode: Mode::default(),
            max_concurrent_downloads: 4,
        }
    }
}

impl<S, A, C> DownloadOrchestratorBuilder<S, A, C> {
    pub fn video_source<S2: VideoSource + Send + Sync + 'static>(
        self,
        video_source: S2,
    ) -> DownloadOrchestratorBuilder<S2, A, C> {
        DownloadOrchestratorBuilder {
            output_dir: self.output_dir,
            video_source,
            audio_processor: self.audio_processor,
            channel_scraper: self.channel_scraper,
            mode: self.mode,
            max_concurrent_downloads: self.max_concurrent_downloads,
        }
    }

    pub fn audio_processor<A2: AudioProcessor + Send + Sync + 'static>(
        self,
        audio_processor: A2,
    ) -> DownloadOrchestratorBuilder<S, A2, C> {
        DownloadOrchestratorBuilder {
            output_dir: self.output_dir,
            video_source: self.video_source,
            audio_processor,
            channel_scraper: self.channel_scraper,
            mode: self.mode,
            max_concurrent_downloads: self.max_concurrent_downloads,
        }
    }

    pub fn channel_scraper<C2: ChannelScraper>(
        self,
        channel_scraper: C2,
    ) -> DownloadOrchestratorBuilder<S, A, C2> {
        DownloadOrchestratorBuilder {
            output_dir: self.output_dir,
            video_source: self.video_source,
            audio_processor: self.audio_processor,
            channel_scraper,
            mode: self.mode,
            max_concurrent_downloads: self.max_concurrent_downloads,
        }
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Caps how many downloads run at once; `0` lifts the cap
    pub fn max_concurrent_downloads(mut self, max_concurrent_downloads: usize) -> Self {
        self.max_concurrent_downloads = max_concurrent_downloads;
        self
    }
}

impl<S, A, C> DownloadOrchestratorBuilder<S, A, C>
where
    S: VideoSource + Send + Sync + 'static,
    A: AudioProcessor + Send + Sync + 'static,
    C: ChannelScraper,
{
    pub fn build(self) -> DownloadOrchestrator<S, A, C> {
        DownloadOrchestrator::new(
            self.output_dir,
            self.mode,
            Fetcher::new(self.video_source, self.audio_processor),
            self.channel_scraper,
            self.max_concurrent_downloads,
        )
    }
}
