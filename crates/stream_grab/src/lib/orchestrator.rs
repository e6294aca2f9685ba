pub mod builder;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use stream_source::{AudioProcessor, VideoSource};
use tokio::{sync::Semaphore, task::JoinHandle};
use tracing::Instrument;

use crate::{
    yt::{ChannelListing, ChannelScraper},
    DownloadRequest, FetchOutcome, Fetcher, Mode,
};

type FetchHandle = JoinHandle<anyhow::Result<FetchOutcome>>;

/// Outcome of one item of a channel download that was allowed to fail on its own
#[derive(Debug)]
pub struct ItemReport {
    pub url: String,
    pub result: anyhow::Result<FetchOutcome>,
}

/// Drives downloads of single videos or whole channels.
///
/// Orchestration runs on the async runtime, while each fetch is handed to its
/// own blocking worker. The number of workers running at once is capped by
/// `max_concurrent_downloads`, where `0` means no cap.
pub struct DownloadOrchestrator<S, A, C>
where
    S: VideoSource + Send + Sync + 'static,
    A: AudioProcessor + Send + Sync + 'static,
    C: ChannelScraper,
{
    output_dir: PathBuf,
    mode: Mode,
    fetcher: Arc<Fetcher<S, A>>,
    channel_scraper: C,
    limiter: Option<Arc<Semaphore>>,
}

impl<S, A, C> DownloadOrchestrator<S, A, C>
where
    S: VideoSource + Send + Sync + 'static,
    A: AudioProcessor + Send + Sync + 'static,
    C: ChannelScraper,
{
    pub fn new(
        output_dir: impl Into<PathBuf>,
        mode: Mode,
        fetcher: Fetcher<S, A>,
        channel_scraper: C,
        max_concurrent_downloads: usize,
    ) -> Self {
        let limiter =
            (max_concurrent_downloads > 0).then(|| Arc::new(Semaphore::new(max_concurrent_downloads)));

        DownloadOrchestrator {
            output_dir: output_dir.into(),
            mode,
            fetcher: Arc::new(fetcher),
            channel_scraper,
            limiter,
        }
    }

    fn request(&self, url: &str) -> DownloadRequest {
        DownloadRequest::new(url, self.mode, &self.output_dir)
    }

    /// Starts a detached task that waits for a free slot, then runs the fetch
    /// on a blocking worker. The slot stays taken until the worker returns.
    ///
    /// Dropping the handle does not cancel the task, so items still queued on
    /// the limiter get downloaded even after a sibling has failed.
    fn spawn_fetch(&self, request: DownloadRequest) -> FetchHandle {
        let fetcher = Arc::clone(&self.fetcher);
        let limiter = self.limiter.clone();

        let fetch = async move {
            let permit = match limiter {
                Some(limiter) => Some(limiter.acquire_owned().await?),
                None => None,
            };

            let outcome = tokio::task::spawn_blocking(move || {
                let _permit = permit;
                fetcher.fetch(&request)
            })
            .await
            .context("Download worker panicked")??;

            Ok::<_, anyhow::Error>(outcome)
        };

        tokio::spawn(fetch.in_current_span())
    }

    /// Spawns one fetch per url up front, in listing order
    fn spawn_all(&self, urls: Vec<String>) -> Vec<(String, FetchHandle)> {
        urls.into_iter()
            .map(|url| {
                let handle = self.spawn_fetch(self.request(&url));
                (url, handle)
            })
            .collect()
    }

    /// Downloads a single video
    #[tracing::instrument(skip(self))]
    pub async fn download_video(&self, url: &str) -> anyhow::Result<FetchOutcome> {
        join_fetch(self.spawn_fetch(self.request(url))).await
    }

    async fn list_channel(&self, channel_url: &str) -> anyhow::Result<ChannelListing> {
        let listing = self
            .channel_scraper
            .list_videos(channel_url)
            .await
            .inspect_err(|e| tracing::error!(error = ?e, "Failed to list channel videos"))
            .context("Failed to list channel videos")?;

        tracing::info!(count = listing.len(), "Processing channel videos");
        Ok(listing)
    }

    /// Downloads every video of a channel concurrently.
    ///
    /// Resolves once all downloads are done, with outcomes in listing order.
    /// The first failure that is not a skip fails the whole call. Every other
    /// download, running or still queued, carries on in the background and
    /// whatever it writes stays on disk.
    #[tracing::instrument(skip(self))]
    pub async fn download_channel(&self, channel_url: &str) -> anyhow::Result<Vec<FetchOutcome>> {
        let listing = self.list_channel(channel_url).await?;

        let tasks = self
            .spawn_all(listing.urls())
            .into_iter()
            .map(|(_, handle)| join_fetch(handle));

        futures::future::try_join_all(tasks).await
    }

    /// Like [`download_channel`](Self::download_channel), but a failing item
    /// only fails its own report. Errors only if the channel cannot be listed.
    #[tracing::instrument(skip(self))]
    pub async fn download_channel_settled(
        &self,
        channel_url: &str,
    ) -> anyhow::Result<Vec<ItemReport>> {
        let listing = self.list_channel(channel_url).await?;

        let tasks = self
            .spawn_all(listing.urls())
            .into_iter()
            .map(|(url, handle)| async move {
                let result = join_fetch(handle)
                    .await
                    .inspect_err(|e| tracing::error!(error = ?e, %url, "Download failed"));
                ItemReport { url, result }
            });

        Ok(futures::future::join_all(tasks).await)
    }
}

async fn join_fetch(handle: FetchHandle) -> anyhow::Result<FetchOutcome> {
    handle.await.context("Download task panicked")?
}
