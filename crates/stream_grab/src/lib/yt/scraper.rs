use std::{collections::HashSet, ops::Deref};

use anyhow::Context;
use serde_json::Value;

use crate::{
    parser::{parse_channel_page, parse_continuation, videos_tab_url, ChannelPage, YtHtmlDocument},
    types::{BrowseRequest, InnertubeConfig},
    yt::{ChannelListing, ChannelScraper},
};

#[derive(Default)]
pub struct Scraper(pub reqwest::Client);

impl Deref for Scraper {
    type Target = reqwest::Client;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Scraper {
    const BROWSE_URL: &str = "https://www.youtube.com/youtubei/v1/browse";

    async fn fetch_page(&self, url: &str) -> anyhow::Result<YtHtmlDocument> {
        let yt_html_document = self
            .get(url)
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(yt_html_document.into())
    }

    async fn fetch_continuation(
        &self,
        config: &InnertubeConfig,
        token: &str,
    ) -> anyhow::Result<Value> {
        let mut request = self
            .post(Self::BROWSE_URL)
            .query(&[("prettyPrint", "false")])
            .header("Accept-Language", "en-US,en;q=0.9");
        if let Some(key) = &config.api_key {
            request = request.query(&[("key", key)]);
        }

        let json = request
            .json(&BrowseRequest::continuation(config, token))
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;

        Ok(json)
    }
}

impl ChannelScraper for Scraper {
    #[tracing::instrument(skip(self))]
    async fn list_videos(&self, channel_url: &str) -> anyhow::Result<ChannelListing> {
        let url = videos_tab_url(channel_url);
        let doc = self
            .fetch_page(&url)
            .await
            .with_context(|| format!("Failed to load channel page {url}"))?;

        let json = doc.to_json::<Value>()?;
        let ChannelPage {
            mut entries,
            mut continuation,
        } = parse_channel_page(&json)?;

        let config = doc.innertube_config();
        let mut seen_tokens = HashSet::new();

        while let Some(token) = continuation.take() {
            let Some(config) = &config else {
                tracing::warn!("Channel page has no client config, listing only the first page");
                break;
            };
            if !seen_tokens.insert(token.clone()) {
                tracing::warn!("Continuation token repeated, stopping pagination");
                break;
            }

            let json = self
                .fetch_continuation(config, &token)
                .await
                .context("Failed to load next page of channel videos")?;
            let page = parse_continuation(&json)?;
            tracing::debug!(count = page.entries.len(), "Fetched channel page");

            entries.extend(page.entries);
            continuation = page.continuation;
        }

        Ok(entries.into_iter().collect())
    }
}
