//! # Yt Parser
//!
//! This module extracts the video grid of a YouTube channel's "Videos" tab,
//! both from the initial html page and from the continuation pages the web
//! client requests as the user scrolls.

use std::{ops::Deref, sync::LazyLock};

use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    error::Error,
    types::{InnertubeConfig, LockupViewModel, VideoRenderer},
    yt::ChannelEntry,
};

static YT_INTIALDATA_RE: LazyLock<Regex> = LazyLock::new(|| {
    regex::Regex::new(r"(?s)<script[^>]*>\s*var\s+ytInitialData\s*=\s*(\{.*?\});\s*</script>")
        .unwrap()
});

static CLIENT_VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    regex::Regex::new(r#""INNERTUBE_CLIENT_VERSION"\s*:\s*"([^"]+)""#).unwrap()
});

static API_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| regex::Regex::new(r#""INNERTUBE_API_KEY"\s*:\s*"([^"]+)""#).unwrap());

const CONTINUATION_TOKEN_PTR: &str = "/continuationItemRenderer/continuationEndpoint/continuationCommand/token";

/// One page of a channel's video grid
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ChannelPage {
    pub entries: Vec<ChannelEntry>,
    /// Token for the next page, if the grid goes on
    pub continuation: Option<String>,
}

/// Parses the first page of the video grid from a channel page's `ytInitialData`.
///
/// # Parameters
/// * `json`: The `ytInitialData` object of a channel's "Videos" tab.
///
/// # Returns
/// * `Ok(ChannelPage)` with the videos on the page and the continuation token, if any.
/// * `Err(Error::ParseError)` if no tab carries a video grid.
#[tracing::instrument(skip(json))]
pub fn parse_channel_page(json: &Value) -> Result<ChannelPage, Error> {
    let tabs = json["contents"]["twoColumnBrowseResultsRenderer"]["tabs"]
        .as_array()
        .ok_or(Error::ParseError(
            "Failed to get ytInitialData['contents']['twoColumnBrowseResultsRenderer']['tabs']",
        ))?;

    let items = tabs
        .iter()
        .find_map(|tab| tab["tabRenderer"]["content"]["richGridRenderer"]["contents"].as_array())
        .ok_or(Error::ParseError(
            "Failed to find a tab with a richGridRenderer, structure might have changed",
        ))?;

    parse_grid_items(items)
}

/// Parses a `youtubei/v1/browse` continuation response.
///
/// A response without continuation items is the end of the grid and yields an
/// empty page.
#[tracing::instrument(skip(json))]
pub fn parse_continuation(json: &Value) -> Result<ChannelPage, Error> {
    let Some(actions) = json["onResponseReceivedActions"].as_array() else {
        return Ok(ChannelPage::default());
    };

    let items = actions
        .iter()
        .filter_map(|action| {
            action["appendContinuationItemsAction"]["continuationItems"]
                .as_array()
                .or_else(|| action["reloadContinuationItemsCommand"]["continuationItems"].as_array())
        })
        .flatten()
        .cloned()
        .collect::<Vec<_>>();

    parse_grid_items(&items)
}

fn parse_grid_items(items: &[Value]) -> Result<ChannelPage, Error> {
    let mut page = ChannelPage::default();

    for item in items {
        let content = &item["richItemRenderer"]["content"];

        if let Some(video_renderer) = content.get("videoRenderer") {
            let VideoRenderer { video_id, title } =
                serde_json::from_value::<VideoRenderer>(video_renderer.clone())?;
            let title = title
                .runs
                .into_iter()
                .next()
                .map(|run| run.text)
                .unwrap_or_default();
            page.entries.push(ChannelEntry::new(video_id, title));
        } else if let Some(lockup) = content.get("lockupViewModel") {
            let lockup = serde_json::from_value::<LockupViewModel>(lockup.clone())?;
            // playlists and mixes share the view model
            if lockup
                .content_type
                .as_deref()
                .is_some_and(|t| t != "LOCKUP_CONTENT_TYPE_VIDEO")
            {
                continue;
            }
            let title = lockup
                .metadata
                .and_then(|m| m.lockup_metadata_view_model)
                .and_then(|m| m.title)
                .map(|t| t.content)
                .unwrap_or_default();
            page.entries.push(ChannelEntry::new(lockup.content_id, title));
        } else if let Some(token) = item.pointer(CONTINUATION_TOKEN_PTR).and_then(Value::as_str) {
            page.continuation = Some(token.to_string());
        }
    }

    Ok(page)
}

/// Maps any channel URL to its "Videos" tab
pub fn videos_tab_url(channel_url: &str) -> String {
    const TABS: &[&str] = &[
        "featured",
        "streams",
        "shorts",
        "playlists",
        "community",
        "about",
    ];

    let base = channel_url
        .split(['?', '#'])
        .next()
        .unwrap_or(channel_url)
        .trim_end_matches('/');

    if base.ends_with("/videos") {
        return base.to_string();
    }

    match base.rsplit_once('/') {
        Some((parent, tab)) if TABS.contains(&tab) => format!("{parent}/videos"),
        _ => format!("{base}/videos"),
    }
}

pub struct YtHtmlDocument(String);

impl Deref for YtHtmlDocument {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl YtHtmlDocument {
    pub fn new(doc: String) -> Self {
        YtHtmlDocument(doc)
    }

    pub fn to_json<T>(&self) -> Result<T, crate::error::Error>
    where
        T: DeserializeOwned,
    {
        YT_INTIALDATA_RE
            .captures(self)
            .and_then(|cap| cap.get(1))
            .and_then(|m| serde_json::from_str(m.as_str()).ok())
            .ok_or(Error::ParseError(
                "Failed to extract ytInitialData from the page's script tag",
            ))
    }

    /// The web client identity embedded in the page, `None` if the page has no `ytcfg`
    pub fn innertube_config(&self) -> Option<InnertubeConfig> {
        let client_version = CLIENT_VERSION_RE.captures(self)?.get(1)?.as_str().to_string();
        let api_key = API_KEY_RE
            .captures(self)
            .and_then(|cap| cap.get(1))
            .map(|m| m.as_str().to_string());

        Some(InnertubeConfig {
            api_key,
            client_version,
        })
    }
}

impl From<String> for YtHtmlDocument {
    fn from(value: String) -> Self {
        YtHtmlDocument(value)
    }
}
