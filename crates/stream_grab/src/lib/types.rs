//! Shapes of the YouTube web client payloads this crate reads and writes.

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRenderer {
    pub video_id: String,
    #[serde(default)]
    pub title: Runs,
}

#[derive(Debug, Default, Deserialize)]
pub struct Runs {
    #[serde(default)]
    pub runs: Vec<Run>,
}

#[derive(Debug, Deserialize)]
pub struct Run {
    pub text: String,
}

/// Newer channel grids wrap each video in a `lockupViewModel` instead of a `videoRenderer`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockupViewModel {
    pub content_id: String,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub metadata: Option<LockupMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockupMetadata {
    pub lockup_metadata_view_model: Option<LockupMetadataViewModel>,
}

#[derive(Debug, Deserialize)]
pub struct LockupMetadataViewModel {
    pub title: Option<LockupTitle>,
}

#[derive(Debug, Deserialize)]
pub struct LockupTitle {
    pub content: String,
}

/// Client identity scraped from a channel page, needed to request further pages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InnertubeConfig {
    pub api_key: Option<String>,
    pub client_version: String,
}

/// Body of a `youtubei/v1/browse` continuation request
#[derive(Debug, Serialize)]
pub struct BrowseRequest<'a> {
    pub context: InnertubeContext<'a>,
    pub continuation: &'a str,
}

#[derive(Debug, Serialize)]
pub struct InnertubeContext<'a> {
    pub client: InnertubeClient<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InnertubeClient<'a> {
    pub client_name: &'a str,
    pub client_version: &'a str,
    pub hl: &'a str,
}

impl<'a> BrowseRequest<'a> {
    pub fn continuation(config: &'a InnertubeConfig, token: &'a str) -> Self {
        BrowseRequest {
            context: InnertubeContext {
                client: InnertubeClient {
                    client_name: "WEB",
                    client_version: &config.client_version,
                    hl: "en",
                },
            },
            continuation: token,
        }
    }
}
