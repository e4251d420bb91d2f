use crate::metadata::fetchers::{non_empty, url_with_params, ApiFetcher};
use crate::metadata::http::{expect_json, HttpClient};
use crate::metadata::types::{PartialMetadata, ResolveError};
use serde::Deserialize;

const SEARCH_URL: &str = "https://www.googleapis.com/youtube/v3/search";
const CHANNELS_URL: &str = "https://www.googleapis.com/youtube/v3/channels";

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    #[serde(default)]
    items: Vec<T>,
}

#[derive(Debug, Deserialize, Default)]
struct SearchItem {
    #[serde(default)]
    id: SearchItemId,
    #[serde(default)]
    snippet: SearchSnippet,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    channel_id: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct SearchSnippet {
    channel_id: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct ChannelItem {
    #[serde(default)]
    snippet: ChannelSnippet,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ChannelSnippet {
    custom_url: Option<String>,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Deserialize, Default)]
struct Thumbnails {
    high: Option<Thumbnail>,
    medium: Option<Thumbnail>,
    default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: Option<String>,
}

impl Thumbnails {
    /// Highest resolution available, falling back to smaller renditions.
    fn best(self) -> Option<String> {
        [self.high, self.medium, self.default]
            .into_iter()
            .flatten()
            .find_map(|t| non_empty(t.url))
    }
}

pub struct YouTubeFetcher {
    api_key: Option<String>,
}

impl YouTubeFetcher {
    pub fn new(api_key: Option<String>) -> Self {
        Self { api_key }
    }

    fn search_channel_id(http: &dyn HttpClient, api_key: &str, handle: &str) -> Result<String, ResolveError> {
        let search_url = url_with_params(
            SEARCH_URL,
            &[
                ("part", "snippet"),
                ("type", "channel"),
                ("q", handle),
                ("maxResults", "1"),
                ("key", api_key),
            ],
        )?;

        let search: ListResponse<SearchItem> = expect_json(http.get(&search_url, &[])?)?;
        search
            .items
            .into_iter()
            .next()
            .and_then(|item| non_empty(item.id.channel_id).or_else(|| non_empty(item.snippet.channel_id)))
            .ok_or_else(|| ResolveError::NotFound(format!("no YouTube channel matches {handle:?}")))
    }

    fn channel_url(channel_id: &str, custom_url: Option<String>) -> String {
        match non_empty(custom_url) {
            Some(custom) if custom.starts_with('@') => format!("https://www.youtube.com/{custom}"),
            Some(custom) => format!("https://www.youtube.com/@{custom}"),
            None => format!("https://www.youtube.com/channel/{channel_id}"),
        }
    }
}

impl ApiFetcher for YouTubeFetcher {
    fn fetch(&self, http: &dyn HttpClient, handle: &str) -> Result<PartialMetadata, ResolveError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ResolveError::Configuration("YOUTUBE_API_KEY is not set".into()))?;

        let channel_id = Self::search_channel_id(http, api_key, handle)?;
        log::debug!("youtube handle={handle} channel_id={channel_id}");

        let channels_url = url_with_params(
            CHANNELS_URL,
            &[("part", "snippet"), ("id", channel_id.as_str()), ("key", api_key)],
        )?;
        let channels: ListResponse<ChannelItem> = expect_json(http.get(&channels_url, &[])?)?;
        let snippet = channels.items.into_iter().next().map(|c| c.snippet).unwrap_or_default();

        Ok(PartialMetadata {
            url: Some(Self::channel_url(&channel_id, snippet.custom_url)),
            profile_image: snippet.thumbnails.best(),
        })
    }

    fn name(&self) -> &'static str {
        "YouTube"
    }
}
