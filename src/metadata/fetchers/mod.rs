pub mod instagram;
pub mod tiktok;
pub mod youtube;

use crate::config::ApiCredentials;
use crate::metadata::http::HttpClient;
use crate::metadata::types::{PartialMetadata, ResolveError};
use crate::platform::Platform;

/// A platform's authoritative API lookup for a handle.
pub trait ApiFetcher: Send + Sync {
    /// Query the platform API for `handle` (already normalized).
    ///
    /// Fails with `Configuration` before any request when credentials are
    /// missing, `HttpStatus` on a non-success response, `Parse` on an
    /// unexpected payload and `NotFound` when no entity matches.
    fn fetch(&self, http: &dyn HttpClient, handle: &str) -> Result<PartialMetadata, ResolveError>;

    /// Get the name of this fetcher for logging/debugging
    fn name(&self) -> &'static str;
}

/// One API fetcher per platform.
pub struct FetcherRegistry {
    youtube: youtube::YouTubeFetcher,
    tiktok: tiktok::TikTokFetcher,
    instagram: instagram::InstagramFetcher,
}

impl FetcherRegistry {
    pub fn new(credentials: &ApiCredentials) -> Self {
        Self {
            youtube: youtube::YouTubeFetcher::new(credentials.youtube_api_key.clone()),
            tiktok: tiktok::TikTokFetcher::new(
                credentials.tiktok_api_key.clone(),
                credentials.tiktok_api_host.clone(),
                credentials.tiktok_api_endpoint.clone(),
            ),
            instagram: instagram::InstagramFetcher::new(credentials.instagram_graph_api_token.clone()),
        }
    }

    pub fn for_platform(&self, platform: Platform) -> &dyn ApiFetcher {
        match platform {
            Platform::Youtube => &self.youtube,
            Platform::Tiktok => &self.tiktok,
            Platform::Instagram => &self.instagram,
        }
    }
}

/// Builds `base?k=v&...`, keeping any query already present on `base`.
pub(crate) fn url_with_params(base: &str, params: &[(&str, &str)]) -> Result<String, ResolveError> {
    let mut url = url::Url::parse(base).map_err(|e| ResolveError::Configuration(format!("invalid endpoint {base:?}: {e}")))?;
    url.query_pairs_mut().extend_pairs(params);
    Ok(url.to_string())
}

/// Trimmed, non-empty string or nothing.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
