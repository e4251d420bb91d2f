use crate::metadata::fetchers::{non_empty, url_with_params, ApiFetcher};
use crate::metadata::http::{expect_json, HttpClient};
use crate::metadata::types::{PartialMetadata, ResolveError};
use crate::platform::Platform;
use serde::Deserialize;

const OEMBED_URL: &str = "https://graph.facebook.com/v17.0/instagram_oembed";

#[derive(Debug, Clone, Deserialize)]
struct OembedResponse {
    author_url: Option<String>,
    thumbnail_url: Option<String>,
}

/// Graph API oEmbed lookup for a profile.
pub struct InstagramFetcher {
    access_token: Option<String>,
}

impl InstagramFetcher {
    pub fn new(access_token: Option<String>) -> Self {
        Self { access_token }
    }
}

impl ApiFetcher for InstagramFetcher {
    fn fetch(&self, http: &dyn HttpClient, handle: &str) -> Result<PartialMetadata, ResolveError> {
        let token = self
            .access_token
            .as_deref()
            .ok_or_else(|| ResolveError::Configuration("INSTAGRAM_GRAPH_API_TOKEN is not set".into()))?;

        let profile_url = Platform::Instagram.default_url(handle);
        let oembed_url = url_with_params(OEMBED_URL, &[("url", profile_url.as_str()), ("access_token", token)])?;
        let oembed: OembedResponse = expect_json(http.get(&oembed_url, &[])?)?;

        Ok(PartialMetadata {
            url: Some(non_empty(oembed.author_url).unwrap_or(profile_url)),
            profile_image: non_empty(oembed.thumbnail_url),
        })
    }

    fn name(&self) -> &'static str {
        "Instagram"
    }
}
