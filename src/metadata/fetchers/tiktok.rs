use crate::metadata::fetchers::{non_empty, url_with_params, ApiFetcher};
use crate::metadata::http::{expect_json, HttpClient};
use crate::metadata::types::{PartialMetadata, ResolveError};
use serde::Deserialize;

#[derive(Debug, Deserialize, Default)]
struct UserInfoResponse {
    data: Option<UserInfoData>,
    user: Option<TikTokUser>,
}

#[derive(Debug, Deserialize, Default)]
struct UserInfoData {
    user: Option<TikTokUser>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct TikTokUser {
    unique_id: Option<String>,
    avatar_larger: Option<String>,
    avatar_medium: Option<String>,
    avatar_thumb: Option<String>,
}

impl TikTokUser {
    fn avatar(&mut self) -> Option<String> {
        non_empty(self.avatar_larger.take())
            .or_else(|| non_empty(self.avatar_medium.take()))
            .or_else(|| non_empty(self.avatar_thumb.take()))
    }
}

impl UserInfoResponse {
    /// Users in lookup order: nested under `data` first, then top level.
    fn users(self) -> Vec<TikTokUser> {
        self.data.and_then(|d| d.user).into_iter().chain(self.user).collect()
    }
}

/// User lookup through a RapidAPI-style TikTok proxy.
pub struct TikTokFetcher {
    api_key: Option<String>,
    api_host: Option<String>,
    endpoint: Option<String>,
}

impl TikTokFetcher {
    pub fn new(api_key: Option<String>, api_host: Option<String>, endpoint: Option<String>) -> Self {
        Self {
            api_key,
            api_host,
            endpoint,
        }
    }

    fn endpoint(&self, api_host: &str) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| format!("https://{api_host}/user/info"))
    }
}

impl ApiFetcher for TikTokFetcher {
    fn fetch(&self, http: &dyn HttpClient, handle: &str) -> Result<PartialMetadata, ResolveError> {
        let (api_key, api_host) = match (self.api_key.as_deref(), self.api_host.as_deref()) {
            (Some(key), Some(host)) => (key, host),
            _ => {
                return Err(ResolveError::Configuration(
                    "TIKTOK_API_KEY and TIKTOK_API_HOST must both be set".into(),
                ))
            }
        };

        let url = url_with_params(&self.endpoint(api_host), &[("unique_id", handle)])?;
        let resp = http.get(&url, &[("X-RapidAPI-Key", api_key), ("X-RapidAPI-Host", api_host)])?;
        let payload: UserInfoResponse = expect_json(resp)?;

        // Some proxies nest the user under `data`, others return it at the top level
        // or both. Each field is taken from the first user that carries it.
        let mut users = payload.users();
        if users.is_empty() {
            return Err(ResolveError::NotFound(format!("no TikTok user in response for {handle:?}")));
        }

        let username = users
            .iter_mut()
            .find_map(|u| non_empty(u.unique_id.take()))
            .unwrap_or_else(|| handle.to_string());
        let avatar = users.iter_mut().find_map(TikTokUser::avatar);

        Ok(PartialMetadata {
            url: Some(format!("https://www.tiktok.com/@{username}")),
            profile_image: avatar,
        })
    }

    fn name(&self) -> &'static str {
        "TikTok"
    }
}
