use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Youtube,
    Tiktok,
    Instagram,
}

pub const ALL_PLATFORMS: [Platform; 3] = [Platform::Youtube, Platform::Tiktok, Platform::Instagram];

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Youtube => "youtube",
            Platform::Tiktok => "tiktok",
            Platform::Instagram => "instagram",
        }
    }

    /// Profile URL built straight from the handle. Also the scrape target.
    pub fn default_url(&self, handle: &str) -> String {
        match self {
            Platform::Youtube => format!("https://www.youtube.com/@{handle}"),
            Platform::Tiktok => format!("https://www.tiktok.com/@{handle}"),
            Platform::Instagram => format!("https://www.instagram.com/{handle}/"),
        }
    }

    pub fn scrape_target(&self, handle: &str) -> String {
        self.default_url(handle)
    }

    /// Synthesized avatar used when nothing better is known.
    pub fn default_profile_image(&self, handle: &str) -> String {
        format!("https://unavatar.io/{}/{handle}", self.as_str())
    }

    pub fn homepage(&self) -> &'static str {
        match self {
            Platform::Youtube => "https://www.youtube.com/",
            Platform::Tiktok => "https://www.tiktok.com/",
            Platform::Instagram => "https://www.instagram.com/",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "youtube" => Ok(Platform::Youtube),
            "tiktok" => Ok(Platform::Tiktok),
            "instagram" => Ok(Platform::Instagram),
            other => anyhow::bail!("unknown platform {other:?}"),
        }
    }
}

/// Trim, drop one leading `@`, trim again. Case is preserved.
pub fn normalize_handle(handle: &str) -> String {
    let trimmed = handle.trim();
    trimmed.strip_prefix('@').unwrap_or(trimmed).trim().to_string()
}

/// Listing filter: `None` for a missing value or `all`.
pub fn parse_platform_filter(value: Option<&str>) -> anyhow::Result<Option<Platform>> {
    match value.map(str::trim) {
        None | Some("") | Some("all") => Ok(None),
        Some(name) => name.parse::<Platform>().map(Some),
    }
}
