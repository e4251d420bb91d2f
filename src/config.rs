use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const REQUEST_TIMEOUT_SECS: u64 = 10;
const PROBE_TIMEOUT_SECS: u64 = 5;

/// Some platforms block default client identifiers, so we present a desktop browser.
pub const USER_AGENT_DEFAULT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36";

const MAX_ENRICHED_CHANNELS: usize = 100;
const ENRICH_PARALLELISM: usize = 16;
const DEFAULT_PER_PAGE: usize = 50;
const MAX_PER_PAGE: usize = 200;

const LISTEN_DEFAULT: &str = "0.0.0.0:8080";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Timeout for page scrapes and platform API calls
    #[serde(default = "request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Timeout for reachability probes
    #[serde(default = "probe_timeout_secs")]
    pub probe_timeout_secs: u64,

    #[serde(default = "user_agent")]
    pub user_agent: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
            probe_timeout_secs: PROBE_TIMEOUT_SECS,
            user_agent: USER_AGENT_DEFAULT.to_string(),
        }
    }
}

impl ResolverConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}

fn request_timeout_secs() -> u64 {
    REQUEST_TIMEOUT_SECS
}

fn probe_timeout_secs() -> u64 {
    PROBE_TIMEOUT_SECS
}

fn user_agent() -> String {
    USER_AGENT_DEFAULT.to_string()
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ListingConfig {
    /// Upper bound on channels enriched per listing request
    #[serde(default = "max_enriched_channels")]
    pub max_enriched_channels: usize,

    /// Worker threads used to fan out resolutions
    #[serde(default = "enrich_parallelism")]
    pub enrich_parallelism: usize,

    #[serde(default = "default_per_page")]
    pub default_per_page: usize,

    #[serde(default = "max_per_page")]
    pub max_per_page: usize,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            max_enriched_channels: MAX_ENRICHED_CHANNELS,
            enrich_parallelism: ENRICH_PARALLELISM,
            default_per_page: DEFAULT_PER_PAGE,
            max_per_page: MAX_PER_PAGE,
        }
    }
}

fn max_enriched_channels() -> usize {
    MAX_ENRICHED_CHANNELS
}

fn enrich_parallelism() -> usize {
    ENRICH_PARALLELISM
}

fn default_per_page() -> usize {
    DEFAULT_PER_PAGE
}

fn max_per_page() -> usize {
    MAX_PER_PAGE
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "listen")]
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { listen: listen() }
    }
}

fn listen() -> String {
    LISTEN_DEFAULT.to_string()
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub listing: ListingConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl Config {
    fn validate(&self) -> anyhow::Result<()> {
        let resolver = &self.resolver;
        if resolver.request_timeout_secs == 0 {
            bail!("resolver.request_timeout_secs must be greater than 0");
        }
        if resolver.probe_timeout_secs == 0 {
            bail!("resolver.probe_timeout_secs must be greater than 0");
        }
        if resolver.user_agent.trim().is_empty() {
            bail!("resolver.user_agent must not be empty");
        }

        let listing = &self.listing;
        if listing.enrich_parallelism == 0 {
            bail!("listing.enrich_parallelism must be greater than 0");
        }
        if listing.default_per_page == 0 || listing.max_per_page == 0 {
            bail!("listing page sizes must be greater than 0");
        }
        if listing.default_per_page > listing.max_per_page {
            bail!(
                "listing.default_per_page ({}) exceeds listing.max_per_page ({})",
                listing.default_per_page,
                listing.max_per_page
            );
        }

        Ok(())
    }

    /// Loads a YAML config. A missing file means defaults.
    pub fn load_with(path: Option<&Path>) -> anyhow::Result<Self> {
        let config = match path {
            Some(path) if path.exists() => {
                let config_str = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                serde_yml::from_str::<Self>(&config_str)
                    .with_context(|| format!("config {} is malformed", path.display()))?
            }
            Some(path) => {
                log::debug!("config {} not found, using defaults", path.display());
                Self::default()
            }
            None => Self::default(),
        };

        config.validate()?;
        Ok(config)
    }
}

/// Platform API credentials. Any missing value disables only that platform's API stage.
#[derive(Clone, Default)]
pub struct ApiCredentials {
    pub youtube_api_key: Option<String>,
    pub tiktok_api_key: Option<String>,
    pub tiktok_api_host: Option<String>,
    /// Full endpoint override for the TikTok lookup
    pub tiktok_api_endpoint: Option<String>,
    pub instagram_graph_api_token: Option<String>,
}

impl ApiCredentials {
    pub fn from_env() -> Self {
        Self {
            youtube_api_key: env_var("YOUTUBE_API_KEY"),
            tiktok_api_key: env_var("TIKTOK_API_KEY"),
            tiktok_api_host: env_var("TIKTOK_API_HOST"),
            tiktok_api_endpoint: env_var("TIKTOK_API_ENDPOINT"),
            instagram_graph_api_token: env_var("INSTAGRAM_GRAPH_API_TOKEN"),
        }
    }
}

impl std::fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |v: &Option<String>| if v.is_some() { "[REDACTED]" } else { "None" };
        write!(
            f,
            "ApiCredentials {{ youtube_api_key: {}, tiktok_api_key: {}, tiktok_api_host: {:?}, tiktok_api_endpoint: {:?}, instagram_graph_api_token: {} }}",
            redact(&self.youtube_api_key),
            redact(&self.tiktok_api_key),
            self.tiktok_api_host,
            self.tiktok_api_endpoint,
            redact(&self.instagram_graph_api_token),
        )
    }
}

fn env_var(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
        _ => None,
    }
}
