use crate::platform::{normalize_handle, Platform};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Error taxonomy for a single acquisition strategy.
///
/// None of these ever leave the resolver; they are logged at the strategy
/// boundary and turned into "this stage produced nothing".
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("http status {status}")]
    HttpStatus { status: u16 },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("not found: {0}")]
    NotFound(String),
}

/// Cache key: platform plus normalized handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolutionKey {
    pub platform: Platform,
    pub handle: String,
}

impl ResolutionKey {
    pub fn new(platform: Platform, handle: &str) -> Self {
        Self {
            platform,
            handle: normalize_handle(handle),
        }
    }
}

impl std::fmt::Display for ResolutionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.platform, self.handle)
    }
}

/// Fully populated result of a resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelMetadata {
    pub url: String,
    pub profile_image: String,
}

/// What a single strategy (scrape or platform API) managed to find.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialMetadata {
    pub url: Option<String>,
    pub profile_image: Option<String>,
}

impl PartialMetadata {
    /// Returns true if any field is present
    pub fn has_any_data(&self) -> bool {
        self.url.is_some() || self.profile_image.is_some()
    }
}

/// Caller input for one resolution.
#[derive(Debug, Clone)]
pub struct ResolveRequest {
    pub platform: Platform,
    pub handle: String,
    pub fallback_url: Option<String>,
    pub fallback_profile_image: Option<String>,
}

impl ResolveRequest {
    pub fn new(platform: Platform, handle: impl Into<String>) -> Self {
        Self {
            platform,
            handle: handle.into(),
            fallback_url: None,
            fallback_profile_image: None,
        }
    }

    pub fn with_fallbacks(mut self, url: Option<String>, profile_image: Option<String>) -> Self {
        self.fallback_url = url;
        self.fallback_profile_image = profile_image;
        self
    }
}

/// Shared cancellation flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct Cancellation(Arc<AtomicBool>);

impl Cancellation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Cache,
    Scrape,
    Api,
    VerifyUrl,
    VerifyImage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail")]
pub enum StageStatus {
    Success,
    Skip(String),
    Error(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageReport {
    pub stage: Stage,
    pub status: StageStatus,
    pub duration_ms: u64,
}

/// Where a field of the final result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FieldSource {
    Scrape,
    Api,
    /// A generated alternate picked by reachability probing
    Candidate,
    #[default]
    Fallback,
    Cache,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ResolutionReport {
    pub cache_hit: bool,
    pub cancelled: bool,
    pub stages: Vec<StageReport>,
    pub url_source: FieldSource,
    pub image_source: FieldSource,
    pub duration_ms: u64,
}

impl ResolutionReport {
    pub fn stage(&self, stage: Stage) -> Option<&StageReport> {
        self.stages.iter().find(|s| s.stage == stage)
    }
}
