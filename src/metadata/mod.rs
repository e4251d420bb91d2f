pub mod cache;
pub mod candidates;
pub mod fetchers;
pub mod http;
pub mod reachability;
pub mod resolver;
pub mod types;

pub use resolver::{fallback_metadata, MetadataResolver};
pub use types::{Cancellation, ChannelMetadata, ResolutionReport, ResolveRequest};

use crate::config::{ApiCredentials, ResolverConfig};
use crate::platform::Platform;
use once_cell::sync::OnceCell;
use std::sync::Arc;

static GLOBAL_RESOLVER: OnceCell<Arc<MetadataResolver>> = OnceCell::new();

/// Installs the process-wide resolver. Fails if one is already in place.
pub fn install_global_resolver(resolver: Arc<MetadataResolver>) -> anyhow::Result<()> {
    GLOBAL_RESOLVER
        .set(resolver)
        .map_err(|_| anyhow::anyhow!("global resolver is already installed"))
}

/// The installed resolver, or one built over real HTTP with default
/// settings and credentials from the environment.
pub fn global_resolver() -> Option<Arc<MetadataResolver>> {
    GLOBAL_RESOLVER
        .get_or_try_init(|| {
            MetadataResolver::with_reqwest(&ApiCredentials::from_env(), &ResolverConfig::default()).map(Arc::new)
        })
        .map_err(|e| log::error!("failed to build metadata resolver: {e:#}"))
        .ok()
        .cloned()
}

/// Main entry point for resolving a channel's profile URL and image.
///
/// Never fails. If no resolver can be built, the caller's fallbacks (or
/// synthesized defaults) are returned uncached.
pub fn resolve_channel_metadata(
    platform: Platform,
    handle: &str,
    fallback_url: Option<&str>,
    fallback_profile_image: Option<&str>,
) -> ChannelMetadata {
    let fallback_url = fallback_url.map(String::from);
    let fallback_profile_image = fallback_profile_image.map(String::from);

    match global_resolver() {
        Some(resolver) => {
            let req = ResolveRequest::new(platform, handle).with_fallbacks(fallback_url, fallback_profile_image);
            resolver.resolve(&req)
        }
        None => fallback_metadata(platform, handle, fallback_url, fallback_profile_image),
    }
}
