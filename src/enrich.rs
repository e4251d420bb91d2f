use crate::channels::Channel;
use crate::config::ListingConfig;
use crate::metadata::{Cancellation, MetadataResolver, ResolveRequest};
use rayon::prelude::*;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Replaces channels' url and profile image with resolved values on a
/// bounded worker pool. The pool is built once and reused across calls.
pub struct Enricher {
    pool: rayon::ThreadPool,
    /// Channels past this index are returned untouched
    max_channels: usize,
}

impl Enricher {
    pub fn new(max_channels: usize, parallelism: usize) -> anyhow::Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(parallelism.max(1))
            .thread_name(|idx| format!("enrich-{idx}"))
            .build()?;

        Ok(Self { pool, max_channels })
    }

    pub fn from_config(listing: &ListingConfig) -> anyhow::Result<Self> {
        Self::new(listing.max_enriched_channels, listing.enrich_parallelism)
    }

    /// Resolves the first `max_channels` channels concurrently, each with its
    /// current values as fallbacks. A resolution that panics leaves its channel
    /// as it was. Returns how many channels were enriched.
    pub fn enrich(&self, resolver: &MetadataResolver, channels: &mut [Channel], cancel: &Cancellation) -> usize {
        let limit = self.max_channels.min(channels.len());
        if limit == 0 {
            return 0;
        }

        let enriched = self.pool.install(|| {
            channels[..limit]
                .par_iter_mut()
                .map(|channel| enrich_one(resolver, channel, cancel))
                .filter(|ok| *ok)
                .count()
        });

        log::info!("enriched {enriched}/{limit} channels ({} total)", channels.len());
        enriched
    }
}

fn enrich_one(resolver: &MetadataResolver, channel: &mut Channel, cancel: &Cancellation) -> bool {
    let req = ResolveRequest::new(channel.platform, channel.handle.clone())
        .with_fallbacks(Some(channel.url.clone()), Some(channel.profile_image.clone()));

    match catch_unwind(AssertUnwindSafe(|| resolver.resolve_cancellable(&req, cancel))) {
        Ok(meta) => {
            channel.url = meta.url;
            channel.profile_image = meta.profile_image;
            true
        }
        Err(_) => {
            log::error!(
                "platform={} handle={} resolution panicked, keeping prior values",
                channel.platform,
                channel.handle
            );
            false
        }
    }
}
