use crate::config::{ApiCredentials, ResolverConfig};
use crate::metadata::cache::MetadataCache;
use crate::metadata::candidates::candidates;
use crate::metadata::fetchers::FetcherRegistry;
use crate::metadata::http::{HttpClient, ReqwestClient};
use crate::metadata::reachability::{is_reachable, select_reachable};
use crate::metadata::types::{
    Cancellation, ChannelMetadata, FieldSource, PartialMetadata, ResolutionKey, ResolutionReport, ResolveRequest,
    Stage, StageReport, StageStatus,
};
use crate::platform::Platform;
use crate::scrape::scrape_metadata;
use std::sync::Arc;
use std::time::Instant;

/// Turns a (platform, handle) into a profile URL and profile image URL.
///
/// Strategy order per call: cache, page scrape, platform API, defaults. The
/// chosen URL is then checked against generated alternates and the image
/// against reachability. Every outcome, including the all-defaults one, is
/// memoized for the life of the resolver.
pub struct MetadataResolver {
    http: Arc<dyn HttpClient>,
    fetchers: FetcherRegistry,
    cache: MetadataCache,
    user_agent: String,
}

/// Fallback values for one call, resolved once up front.
struct Defaults {
    url: String,
    profile_image: String,
}

impl Defaults {
    /// Caller-supplied value when present and non-empty, else synthesized from the handle.
    fn for_request(req: &ResolveRequest, handle: &str) -> Self {
        let url = first_present([req.fallback_url.clone(), Some(req.platform.default_url(handle))]);
        let profile_image = first_present([
            req.fallback_profile_image.clone(),
            Some(req.platform.default_profile_image(handle)),
        ]);

        Self { url, profile_image }
    }
}

/// First option holding a non-blank value. The last option must always be present.
fn first_present<const N: usize>(options: [Option<String>; N]) -> String {
    options
        .into_iter()
        .flatten()
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
        .unwrap_or_default()
}

fn timed<T>(stage: Stage, report: &mut ResolutionReport, f: impl FnOnce() -> (T, StageStatus)) -> T {
    let started = Instant::now();
    let (value, status) = f();
    report.stages.push(StageReport {
        stage,
        status,
        duration_ms: started.elapsed().as_millis() as u64,
    });
    value
}

impl MetadataResolver {
    pub fn new(http: Arc<dyn HttpClient>, credentials: &ApiCredentials, config: &ResolverConfig) -> Self {
        Self {
            http,
            fetchers: FetcherRegistry::new(credentials),
            cache: MetadataCache::new(),
            user_agent: config.user_agent.clone(),
        }
    }

    /// Resolver over real HTTP.
    pub fn with_reqwest(credentials: &ApiCredentials, config: &ResolverConfig) -> anyhow::Result<Self> {
        let http = Arc::new(ReqwestClient::new(config)?);
        Ok(Self::new(http, credentials, config))
    }

    pub fn cache(&self) -> &MetadataCache {
        &self.cache
    }

    /// Never fails; always returns both fields populated.
    pub fn resolve(&self, req: &ResolveRequest) -> ChannelMetadata {
        self.resolve_with_report(req, &Cancellation::new()).0
    }

    pub fn resolve_cancellable(&self, req: &ResolveRequest, cancel: &Cancellation) -> ChannelMetadata {
        self.resolve_with_report(req, cancel).0
    }

    pub fn resolve_with_report(&self, req: &ResolveRequest, cancel: &Cancellation) -> (ChannelMetadata, ResolutionReport) {
        let started = Instant::now();
        let key = ResolutionKey::new(req.platform, &req.handle);
        let mut report = ResolutionReport::default();

        if let Some(cached) = self.cache.get(&key) {
            log::debug!("platform={} handle={} stage=cache outcome=hit", key.platform, key.handle);
            report.cache_hit = true;
            report.url_source = FieldSource::Cache;
            report.image_source = FieldSource::Cache;
            report.stages.push(StageReport {
                stage: Stage::Cache,
                status: StageStatus::Success,
                duration_ms: 0,
            });
            return (cached, report);
        }

        let defaults = Defaults::for_request(req, &key.handle);
        let (found, found_source) = self.acquire(&key, cancel, &mut report);

        let url = self.verify_url(&key, found.url, found_source, &defaults, cancel, &mut report);
        let profile_image = self.verify_image(&key, found.profile_image, found_source, &defaults, cancel, &mut report);

        let result = ChannelMetadata { url, profile_image };

        if cancel.is_cancelled() {
            report.cancelled = true;
            log::warn!(
                "platform={} handle={} outcome=cancelled, returning without caching",
                key.platform,
                key.handle
            );
        } else {
            self.cache.insert(key.clone(), result.clone());
        }

        report.duration_ms = started.elapsed().as_millis() as u64;
        log::info!(
            "platform={} handle={} url={} url_source={:?} image_source={:?} duration_ms={}",
            key.platform,
            key.handle,
            result.url,
            report.url_source,
            report.image_source,
            report.duration_ms
        );

        (result, report)
    }

    /// Scrape first; the platform API only runs when scraping found nothing.
    fn acquire(
        &self,
        key: &ResolutionKey,
        cancel: &Cancellation,
        report: &mut ResolutionReport,
    ) -> (PartialMetadata, Option<FieldSource>) {
        if key.handle.is_empty() {
            log::warn!("platform={} stage=acquire outcome=skip reason=\"empty handle\"", key.platform);
            report.stages.push(StageReport {
                stage: Stage::Scrape,
                status: StageStatus::Skip("empty handle".into()),
                duration_ms: 0,
            });
            return (PartialMetadata::default(), None);
        }

        if cancel.is_cancelled() {
            return (PartialMetadata::default(), None);
        }

        let scraped = timed(Stage::Scrape, report, || {
            match scrape_metadata(self.http.as_ref(), key.platform, &key.handle, &self.user_agent) {
                Some(meta) => (Some(meta), StageStatus::Success),
                None => (None, StageStatus::Skip("nothing scraped".into())),
            }
        });

        if let Some(meta) = scraped {
            report.stages.push(StageReport {
                stage: Stage::Api,
                status: StageStatus::Skip("scrape succeeded".into()),
                duration_ms: 0,
            });
            return (meta, Some(FieldSource::Scrape));
        }

        if cancel.is_cancelled() {
            return (PartialMetadata::default(), None);
        }

        log::warn!("platform={} handle={} falling back to platform API", key.platform, key.handle);
        let fetcher = self.fetchers.for_platform(key.platform);
        let from_api = timed(Stage::Api, report, || match fetcher.fetch(self.http.as_ref(), &key.handle) {
            Ok(meta) if meta.has_any_data() => {
                log::info!(
                    "platform={} handle={} stage=api fetcher={} outcome=success url={:?} image={:?}",
                    key.platform,
                    key.handle,
                    fetcher.name(),
                    meta.url,
                    meta.profile_image
                );
                (Some(meta), StageStatus::Success)
            }
            Ok(_) => (None, StageStatus::Skip("api returned nothing".into())),
            Err(e) => {
                log::error!(
                    "platform={} handle={} stage=api fetcher={} outcome=error err={e}",
                    key.platform,
                    key.handle,
                    fetcher.name()
                );
                (None, StageStatus::Error(e.to_string()))
            }
        });

        match from_api {
            Some(meta) => (meta, Some(FieldSource::Api)),
            None => (PartialMetadata::default(), None),
        }
    }

    /// First reachable of the generated candidates, else the first candidate.
    fn verify_url(
        &self,
        key: &ResolutionKey,
        found: Option<String>,
        found_source: Option<FieldSource>,
        defaults: &Defaults,
        cancel: &Cancellation,
        report: &mut ResolutionReport,
    ) -> String {
        let (best_guess, source) = match found {
            Some(url) => (url, found_source.unwrap_or_default()),
            None => {
                log::warn!(
                    "platform={} handle={} using default url {}",
                    key.platform,
                    key.handle,
                    defaults.url
                );
                (defaults.url.clone(), FieldSource::Fallback)
            }
        };

        let list = candidates(key.platform, &key.handle, &best_guess);
        let picked = timed(Stage::VerifyUrl, report, || {
            match select_reachable(self.http.as_ref(), &list, cancel) {
                Some(picked) => (Some(picked), StageStatus::Success),
                None => (None, StageStatus::Skip("no candidates".into())),
            }
        });

        match picked {
            Some((0, url)) => {
                report.url_source = source;
                url
            }
            Some((idx, url)) => {
                log::info!(
                    "platform={} handle={} stage=verify_url picked candidate #{idx} {url}",
                    key.platform,
                    key.handle
                );
                report.url_source = FieldSource::Candidate;
                url
            }
            None => {
                report.url_source = source;
                best_guess
            }
        }
    }

    /// Keeps a found image only if it is reachable; never tries alternates.
    fn verify_image(
        &self,
        key: &ResolutionKey,
        found: Option<String>,
        found_source: Option<FieldSource>,
        defaults: &Defaults,
        cancel: &Cancellation,
        report: &mut ResolutionReport,
    ) -> String {
        report.image_source = FieldSource::Fallback;

        let Some(image) = found else {
            report.stages.push(StageReport {
                stage: Stage::VerifyImage,
                status: StageStatus::Skip("no candidate image".into()),
                duration_ms: 0,
            });
            return defaults.profile_image.clone();
        };

        if cancel.is_cancelled() {
            return defaults.profile_image.clone();
        }

        let reachable = timed(Stage::VerifyImage, report, || {
            let reachable = is_reachable(self.http.as_ref(), &image);
            let status = if reachable {
                StageStatus::Success
            } else {
                StageStatus::Skip("image unreachable".into())
            };
            (reachable, status)
        });

        if reachable {
            report.image_source = found_source.unwrap_or_default();
            image
        } else {
            log::warn!(
                "platform={} handle={} stage=verify_image outcome=unreachable image={image}, using default",
                key.platform,
                key.handle
            );
            defaults.profile_image.clone()
        }
    }
}

/// Defaults for a request without touching the network.
pub fn fallback_metadata(platform: Platform, handle: &str, fallback_url: Option<String>, fallback_profile_image: Option<String>) -> ChannelMetadata {
    let req = ResolveRequest::new(platform, handle).with_fallbacks(fallback_url, fallback_profile_image);
    let key = ResolutionKey::new(platform, handle);
    let defaults = Defaults::for_request(&req, &key.handle);
    ChannelMetadata {
        url: defaults.url,
        profile_image: defaults.profile_image,
    }
}
