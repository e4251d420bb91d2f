use std::sync::Arc;

use crate::channels::{generate_channels, list_channels, Channel, ChannelQuery};
use crate::config::{ApiCredentials, ResolverConfig};
use crate::enrich::Enricher;
use crate::metadata::http::{HttpClient, HttpResponse};
use crate::metadata::types::ResolveError;
use crate::metadata::{Cancellation, MetadataResolver};
use crate::platform::Platform;
use crate::tests::support::FakeHttp;

const AVATAR_PAGE: &str = r#"<head><meta property="og:image" content="https://cdn.test/avatar.jpg"></head>"#;

/// Panics on any request whose URL contains `needle`.
struct PanickyHttp {
    inner: FakeHttp,
    needle: &'static str,
}

impl HttpClient for PanickyHttp {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse, ResolveError> {
        if url.contains(self.needle) {
            panic!("boom on {url}");
        }
        self.inner.get(url, headers)
    }

    fn head(&self, url: &str) -> Result<HttpResponse, ResolveError> {
        if url.contains(self.needle) {
            panic!("boom on {url}");
        }
        self.inner.head(url)
    }
}

fn avatar_http() -> FakeHttp {
    FakeHttp::new()
        .page_prefix("https://www.youtube.com/@sgw_youtube_", 200, AVATAR_PAGE)
        .reachable("https://cdn.test/avatar.jpg")
}

fn youtube_page(per_page: usize) -> Vec<Channel> {
    let query = ChannelQuery {
        platform: Some(Platform::Youtube),
        page: 1,
        per_page,
        ..Default::default()
    };
    list_channels(&generate_channels(), &query, 200).channels
}

fn enricher(max_channels: usize) -> Enricher {
    Enricher::new(max_channels, 4).unwrap()
}

#[test]
pub fn test_enrich_replaces_images_up_to_cap() {
    let http = Arc::new(avatar_http());
    let resolver = MetadataResolver::new(http.clone(), &ApiCredentials::default(), &ResolverConfig::default());
    let original = youtube_page(5);
    let mut channels = original.clone();

    let enriched = enricher(2).enrich(&resolver, &mut channels, &Cancellation::new());

    assert_eq!(enriched, 2);
    for channel in &channels[..2] {
        assert_eq!(channel.profile_image, "https://cdn.test/avatar.jpg");
        assert_eq!(channel.url, format!("https://www.youtube.com/@{}", channel.handle));
    }
    assert_eq!(&channels[2..], &original[2..]);
    for channel in &original[2..] {
        assert_eq!(http.calls_containing(&format!("@{}", channel.handle)), 0);
    }
}

#[test]
pub fn test_enrich_keeps_catalogue_values_when_nothing_resolves() {
    let resolver = MetadataResolver::new(
        Arc::new(FakeHttp::new()),
        &ApiCredentials::default(),
        &ResolverConfig::default(),
    );
    let original = youtube_page(4);
    let mut channels = original.clone();

    let enriched = enricher(100).enrich(&resolver, &mut channels, &Cancellation::new());

    assert_eq!(enriched, 4);
    assert_eq!(channels, original);
}

#[test]
pub fn test_enrich_survives_panicking_resolution() {
    let http = Arc::new(PanickyHttp {
        inner: avatar_http(),
        needle: "@sgw_youtube_2",
    });
    let resolver = MetadataResolver::new(http, &ApiCredentials::default(), &ResolverConfig::default());
    let original = youtube_page(3);
    let mut channels = original.clone();
    assert_eq!(channels[1].handle, "sgw_youtube_2");

    let enriched = enricher(3).enrich(&resolver, &mut channels, &Cancellation::new());

    assert_eq!(enriched, 2);
    assert_eq!(channels[1], original[1]);
    assert_eq!(channels[0].profile_image, "https://cdn.test/avatar.jpg");
    assert_eq!(channels[2].profile_image, "https://cdn.test/avatar.jpg");
}

#[test]
pub fn test_enrich_with_zero_cap_is_noop() {
    let http = Arc::new(avatar_http());
    let resolver = MetadataResolver::new(http.clone(), &ApiCredentials::default(), &ResolverConfig::default());
    let original = youtube_page(3);
    let mut channels = original.clone();

    let enriched = enricher(0).enrich(&resolver, &mut channels, &Cancellation::new());

    assert_eq!(enriched, 0);
    assert_eq!(channels, original);
    assert!(http.calls().is_empty());
}

#[test]
pub fn test_cancelled_enrich_keeps_values_and_skips_network() {
    let http = Arc::new(avatar_http());
    let resolver = MetadataResolver::new(http.clone(), &ApiCredentials::default(), &ResolverConfig::default());
    let original = youtube_page(3);
    let mut channels = original.clone();
    let cancel = Cancellation::new();
    cancel.cancel();

    enricher(3).enrich(&resolver, &mut channels, &cancel);

    assert_eq!(channels, original);
    assert!(http.calls().is_empty());
    assert!(resolver.cache().is_empty());
}

#[test]
pub fn test_enricher_reused_across_calls() {
    let http = Arc::new(avatar_http());
    let resolver = MetadataResolver::new(http.clone(), &ApiCredentials::default(), &ResolverConfig::default());
    let enricher = enricher(3);

    let mut first = youtube_page(3);
    assert_eq!(enricher.enrich(&resolver, &mut first, &Cancellation::new()), 3);
    let calls = http.calls().len();

    let mut second = youtube_page(3);
    assert_eq!(enricher.enrich(&resolver, &mut second, &Cancellation::new()), 3);

    assert_eq!(first, second);
    assert_eq!(http.calls().len(), calls);
}
