use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use crate::channels::generate_channels;
use crate::config::{ApiCredentials, Config, ResolverConfig};
use crate::enrich::Enricher;
use crate::metadata::MetadataResolver;
use crate::tests::support::FakeHttp;
use crate::web::{router, SharedState};

fn state_with(http: FakeHttp) -> SharedState {
    let resolver = MetadataResolver::new(Arc::new(http), &ApiCredentials::default(), &ResolverConfig::default());
    let config = Config::default();
    SharedState {
        resolver: Arc::new(resolver),
        catalogue: Arc::new(generate_channels()),
        enricher: Arc::new(Enricher::from_config(&config.listing).unwrap()),
        config: Arc::new(config),
    }
}

async fn get_json(state: SharedState, uri: &str) -> (StatusCode, Value) {
    let resp = router(state)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_channels_page() {
    let (status, body) = get_json(
        state_with(FakeHttp::new()),
        "/api/channels?platform=tiktok&metric=views&page=2&per_page=5&no_enrich=true",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 120);
    assert_eq!(body["page"], 2);
    assert_eq!(body["per_page"], 5);

    let channels = body["channels"].as_array().unwrap();
    assert_eq!(channels.len(), 5);
    assert!(channels.iter().all(|c| c["platform"] == "tiktok"));
    assert_eq!(channels[0]["handle"], "sgw_tiktok_6");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_channels_defaults() {
    let (status, body) = get_json(state_with(FakeHttp::new()), "/api/channels?no_enrich=true").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 360);
    assert_eq!(body["page"], 1);
    assert_eq!(body["per_page"], 50);
    assert_eq!(body["channels"].as_array().unwrap().len(), 50);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_channels_enriches_with_fallbacks() {
    let (status, body) = get_json(
        state_with(FakeHttp::new()),
        "/api/channels?platform=instagram&per_page=3",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let first = &body["channels"][0];
    assert_eq!(first["handle"], "sgw_instagram_1");
    assert_eq!(first["url"], "https://www.instagram.com/sgw_instagram_1");
    assert!(first["profile_image"].as_str().unwrap().ends_with("&sig=instagram-1"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_channels_rejects_unknown_platform() {
    let (status, body) = get_json(state_with(FakeHttp::new()), "/api/channels?platform=vine").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("vine"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_resolve_endpoint() {
    let http = FakeHttp::new()
        .page(
            "https://www.tiktok.com/@dancer",
            200,
            r#"<head><link rel="canonical" href="https://www.tiktok.com/@dancer"><meta name="og:image" content="https://p16.test/a.jpeg"></head>"#,
        )
        .reachable("https://p16.test/a.jpeg");

    let (status, body) = get_json(state_with(http), "/api/channels/resolve?platform=tiktok&handle=%40dancer").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["url"], "https://www.tiktok.com/@dancer");
    assert_eq!(body["profileImage"], "https://p16.test/a.jpeg");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_resolve_endpoint_uses_caller_fallbacks() {
    let (status, body) = get_json(
        state_with(FakeHttp::new()),
        "/api/channels/resolve?platform=youtube&handle=nobody&fallback_profile_image=https%3A%2F%2Fcdn.test%2Fn.jpg",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["url"], "https://www.youtube.com/@nobody");
    assert_eq!(body["profileImage"], "https://cdn.test/n.jpg");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_resolve_endpoint_rejects_bad_input() {
    let (status, _) = get_json(state_with(FakeHttp::new()), "/api/channels/resolve?platform=vine&handle=x").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = get_json(state_with(FakeHttp::new()), "/api/channels/resolve?platform=youtube&handle=%40").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("handle"));
}
