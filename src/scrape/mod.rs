use crate::metadata::http::HttpClient;
use crate::metadata::types::{PartialMetadata, ResolveError};
use crate::platform::Platform;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

static LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("link[rel][href]").expect("Failed to compile link selector"));
static META_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("meta[content]").expect("Failed to compile meta selector"));

/// Fetches the platform profile page for `handle` and extracts what it declares
/// about itself. Returns `None` on any failure or when the page declares nothing.
pub fn scrape_metadata(
    http: &dyn HttpClient,
    platform: Platform,
    handle: &str,
    user_agent: &str,
) -> Option<PartialMetadata> {
    match try_scrape(http, platform, handle, user_agent) {
        Ok(Some(meta)) => {
            log::info!(
                "platform={platform} handle={handle} stage=scrape outcome=success url={:?} image={:?}",
                meta.url,
                meta.profile_image
            );
            Some(meta)
        }
        Ok(None) => {
            log::warn!("platform={platform} handle={handle} stage=scrape outcome=skip reason=\"no canonical url or og:image\"");
            None
        }
        Err(e) => {
            log::warn!("platform={platform} handle={handle} stage=scrape outcome=error err={e}");
            None
        }
    }
}

fn try_scrape(
    http: &dyn HttpClient,
    platform: Platform,
    handle: &str,
    user_agent: &str,
) -> Result<Option<PartialMetadata>, ResolveError> {
    let target = platform.scrape_target(handle);
    let resp = http.get(&target, &[("User-Agent", user_agent)])?;

    if !resp.status.is_success() {
        return Err(ResolveError::HttpStatus {
            status: resp.status.as_u16(),
        });
    }

    let meta = get_data_from_page(&resp.body, &target);
    if meta.has_any_data() {
        Ok(Some(meta))
    } else {
        Ok(None)
    }
}

/// Extracts the canonical URL and og:image from page markup.
///
/// URL preference: first `<link rel="canonical">`, else first `og:url` meta.
/// Relative values are resolved against `page_url`; empty values count as absent.
pub fn get_data_from_page(html: &str, page_url: &str) -> PartialMetadata {
    let document = Html::parse_document(html);

    let mut canonical = None;
    for element in document.select(&LINK_SELECTOR) {
        let rel = element.attr("rel").unwrap_or_default();
        if rel.split_whitespace().any(|r| r.eq_ignore_ascii_case("canonical")) {
            canonical = absolutize(element.attr("href").unwrap_or_default(), page_url);
            if canonical.is_some() {
                break;
            }
        }
    }

    let mut og_url = None;
    let mut og_image = None;
    for element in document.select(&META_SELECTOR) {
        let meta_key = element
            .attr("property")
            .or_else(|| element.attr("name"))
            .unwrap_or_default();
        let meta_value = element.attr("content").unwrap_or_default();

        if og_url.is_none() && meta_key.eq_ignore_ascii_case("og:url") {
            og_url = absolutize(meta_value, page_url);
        }
        if og_image.is_none() && meta_key.eq_ignore_ascii_case("og:image") {
            og_image = absolutize(meta_value, page_url);
        }
    }

    PartialMetadata {
        url: canonical.or(og_url),
        profile_image: og_image,
    }
}

fn absolutize(value: &str, page_url: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if value.starts_with("//") {
        return Some(format!("https:{value}"));
    }

    if value.starts_with("http://") || value.starts_with("https://") {
        return Some(value.to_string());
    }

    url::Url::parse(page_url)
        .and_then(|base| base.join(value))
        .map(|u| u.to_string())
        .ok()
}
