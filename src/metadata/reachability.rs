use crate::metadata::http::HttpClient;
use crate::metadata::types::Cancellation;
use reqwest::StatusCode;

/// Best-effort existence check: HEAD first, GET when HEAD is inconclusive.
///
/// A 405 on HEAD counts as reachable since some services reject HEAD for
/// resources that exist. Never fails; transport errors mean unreachable.
pub fn is_reachable(http: &dyn HttpClient, url: &str) -> bool {
    match http.head(url) {
        Ok(resp) if resp.status.is_success() || resp.status == StatusCode::METHOD_NOT_ALLOWED => {
            log::debug!("probe url={url} method=HEAD status={} reachable=true", resp.status);
            return true;
        }
        Ok(resp) => {
            log::debug!("probe url={url} method=HEAD status={} inconclusive", resp.status);
        }
        Err(e) => {
            log::debug!("probe url={url} method=HEAD reachable=false err={e}");
            return false;
        }
    }

    match http.get(url, &[]) {
        Ok(resp) => {
            let reachable = resp.status.is_success();
            log::debug!("probe url={url} method=GET status={} reachable={reachable}", resp.status);
            reachable
        }
        Err(e) => {
            log::debug!("probe url={url} method=GET reachable=false err={e}");
            false
        }
    }
}

/// Returns the first reachable candidate, or the first candidate when none is.
///
/// Stops probing once `cancel` is set and falls back to the first candidate.
pub fn select_reachable(http: &dyn HttpClient, candidates: &[String], cancel: &Cancellation) -> Option<(usize, String)> {
    let first = candidates.first()?;

    for (idx, candidate) in candidates.iter().enumerate() {
        if cancel.is_cancelled() {
            break;
        }
        if is_reachable(http, candidate) {
            return Some((idx, candidate.clone()));
        }
    }

    Some((0, first.clone()))
}
