use crate::config::ResolverConfig;
use crate::metadata::types::ResolveError;
use reqwest::StatusCode;
use std::error::Error;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: String,
}

/// Outbound HTTP used by every resolution strategy.
///
/// Implementations must bound every call with a timeout and report transport
/// failures as `ResolveError::Network`. Non-success statuses are returned as
/// responses, not errors; callers decide what a status means.
pub trait HttpClient: Send + Sync {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse, ResolveError>;

    /// Lightweight existence probe. The body is always empty.
    fn head(&self, url: &str) -> Result<HttpResponse, ResolveError>;
}

pub struct ReqwestClient {
    client: reqwest::blocking::Client,
    probe_timeout: Duration,
}

impl ReqwestClient {
    pub fn new(config: &ResolverConfig) -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.request_timeout())
            .connect_timeout(config.probe_timeout())
            .pool_idle_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            probe_timeout: config.probe_timeout(),
        })
    }
}

fn get_error(error: &reqwest::Error) -> String {
    match error.source() {
        Some(e) => match e.source() {
            Some(e) => e.to_string(),
            None => e.to_string(),
        },
        None => error.to_string(),
    }
}

fn network_error(url: &str, err: reqwest::Error) -> ResolveError {
    let kind = if err.is_timeout() { "timeout" } else { "transport" };
    ResolveError::Network(format!("{url}: {kind}: {}", get_error(&err)))
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse, ResolveError> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        log::debug!("GET {url}");
        let resp = request.send().map_err(|err| network_error(url, err))?;
        let status = resp.status();
        let body = resp.text().map_err(|err| network_error(url, err))?;

        Ok(HttpResponse { status, body })
    }

    fn head(&self, url: &str) -> Result<HttpResponse, ResolveError> {
        log::debug!("HEAD {url}");
        let resp = self
            .client
            .head(url)
            .timeout(self.probe_timeout)
            .send()
            .map_err(|err| network_error(url, err))?;

        Ok(HttpResponse {
            status: resp.status(),
            body: String::new(),
        })
    }
}

/// Reads a successful JSON body, mapping failures onto the resolver taxonomy.
pub fn expect_json<T: serde::de::DeserializeOwned>(resp: HttpResponse) -> Result<T, ResolveError> {
    if !resp.status.is_success() {
        return Err(ResolveError::HttpStatus {
            status: resp.status.as_u16(),
        });
    }

    serde_json::from_str(&resp.body).map_err(|e| ResolveError::Parse(format!("unexpected payload: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(serde::Deserialize, Debug)]
    struct Payload {
        name: String,
    }

    #[test]
    fn test_expect_json_ok() {
        let resp = HttpResponse {
            status: StatusCode::OK,
            body: r#"{"name":"x"}"#.into(),
        };
        let payload: Payload = expect_json(resp).unwrap();
        assert_eq!(payload.name, "x");
    }

    #[test]
    fn test_expect_json_status() {
        let resp = HttpResponse {
            status: StatusCode::FORBIDDEN,
            body: String::new(),
        };
        let err = expect_json::<Payload>(resp).unwrap_err();
        assert_eq!(err, ResolveError::HttpStatus { status: 403 });
    }

    #[test]
    fn test_expect_json_bad_shape() {
        let resp = HttpResponse {
            status: StatusCode::OK,
            body: "<html>".into(),
        };
        assert!(matches!(expect_json::<Payload>(resp), Err(ResolveError::Parse(_))));
    }
}
