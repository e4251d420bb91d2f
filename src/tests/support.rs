use crate::metadata::http::{HttpClient, HttpResponse};
use crate::metadata::types::ResolveError;
use reqwest::StatusCode;
use std::sync::Mutex;

#[derive(Debug, Clone, Default)]
struct Route {
    head: Option<u16>,
    get: Option<(u16, String)>,
}

/// In-memory `HttpClient`. Unknown URLs fail like a refused connection.
/// Every request is recorded as `"METHOD url"`.
#[derive(Default)]
pub struct FakeHttp {
    exact: Vec<(String, Route)>,
    prefixed: Vec<(String, Route)>,
    calls: Mutex<Vec<String>>,
    sent_headers: Mutex<Vec<(String, Vec<(String, String)>)>>,
}

impl FakeHttp {
    pub fn new() -> Self {
        Self::default()
    }

    fn route_mut(&mut self, url: &str) -> &mut Route {
        let idx = match self.exact.iter().position(|(u, _)| u == url) {
            Some(idx) => idx,
            None => {
                self.exact.push((url.to_string(), Route::default()));
                self.exact.len() - 1
            }
        };
        &mut self.exact[idx].1
    }

    /// Serve `body` with `status` on GET. HEAD mirrors the GET status unless set.
    pub fn page(mut self, url: &str, status: u16, body: &str) -> Self {
        self.route_mut(url).get = Some((status, body.to_string()));
        self
    }

    pub fn head_status(mut self, url: &str, status: u16) -> Self {
        self.route_mut(url).head = Some(status);
        self
    }

    pub fn reachable(self, url: &str) -> Self {
        self.head_status(url, 200)
    }

    /// GET route matching any URL starting with `prefix` (query strings included).
    pub fn page_prefix(mut self, prefix: &str, status: u16, body: &str) -> Self {
        self.prefixed.push((
            prefix.to_string(),
            Route {
                head: None,
                get: Some((status, body.to_string())),
            },
        ));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Headers sent with the first GET whose URL starts with `prefix`.
    pub fn headers_for(&self, prefix: &str) -> Vec<(String, String)> {
        self.sent_headers
            .lock()
            .unwrap()
            .iter()
            .find(|(url, _)| url.starts_with(prefix))
            .map(|(_, headers)| headers.clone())
            .unwrap_or_default()
    }

    pub fn calls_containing(&self, needle: &str) -> usize {
        self.calls().iter().filter(|c| c.contains(needle)).count()
    }

    fn lookup(&self, url: &str) -> Option<Route> {
        if let Some((_, route)) = self.exact.iter().find(|(u, _)| u == url) {
            return Some(route.clone());
        }
        self.prefixed
            .iter()
            .filter(|(p, _)| url.starts_with(p.as_str()))
            .max_by_key(|(p, _)| p.len())
            .map(|(_, route)| route.clone())
    }

    fn refused(url: &str) -> ResolveError {
        ResolveError::Network(format!("{url}: connection refused"))
    }
}

impl HttpClient for FakeHttp {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse, ResolveError> {
        self.calls.lock().unwrap().push(format!("GET {url}"));
        self.sent_headers.lock().unwrap().push((
            url.to_string(),
            headers.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        ));
        match self.lookup(url).and_then(|r| r.get) {
            Some((status, body)) => Ok(HttpResponse {
                status: StatusCode::from_u16(status).unwrap(),
                body,
            }),
            None => Err(Self::refused(url)),
        }
    }

    fn head(&self, url: &str) -> Result<HttpResponse, ResolveError> {
        self.calls.lock().unwrap().push(format!("HEAD {url}"));
        let route = self.lookup(url).ok_or_else(|| Self::refused(url))?;
        let status = match (route.head, route.get) {
            (Some(status), _) => status,
            (None, Some((status, _))) => status,
            (None, None) => return Err(Self::refused(url)),
        };
        Ok(HttpResponse {
            status: StatusCode::from_u16(status).unwrap(),
            body: String::new(),
        })
    }
}
