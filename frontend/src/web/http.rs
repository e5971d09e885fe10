//! HTTP transport layer.
//!
//! `HttpClient` is the seam between the API client and the network.
//! The browser implementation sits on `gloo-net`; tests swap in
//! [`MockHttpClient`].

use async_trait::async_trait;
use fieldserve_shared::protocol::HttpMethod;
use serde::de::DeserializeOwned;
use std::collections::HashMap;

#[cfg(test)]
use std::sync::Mutex;

// =========================================================
// 核心抽象 (Core Abstraction)
// =========================================================

/// HTTP error type
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HttpError {
    /// Request could not be assembled
    #[error("failed to build request: {0}")]
    RequestBuildFailed(String),
    /// The fetch itself failed (offline, CORS, DNS ...)
    #[error("network error: {0}")]
    NetworkError(String),
    /// Body could not be read
    #[error("failed to read response: {0}")]
    ResponseParseFailed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_body(mut self, body: String) -> Self {
        self.body = Some(body);
        self
    }

    #[cfg(test)]
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// 2xx
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body. An empty body reads as JSON `null`, so `()` and
    /// `Option<T>` responses decode from `204 No Content`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        if self.body.trim().is_empty() {
            serde_json::from_str("null")
        } else {
            serde_json::from_str(&self.body)
        }
    }
}

/// Transport trait. `?Send` because browser futures hold JS handles.
#[async_trait(?Send)]
pub trait HttpClient: Send + Sync {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError>;

    /// Read a cookie visible to this client, already decoded.
    fn cookie(&self, name: &str) -> Option<String>;
}

/// Find `name` in a `document.cookie` style string (`a=1; b=2`).
/// The value is returned raw; decoding is the caller's concern.
pub fn find_cookie<'a>(cookies: &'a str, name: &str) -> Option<&'a str> {
    cookies.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then_some(value)
    })
}

// =========================================================
// 浏览器客户端 (Production)
// =========================================================

/// `fetch` based transport. Sends cookies so the anti-forgery cookie set by
/// the bootstrap call travels with later requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchHttpClient;

impl FetchHttpClient {
    fn gloo_method(method: HttpMethod) -> gloo_net::http::Method {
        use gloo_net::http::Method;
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    fn document_cookies() -> Option<String> {
        use wasm_bindgen::JsCast;

        web_sys::window()?
            .document()?
            .dyn_into::<web_sys::HtmlDocument>()
            .ok()?
            .cookie()
            .ok()
    }
}

#[async_trait(?Send)]
impl HttpClient for FetchHttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut builder = gloo_net::http::RequestBuilder::new(&req.url)
            .method(Self::gloo_method(req.method))
            .credentials(web_sys::RequestCredentials::Include);

        for (key, value) in &req.headers {
            builder = builder.header(key, value);
        }

        let request = match req.body {
            Some(body) => builder.body(body),
            None => builder.build(),
        }
        .map_err(|e| HttpError::RequestBuildFailed(e.to_string()))?;

        let response = request
            .send()
            .await
            .map_err(|e| HttpError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| HttpError::ResponseParseFailed(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }

    fn cookie(&self, name: &str) -> Option<String> {
        let cookies = Self::document_cookies()?;
        let raw = find_cookie(&cookies, name)?;
        match js_sys::decode_uri_component(raw) {
            Ok(decoded) => decoded.as_string(),
            Err(_) => Some(raw.to_string()),
        }
    }
}

// =========================================================
// 模拟客户端 (Tests)
// =========================================================

#[cfg(test)]
enum MockReply {
    Response(u16, String),
    Failure(HttpError),
}

/// Canned responses keyed by `"METHOD url"`; unknown keys answer 404.
#[cfg(test)]
pub struct MockHttpClient {
    replies: Mutex<HashMap<String, MockReply>>,
    cookies: Mutex<HashMap<String, String>>,
    // cookie set by the server when the given url is hit
    set_cookie_on: Mutex<HashMap<String, (String, String)>>,
    pub requests: Mutex<Vec<HttpRequest>>,
}

#[cfg(test)]
impl MockHttpClient {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(HashMap::new()),
            cookies: Mutex::new(HashMap::new()),
            set_cookie_on: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn key(method: HttpMethod, url: &str) -> String {
        format!("{} {}", method.as_str(), url)
    }

    pub fn mock_response(&self, method: HttpMethod, url: &str, status: u16, body: serde_json::Value) {
        self.replies
            .lock()
            .unwrap()
            .insert(Self::key(method, url), MockReply::Response(status, body.to_string()));
    }

    pub fn mock_empty(&self, method: HttpMethod, url: &str, status: u16) {
        self.replies
            .lock()
            .unwrap()
            .insert(Self::key(method, url), MockReply::Response(status, String::new()));
    }

    pub fn mock_failure(&self, method: HttpMethod, url: &str) {
        self.replies.lock().unwrap().insert(
            Self::key(method, url),
            MockReply::Failure(HttpError::NetworkError("connection refused".to_string())),
        );
    }

    pub fn set_cookie(&self, name: &str, value: &str) {
        self.cookies
            .lock()
            .unwrap()
            .insert(name.to_string(), value.to_string());
    }

    pub fn set_cookie_when_hit(&self, url: &str, name: &str, value: &str) {
        self.set_cookie_on
            .lock()
            .unwrap()
            .insert(url.to_string(), (name.to_string(), value.to_string()));
    }

    pub fn sent(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last(&self) -> Option<HttpRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[cfg(test)]
#[async_trait(?Send)]
impl HttpClient for MockHttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.requests.lock().unwrap().push(req.clone());

        if let Some((name, value)) = self.set_cookie_on.lock().unwrap().get(&req.url).cloned() {
            self.set_cookie(&name, &value);
        }

        let replies = self.replies.lock().unwrap();
        match replies.get(&Self::key(req.method, &req.url)) {
            Some(MockReply::Response(status, body)) => Ok(HttpResponse {
                status: *status,
                body: body.clone(),
            }),
            Some(MockReply::Failure(e)) => Err(e.clone()),
            None => Ok(HttpResponse {
                status: 404,
                body: "Not Found".to_string(),
            }),
        }
    }

    fn cookie(&self, name: &str) -> Option<String> {
        self.cookies.lock().unwrap().get(name).cloned()
    }
}
