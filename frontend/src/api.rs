use crate::config::{AppConfig, AuthMode};
use crate::error::{ClientError, ClientResult};
use crate::session::SessionContext;
use crate::web::http::{HttpClient, HttpRequest, HttpResponse};
use fieldserve_shared::protocol::{ApiRequest, CsrfCookieRequest};
use fieldserve_shared::{
    COOKIE_XSRF_TOKEN, HEADER_AUTHORIZATION, HEADER_XSRF_TOKEN, MessageBody, ValidationErrors,
};
use leptos::prelude::*;
use std::sync::Arc;

/// Percent-encode a query value (RFC 3986 unreserved characters pass through).
fn encode_query_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// Client for the marketplace REST API.
///
/// Every request gets the bearer token of the current session and, in
/// cookie mode, the anti-forgery header. A `401`/`403` evicts the session
/// before the error reaches the caller.
#[derive(Clone, Copy)]
pub struct ApiClient {
    base_url: StoredValue<String>,
    auth_mode: AuthMode,
    http: StoredValue<Arc<dyn HttpClient>>,
    session: SessionContext,
}

impl ApiClient {
    pub fn new(config: &AppConfig, http: Arc<dyn HttpClient>, session: SessionContext) -> Self {
        let base_url = config.api_base_url.trim_end_matches('/').to_string();
        Self {
            base_url: StoredValue::new(base_url),
            auth_mode: config.auth_mode,
            http: StoredValue::new(http),
            session,
        }
    }

    pub fn session(&self) -> SessionContext {
        self.session
    }

    fn url(&self, path: &str, query: &[(&'static str, String)]) -> String {
        let mut url = self.base_url.with_value(|base| {
            if path.starts_with('/') {
                format!("{}{}", base, path)
            } else {
                format!("{}/{}", base, path)
            }
        });

        for (i, (key, value)) in query.iter().enumerate() {
            url.push(if i == 0 { '?' } else { '&' });
            url.push_str(key);
            url.push('=');
            url.push_str(&encode_query_value(value));
        }
        url
    }

    /// Send a typed request and decode its response.
    pub async fn send<R: ApiRequest>(&self, req: &R) -> ClientResult<R::Response> {
        if self.auth_mode == AuthMode::Cookie && R::METHOD.is_mutation() {
            self.ensure_csrf_cookie().await?;
        }
        let response = self.dispatch(req).await?;
        response
            .json::<R::Response>()
            .map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// Make sure the anti-forgery cookie exists before a state change.
    async fn ensure_csrf_cookie(&self) -> ClientResult<()> {
        let http = self.http.get_value();
        if http.cookie(COOKIE_XSRF_TOKEN).is_some() {
            return Ok(());
        }
        log::debug!("fetching anti-forgery cookie");
        self.dispatch(&CsrfCookieRequest).await.map(|_| ())
    }

    fn build<R: ApiRequest>(&self, req: &R) -> ClientResult<HttpRequest> {
        let url = self.url(&req.path(), &req.query());
        let mut request =
            HttpRequest::new(&url, R::METHOD).with_header("Accept", "application/json");

        if req.has_body() {
            let body = serde_json::to_string(req).map_err(|e| ClientError::Decode(e.to_string()))?;
            request = request
                .with_header("Content-Type", "application/json")
                .with_body(body);
        }

        if let Some(token) = self.session.token() {
            request = request.with_header(HEADER_AUTHORIZATION, &format!("Bearer {}", token));
        }

        if self.auth_mode == AuthMode::Cookie {
            if let Some(xsrf) = self.http.get_value().cookie(COOKIE_XSRF_TOKEN) {
                request = request.with_header(HEADER_XSRF_TOKEN, &xsrf);
            }
        }

        Ok(request)
    }

    async fn dispatch<R: ApiRequest>(&self, req: &R) -> ClientResult<HttpResponse> {
        let request = self.build(req)?;
        log::debug!("{} {}", request.method.as_str(), req.path());

        let http = self.http.get_value();
        let response = http.send(request).await?;

        if response.ok() {
            return Ok(response);
        }
        Err(self.classify(R::METHOD.as_str(), &req.path(), response))
    }

    fn classify(&self, method: &str, path: &str, response: HttpResponse) -> ClientError {
        let status = response.status;
        match status {
            401 | 403 => {
                if self.session.is_authenticated() {
                    log::warn!("{method} {path} rejected with {status}, clearing session");
                } else {
                    log::warn!("{method} {path} rejected with {status}");
                }
                self.session.invalidate();
                ClientError::Unauthorized { status }
            }
            // any status may carry field errors, not only 422
            _ => match response.json::<ValidationErrors>() {
                Ok(errors) => {
                    log::debug!("{method} {path} rejected with {status}: validation errors");
                    ClientError::Validation(errors)
                }
                Err(_) => {
                    log::warn!("{method} {path} failed with {status}");
                    ClientError::Status {
                        status,
                        message: response.json::<MessageBody>().ok().map(|b| b.message),
                    }
                }
            },
        }
    }
}
