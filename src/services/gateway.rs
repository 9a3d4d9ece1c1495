use crate::error::{ClientError, Result};
use crate::services::session_service::SessionService;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::Form;
use reqwest::{Method, Response, StatusCode};
use tracing::Instrument;
use uuid::Uuid;

static REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// A single outgoing call. Not persisted.
#[derive(Debug, Default)]
pub struct RequestConfig {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<RequestBody>,
}

#[derive(Debug)]
pub enum RequestBody {
    Json(serde_json::Value),
    Multipart(Form),
}

impl RequestConfig {
    #[must_use]
    pub fn get() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn json(method: Method, body: serde_json::Value) -> Self {
        Self { method, headers: HeaderMap::new(), body: Some(RequestBody::Json(body)) }
    }

    #[must_use]
    pub fn multipart(form: Form) -> Self {
        Self { method: Method::POST, headers: HeaderMap::new(), body: Some(RequestBody::Multipart(form)) }
    }

    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// Wraps the HTTP client: injects credentials and turns a 401 into a forced logout.
#[derive(Clone, Debug)]
pub struct ApiGateway {
    http: reqwest::Client,
    session: SessionService,
}

impl ApiGateway {
    #[must_use]
    pub const fn new(http: reqwest::Client, session: SessionService) -> Self {
        Self { http, session }
    }

    #[must_use]
    pub const fn session(&self) -> &SessionService {
        &self.session
    }

    /// Issues the request without credentials. Every status is returned as-is.
    ///
    /// # Errors
    /// Returns `Transport` if the request could not be sent.
    pub async fn request(&self, url: &str, config: RequestConfig) -> Result<Response> {
        self.dispatch(url, config.method, config.headers, config.body).await
    }

    /// Issues the request with the session's bearer token. Caller-supplied
    /// headers win over the injected ones.
    ///
    /// A 401 clears the session, navigates to the login page and fails with
    /// `SessionExpired`; callers must not retry. Every other status is
    /// returned unmodified.
    ///
    /// # Errors
    /// Returns `SessionExpired` on 401, or `Transport` if the request could not be sent.
    pub async fn authenticated_request(&self, url: &str, config: RequestConfig) -> Result<Response> {
        let headers = merge_headers(self.session.authorization_headers(), config.headers);
        let response = self.dispatch(url, config.method, headers, config.body).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::warn!(url, "API rejected credentials, ending session");
            self.session.expire();
            return Err(ClientError::SessionExpired);
        }
        Ok(response)
    }

    async fn dispatch(
        &self,
        url: &str,
        method: Method,
        mut headers: HeaderMap,
        body: Option<RequestBody>,
    ) -> Result<Response> {
        let request_id = match headers.get(&REQUEST_ID) {
            Some(existing) => existing.to_str().unwrap_or_default().to_string(),
            None => {
                let id = Uuid::new_v4().to_string();
                if let Ok(value) = HeaderValue::from_str(&id) {
                    headers.insert(REQUEST_ID.clone(), value);
                }
                id
            }
        };

        let span = tracing::debug_span!("api_request", %method, url, request_id = %request_id);
        async move {
            let mut builder = self.http.request(method, url).headers(headers);
            builder = match body {
                Some(RequestBody::Json(value)) => builder.json(&value),
                Some(RequestBody::Multipart(form)) => builder.multipart(form),
                None => builder,
            };

            let response = builder.send().await.inspect_err(|e| tracing::debug!(error = %e, "Request failed"))?;
            tracing::debug!(status = %response.status(), "Response received");
            Ok(response)
        }
        .instrument(span)
        .await
    }
}

/// Injected headers first, then caller-supplied values replace any entry with the same name.
#[must_use]
pub fn merge_headers(mut injected: HeaderMap, supplied: HeaderMap) -> HeaderMap {
    for name in supplied.keys() {
        injected.remove(name);
    }
    for (name, value) in &supplied {
        injected.append(name, value.clone());
    }
    injected
}
