//! The HTTP seam. Clients describe requests as [`ApiRequest`] values and a
//! [`Transport`] turns them into decoded JSON bodies.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::{Client, Method, Url};
use serde_json::Value;
use tracing::debug;

use crate::envelope::message_of;
use crate::error::ApiError;

const CLIENT_UA: &str = concat!("AdminConsole/", env!("CARGO_PKG_VERSION"));

/// Which stored token a request authenticates with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Credential {
    #[default]
    AccessToken,
    RefreshToken,
    None,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the API base, e.g. `board/notices/3/`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub credential: Credential,
    /// Filled in by the context from the token store.
    pub bearer: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            credential: Credential::default(),
            bearer: None,
        }
    }

    pub fn query(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query = pairs;
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn credential(mut self, credential: Credential) -> Self {
        self.credential = credential;
        self
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends the request and returns the decoded body. An empty body is `null`.
    async fn execute(&self, request: ApiRequest) -> Result<Value, ApiError>;
}

/// reqwest-backed transport against one API base URL.
pub struct HttpTransport {
    client: Client,
    base: Url,
}

impl HttpTransport {
    pub fn new(base: Url, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base: with_trailing_slash(base),
        })
    }

    /// Resolves an endpoint path below the base, keeping any base path prefix.
    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::Malformed(format!("bad endpoint {path:?}: {e}")))
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let url = self.endpoint(&request.path)?;
        debug!(method = %request.method, %url, "sending request");

        let mut builder = self
            .client
            .request(request.method.clone(), url)
            .header(USER_AGENT, CLIENT_UA)
            .header(ACCEPT, "application/json");
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let resp = builder.send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            match serde_json::from_str(&text) {
                Ok(v) => v,
                Err(e) if status.is_success() => return Err(e.into()),
                Err(_) => Value::String(text),
            }
        };
        debug!(status = status.as_u16(), "response received");

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: message_of(&body),
            });
        }
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("http://localhost:8000", "board/notices/", "http://localhost:8000/board/notices/")]
    #[case("http://localhost:8000/api", "/board/notices/3/", "http://localhost:8000/api/board/notices/3/")]
    #[case("https://admin.example.com/api/v1/", "adminMember/login", "https://admin.example.com/api/v1/adminMember/login")]
    fn endpoints_keep_the_base_prefix(#[case] base: &str, #[case] path: &str, #[case] expected: &str) {
        let transport = HttpTransport::new(base.parse().unwrap(), Duration::from_secs(5)).unwrap();
        assert_eq!(transport.endpoint(path).unwrap().as_str(), expected);
    }

    #[test]
    fn builder_sets_fields() {
        let req = ApiRequest::new(Method::POST, "adminMember/tokenrefresh")
            .credential(Credential::RefreshToken)
            .json(serde_json::json!({}));
        assert_eq!(req.credential, Credential::RefreshToken);
        assert!(req.bearer.is_none());
        assert!(req.query.is_empty());
    }
}
