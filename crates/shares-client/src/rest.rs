//! HTTP envelope shared by every resource API call.
//!
//! All verbs inject the microversion header (client default, overridable
//! per call), optionally mark the request experimental, and validate that
//! the backend echoed a request-correlation id before the caller ever
//! sees the response. Status-code expectations are enforced here too, so
//! resource methods state their documented code once and get the
//! NotFound/Forbidden/UnexpectedStatus mapping for free.

use reqwest::{Client, Method, StatusCode};
use std::time::Duration;

use crate::error::{truncate_body, ApiError};
use crate::microversion::Microversion;

/// Microversion request header.
pub const API_MICROVERSION_HEADER: &str = "x-shares-api-version";

/// Opt-in header for experimental APIs (share groups, admin migration).
pub const API_EXPERIMENTAL_HEADER: &str = "x-shares-api-experimental";

/// Correlation id header required on every response.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Pre-issued auth token header.
pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// Per-request envelope options.
#[derive(Debug, Default, Clone)]
pub struct RequestOpts {
    /// Microversion override; the client default is used when `None`.
    pub version: Option<Microversion>,
    /// Send the experimental-API header.
    pub experimental: bool,
    /// Query string parameters.
    pub query: Vec<(String, String)>,
}

impl RequestOpts {
    pub fn version(version: Microversion) -> Self {
        Self {
            version: Some(version),
            ..Default::default()
        }
    }

    pub fn experimental() -> Self {
        Self {
            experimental: true,
            ..Default::default()
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}

/// Verb-level REST client for one service endpoint.
#[derive(Debug, Clone)]
pub struct RestClient {
    base_url: String,
    http: Client,
    auth_token: Option<String>,
    default_version: Microversion,
}

impl RestClient {
    pub fn new(
        base_url: impl Into<String>,
        auth_token: Option<String>,
        default_version: Microversion,
    ) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
            auth_token,
            default_version,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn default_version(&self) -> Microversion {
        self.default_version
    }

    /// Service root with any trailing `/v<N>` or `/v<N>.<M>` path segment
    /// stripped; microversion discovery goes here rather than to a
    /// versioned endpoint.
    pub fn base_root(&self) -> String {
        match self.base_url.rsplit_once('/') {
            Some((root, last)) if is_version_segment(last) => root.to_string(),
            _ => self.base_url.clone(),
        }
    }

    pub async fn get(
        &self,
        path: &str,
        expected: StatusCode,
        opts: RequestOpts,
    ) -> Result<String, ApiError> {
        self.send(Method::GET, path, None, expected, opts).await
    }

    pub async fn post(
        &self,
        path: &str,
        body: serde_json::Value,
        expected: StatusCode,
        opts: RequestOpts,
    ) -> Result<String, ApiError> {
        self.send(Method::POST, path, Some(body), expected, opts).await
    }

    pub async fn put(
        &self,
        path: &str,
        body: serde_json::Value,
        expected: StatusCode,
        opts: RequestOpts,
    ) -> Result<String, ApiError> {
        self.send(Method::PUT, path, Some(body), expected, opts).await
    }

    pub async fn patch(
        &self,
        path: &str,
        body: serde_json::Value,
        expected: StatusCode,
        opts: RequestOpts,
    ) -> Result<String, ApiError> {
        self.send(Method::PATCH, path, Some(body), expected, opts).await
    }

    pub async fn delete(
        &self,
        path: &str,
        body: Option<serde_json::Value>,
        expected: StatusCode,
        opts: RequestOpts,
    ) -> Result<String, ApiError> {
        self.send(Method::DELETE, path, body, expected, opts).await
    }

    pub async fn head(
        &self,
        path: &str,
        expected: StatusCode,
        opts: RequestOpts,
    ) -> Result<(), ApiError> {
        self.send(Method::HEAD, path, None, expected, opts).await?;
        Ok(())
    }

    /// Microversion negotiation probe: GET against the service root,
    /// with the version header either set or omitted entirely.
    pub async fn discover_versions(
        &self,
        version: Option<Microversion>,
    ) -> Result<(StatusCode, String), ApiError> {
        let url = self.base_root();
        let mut request = self.http.get(&url);
        if let Some(version) = version {
            request = request.header(API_MICROVERSION_HEADER, version.to_string());
        }
        if let Some(token) = &self.auth_token {
            request = request.header(AUTH_TOKEN_HEADER, token);
        }
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Ok((status, body))
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        expected: StatusCode,
        opts: RequestOpts,
    ) -> Result<String, ApiError> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let version = opts.version.unwrap_or(self.default_version);

        let mut request = self
            .http
            .request(method.clone(), &url)
            .header(API_MICROVERSION_HEADER, version.to_string());
        if opts.experimental {
            request = request.header(API_EXPERIMENTAL_HEADER, "true");
        }
        if let Some(token) = &self.auth_token {
            request = request.header(AUTH_TOKEN_HEADER, token);
        }
        if !opts.query.is_empty() {
            request = request.query(&opts.query);
        }
        if let Some(body) = &body {
            request = request.json(body);
        }

        tracing::debug!(%method, %url, %version, "sending request");
        let response = request.send().await?;

        if response.headers().get(REQUEST_ID_HEADER).is_none() {
            return Err(ApiError::MissingRequestId { url });
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status == expected {
            return Ok(body);
        }
        let body = truncate_body(&body);
        match status {
            StatusCode::NOT_FOUND => Err(ApiError::NotFound {
                method: method.to_string(),
                url,
                body,
            }),
            StatusCode::FORBIDDEN => Err(ApiError::Forbidden {
                method: method.to_string(),
                url,
                body,
            }),
            actual => Err(ApiError::UnexpectedStatus {
                method: method.to_string(),
                url,
                expected: expected.as_u16(),
                actual: actual.as_u16(),
                body,
            }),
        }
    }
}

fn is_version_segment(segment: &str) -> bool {
    let Some(rest) = segment.strip_prefix('v') else {
        return false;
    };
    !rest.is_empty()
        && rest
            .chars()
            .all(|c| c.is_ascii_digit() || c == '.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_root_strips_version_segment() {
        let client =
            RestClient::new("http://localhost:8786/v2", None, Microversion::new(2, 55)).unwrap();
        assert_eq!(client.base_root(), "http://localhost:8786");

        let client =
            RestClient::new("http://localhost:8786/share/v2.1/", None, Microversion::new(2, 55))
                .unwrap();
        assert_eq!(client.base_root(), "http://localhost:8786/share");
    }

    #[test]
    fn test_base_root_keeps_unversioned_url() {
        let client =
            RestClient::new("http://localhost:8786", None, Microversion::new(2, 55)).unwrap();
        assert_eq!(client.base_root(), "http://localhost:8786");
    }

    #[test]
    fn test_version_segment_detection() {
        assert!(is_version_segment("v1"));
        assert!(is_version_segment("v2.1"));
        assert!(!is_version_segment("vault"));
        assert!(!is_version_segment("shares"));
        assert!(!is_version_segment("v"));
    }
}
