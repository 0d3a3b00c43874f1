//! Two-phase HTTP client
//!
//! The hosting service hides assets behind an indirection layer: the stored
//! per-item link is not the asset itself. POSTing to it (empty body) returns
//! the short-lived direct URL as a plain-text response body, and only a GET
//! against that URL streams the actual bytes. Both phases run sequentially on
//! the calling worker; the client holds no concurrency of its own.
//!
//! No retries happen here. A transport error or non-200 status on either
//! phase is terminal for the record; re-running against the durable manifest
//! is the recovery path.

use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::constants::http;
use crate::errors::{FetchError, FetchPhase};

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Timeout applied to each request phase, response body included.
    ///
    /// Without this a stalled peer holds a worker slot forever; with it a
    /// hung connection surfaces as a fetch error for that one record.
    pub phase_timeout: Duration,
    /// Connection establishment timeout
    pub connect_timeout: Duration,
    /// Connection pool idle timeout
    pub pool_idle_timeout: Duration,
    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            phase_timeout: http::PHASE_TIMEOUT,
            connect_timeout: http::CONNECT_TIMEOUT,
            pool_idle_timeout: http::POOL_IDLE_TIMEOUT,
            user_agent: http::USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    /// Build the underlying reqwest client from this configuration
    pub fn build_http_client(&self) -> reqwest::Result<Client> {
        Client::builder()
            .timeout(self.phase_timeout)
            .connect_timeout(self.connect_timeout)
            .pool_idle_timeout(self.pool_idle_timeout)
            .user_agent(self.user_agent.clone())
            .build()
    }
}

/// Client implementing the resolve-then-fetch protocol
#[derive(Debug, Clone)]
pub struct MemoriesClient {
    client: Client,
}

impl MemoriesClient {
    /// Create a client with the given configuration
    pub fn new(config: &ClientConfig) -> reqwest::Result<Self> {
        Ok(Self {
            client: config.build_http_client()?,
        })
    }

    /// Phase 1: resolve the opaque per-item link into a direct URL
    ///
    /// Issues a POST with an empty body. Requires HTTP 200; the whole
    /// response body, as plain text, is the direct download URL. A body that
    /// does not parse as a URL fails closed as
    /// [`FetchError::MalformedRedirect`] rather than being passed along.
    pub async fn resolve(&self, source_link: &str) -> Result<Url, FetchError> {
        let response = self
            .client
            .post(source_link)
            .header(reqwest::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                phase: FetchPhase::Resolve,
                source,
            })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(FetchError::Status {
                phase: FetchPhase::Resolve,
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| FetchError::Transport {
                phase: FetchPhase::Resolve,
                source,
            })?;

        let trimmed = body.trim();
        Url::parse(trimmed).map_err(|_| FetchError::MalformedRedirect {
            body: truncate_for_log(trimmed),
        })
    }

    /// Phase 2: fetch the asset bytes from the resolved URL
    ///
    /// Requires HTTP 200 and hands the response back for streaming; the
    /// caller drains `bytes_stream()` into its sink so large videos never
    /// sit fully in memory.
    pub async fn fetch(&self, url: &Url) -> Result<reqwest::Response, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                phase: FetchPhase::Fetch,
                source,
            })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(FetchError::Status {
                phase: FetchPhase::Fetch,
                status: status.as_u16(),
            });
        }

        Ok(response)
    }
}

/// Bound a response body excerpt for error messages
fn truncate_for_log(body: &str) -> String {
    const MAX: usize = 120;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let cut = body
            .char_indices()
            .take_while(|(i, _)| *i < MAX)
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        format!("{}...", &body[..cut])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_bytes, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client() -> MemoriesClient {
        MemoriesClient::new(&ClientConfig {
            phase_timeout: Duration::from_secs(2),
            connect_timeout: Duration::from_secs(2),
            ..ClientConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_resolve_returns_body_as_url() {
        let server = MockServer::start().await;
        let direct_url = format!("{}/assets/item.jpg", server.uri());

        Mock::given(method("POST"))
            .and(path("/dmd/memories"))
            .and(body_bytes(Vec::new()))
            .respond_with(ResponseTemplate::new(200).set_body_string(direct_url.clone()))
            .mount(&server)
            .await;

        let client = test_client();
        let resolved = client
            .resolve(&format!("{}/dmd/memories", server.uri()))
            .await
            .unwrap();
        assert_eq!(resolved.as_str(), direct_url);
    }

    #[tokio::test]
    async fn test_resolve_trims_whitespace() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("https://cdn.example.com/x\n"))
            .mount(&server)
            .await;

        let client = test_client();
        let resolved = client.resolve(&server.uri()).await.unwrap();
        assert_eq!(resolved.as_str(), "https://cdn.example.com/x");
    }

    #[tokio::test]
    async fn test_resolve_non_200_is_status_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = test_client();
        let result = client.resolve(&server.uri()).await;
        match result {
            Err(FetchError::Status { phase, status }) => {
                assert_eq!(phase, FetchPhase::Resolve);
                assert_eq!(status, 500);
            }
            other => panic!("expected Status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_resolve_malformed_body_fails_closed() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not a url</html>"))
            .mount(&server)
            .await;

        let client = test_client();
        let result = client.resolve(&server.uri()).await;
        assert!(matches!(result, Err(FetchError::MalformedRedirect { .. })));
    }

    #[tokio::test]
    async fn test_fetch_returns_asset_response() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/assets/item.jpg"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jpeg-bytes".to_vec()))
            .mount(&server)
            .await;

        let client = test_client();
        let url = Url::parse(&format!("{}/assets/item.jpg", server.uri())).unwrap();
        let response = client.fetch(&url).await.unwrap();
        assert_eq!(response.bytes().await.unwrap().as_ref(), b"jpeg-bytes");
    }

    #[tokio::test]
    async fn test_fetch_non_200_is_status_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = test_client();
        let url = Url::parse(&format!("{}/gone", server.uri())).unwrap();
        let result = client.fetch(&url).await;
        match result {
            Err(FetchError::Status { phase, status }) => {
                assert_eq!(phase, FetchPhase::Fetch);
                assert_eq!(status, 404);
            }
            other => panic!("expected Status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_hung_resolve_surfaces_as_transport_error() {
        let server = MockServer::start().await;

        // Delay well past the client's phase timeout
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("https://cdn.example.com/x")
                    .set_delay(Duration::from_secs(10)),
            )
            .mount(&server)
            .await;

        let client = MemoriesClient::new(&ClientConfig {
            phase_timeout: Duration::from_millis(200),
            connect_timeout: Duration::from_millis(200),
            ..ClientConfig::default()
        })
        .unwrap();

        let result = client.resolve(&server.uri()).await;
        match result {
            Err(FetchError::Transport { phase, .. }) => assert_eq!(phase, FetchPhase::Resolve),
            other => panic!("expected Transport error, got {:?}", other),
        }
    }

    #[test]
    fn test_truncate_for_log() {
        assert_eq!(truncate_for_log("short"), "short");
        let long = "x".repeat(500);
        let truncated = truncate_for_log(&long);
        assert!(truncated.len() < 200);
        assert!(truncated.ends_with("..."));
    }
}
