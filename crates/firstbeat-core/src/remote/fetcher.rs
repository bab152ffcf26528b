use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode, Url};
use tracing::debug;

use crate::error::{RemoteConfigError, Result};

/// HTTP request timeout in seconds, enforced by the transport.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// One network retrieval of a resource. Implementations return the raw body
/// and leave decoding to the caller.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// `RemoteSource` over HTTPS.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client })
    }

    /// Build a fetcher around an existing client, sharing its connection pool.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    fn parse_url(url: &str) -> Result<Url> {
        let parsed = Url::parse(url)
            .map_err(|e| RemoteConfigError::InvalidUrl(format!("{}: {}", url, e)))?;
        match parsed.scheme() {
            "https" | "http" => Ok(parsed),
            other => Err(RemoteConfigError::InvalidUrl(format!(
                "{}: unsupported scheme {}",
                url, other
            ))),
        }
    }
}

#[async_trait]
impl RemoteSource for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let parsed = Self::parse_url(url)?;

        let response = self
            .client
            .get(parsed)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        // Anything but a plain 200 (including other 2xx) is rejected
        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteConfigError::bad_status(url, status, &body));
        }

        let bytes = response.bytes().await?;
        debug!(url, bytes = bytes.len(), "Fetched remote payload");
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve exactly one HTTP response on a local port and return its URL.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });

        format!("http://{}/json/formats.json", addr)
    }

    #[tokio::test]
    async fn test_fetch_returns_raw_body_on_200() {
        let url = serve_once("200 OK", r#"[{"id": "harold"}]"#).await;
        let fetcher = HttpFetcher::new().unwrap();

        let bytes = fetcher.fetch(&url).await.unwrap();
        assert_eq!(bytes, br#"[{"id": "harold"}]"#.to_vec());
    }

    #[tokio::test]
    async fn test_fetch_with_shared_client() {
        let client = Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        let first = HttpFetcher::with_client(client.clone());
        let second = HttpFetcher::with_client(client);

        let url = serve_once("200 OK", "[]").await;
        assert_eq!(first.fetch(&url).await.unwrap(), b"[]".to_vec());
        let url = serve_once("500 Internal Server Error", "boom").await;
        assert_eq!(second.fetch(&url).await.unwrap_err().category(), "bad_status");
    }

    #[tokio::test]
    async fn test_fetch_rejects_non_200_status() {
        let url = serve_once("404 Not Found", "missing").await;
        let fetcher = HttpFetcher::new().unwrap();

        match fetcher.fetch(&url).await {
            Err(RemoteConfigError::BadStatus { status, body, .. }) => {
                assert_eq!(status, 404);
                assert_eq!(body, "missing");
            }
            other => panic!("expected BadStatus, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_rejects_other_success_codes() {
        let url = serve_once("203 Non-Authoritative Information", "[]").await;
        let fetcher = HttpFetcher::new().unwrap();

        let err = fetcher.fetch(&url).await.unwrap_err();
        assert_eq!(err.category(), "bad_status");
    }

    #[tokio::test]
    async fn test_fetch_connection_refused_is_transport_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let fetcher = HttpFetcher::new().unwrap();
        let err = fetcher
            .fetch(&format!("http://{}/json/formats.json", addr))
            .await
            .unwrap_err();
        assert_eq!(err.category(), "transport_failure");
    }

    #[tokio::test]
    async fn test_fetch_invalid_url() {
        let fetcher = HttpFetcher::new().unwrap();

        let err = fetcher.fetch("not a url").await.unwrap_err();
        assert_eq!(err.category(), "invalid_url");

        let err = fetcher.fetch("ftp://example.com/formats.json").await.unwrap_err();
        assert_eq!(err.category(), "invalid_url");
    }
}
