//! Upstream transport: the [`MarketDataSource`] seam and its `reqwest` implementation.

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::endpoints::Endpoint;
use crate::error::{ClientError, ClientResult};

/// Anything that can answer an [`Endpoint`] with a JSON body.
///
/// Implementations perform exactly one upstream request per call and never
/// retry or cache.
#[async_trait]
pub trait MarketDataSource: Debug + Send + Sync {
    async fn fetch(&self, endpoint: &Endpoint) -> ClientResult<Value>;
}

/// HTTP client for the CoinGecko and DefiLlama public APIs.
#[derive(Debug, Clone)]
pub struct RestMarketDataClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl RestMarketDataClient {
    /// Validate `config` and build the underlying connection pool.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { http, config })
    }

    /// GET `url` and parse the body as JSON.
    ///
    /// Non-2xx responses become [`ClientError::Status`] carrying the canonical
    /// reason phrase; the body of a failed response is discarded.
    pub async fn get_json(&self, url: Url) -> ClientResult<Value> {
        let response = self
            .http
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let err = ClientError::status(
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown Status"),
            );
            warn!(%url, status = status.as_u16(), transient = err.is_transient(), "Upstream returned error status");
            return Err(err);
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl MarketDataSource for RestMarketDataClient {
    async fn fetch(&self, endpoint: &Endpoint) -> ClientResult<Value> {
        let url = endpoint.url(&self.config)?;
        debug!(upstream = %endpoint.upstream(), %url, "Fetching upstream endpoint");
        self.get_json(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve a single canned HTTP response; the join handle yields the request line.
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
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
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();

            String::from_utf8_lossy(&request)
                .lines()
                .next()
                .unwrap_or_default()
                .to_string()
        });

        (format!("http://{addr}"), handle)
    }

    fn client_for(base: &str) -> RestMarketDataClient {
        RestMarketDataClient::new(ClientConfig {
            coingecko_url: format!("{base}/api/v3"),
            defillama_url: base.to_string(),
            stablecoins_url: base.to_string(),
            timeout_secs: 5,
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_returns_parsed_body() {
        let (base, server) = serve_once("200 OK", r#"[[1700000000000, 1.0, 2.0, 0.5, 1.5]]"#).await;
        let client = client_for(&base);

        let value = client
            .fetch(&Endpoint::CoinOhlc {
                id: "bitcoin".to_string(),
                days: 30,
            })
            .await
            .unwrap();

        assert_eq!(value, serde_json::json!([[1700000000000u64, 1.0, 2.0, 0.5, 1.5]]));
        assert_eq!(
            server.await.unwrap(),
            "GET /api/v3/coins/bitcoin/ohlc?vs_currency=usd&days=30 HTTP/1.1"
        );
    }

    #[tokio::test]
    async fn test_fetch_hits_defillama_origin() {
        let (base, server) = serve_once("200 OK", r#"{"data": []}"#).await;
        let client = client_for(&base);

        client.fetch(&Endpoint::Pools).await.unwrap();
        assert_eq!(server.await.unwrap(), "GET /pools HTTP/1.1");
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let (base, _server) = serve_once("404 Not Found", r#"{"error":"coin not found"}"#).await;
        let client = client_for(&base);

        let err = client
            .fetch(&Endpoint::CoinDetail {
                id: "nope".to_string(),
            })
            .await
            .unwrap_err();

        match &err {
            ClientError::Status { status, reason } => {
                assert_eq!(*status, 404);
                assert_eq!(reason, "Not Found");
            }
            other => panic!("Expected Status error, got {other:?}"),
        }
        assert_eq!(err.to_string(), "HTTP 404: Not Found");
    }

    #[tokio::test]
    async fn test_rate_limited_status_is_transient() {
        let (base, _server) = serve_once("429 Too Many Requests", "{}").await;
        let client = client_for(&base);

        let err = client.fetch(&Endpoint::Trending).await.unwrap_err();
        assert!(err.is_transient());
        assert!(err.to_string().contains("429"));
    }

    #[tokio::test]
    async fn test_invalid_json_is_parse_error() {
        let (base, _server) = serve_once("200 OK", "<html>maintenance</html>").await;
        let client = client_for(&base);

        let err = client.fetch(&Endpoint::Chains).await.unwrap_err();
        assert!(matches!(err, ClientError::Parse(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_http_error() {
        // Bind then drop to get a port nothing listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_for(&format!("http://{addr}"));
        let err = client.fetch(&Endpoint::Protocols).await.unwrap_err();
        assert!(matches!(err, ClientError::Http(_)));
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let err = RestMarketDataClient::new(ClientConfig {
            timeout_secs: 0,
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }
}
