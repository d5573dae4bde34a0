//! HTTP colorteller client.
//!
//! # Responsibilities
//! - Issue GET http://<endpoint> over a pooled hyper client
//! - Enforce the upstream deadline over connect, headers and body
//! - Forward the inbound request id

use axum::body::Body;
use axum::http::{header, uri::InvalidUri, HeaderValue, Method, Request, Uri};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use std::time::Duration;

use crate::config::GatewayConfig;
use crate::http::request::X_REQUEST_ID;
use crate::stats::Color;
use crate::upstream::{classify, ColorSource, FetchError};

/// Largest colorteller body the gateway will read.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// `ColorSource` backed by a live colorteller over HTTP.
#[derive(Clone)]
pub struct HttpColorTeller {
    client: Client<HttpConnector, Body>,
    endpoint: String,
    uri: Uri,
    timeout: Duration,
}

impl HttpColorTeller {
    /// Create a client for `endpoint` (host:port, no scheme).
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, InvalidUri> {
        let uri: Uri = format!("http://{}", endpoint).parse()?;
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            uri,
            timeout,
        })
    }

    pub fn from_config(config: &GatewayConfig) -> Result<Self, InvalidUri> {
        Self::new(
            &config.color_teller_endpoint,
            Duration::from_millis(config.timeouts.upstream_ms),
        )
    }

    async fn fetch_once(&self, request_id: Option<HeaderValue>) -> Result<Color, FetchError> {
        let mut builder = Request::builder()
            .method(Method::GET)
            .uri(self.uri.clone())
            .header(header::USER_AGENT, "colorapp-gateway");
        if let Some(id) = request_id {
            builder = builder.header(X_REQUEST_ID, id);
        }
        let request = builder.body(Body::empty())?;

        let response = self.client.request(request).await?;
        let status = response.status();
        let body = axum::body::to_bytes(Body::new(response.into_body()), MAX_BODY_BYTES).await?;

        classify(status, &body)
    }
}

impl ColorSource for HttpColorTeller {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn fetch(&self, request_id: Option<HeaderValue>) -> Result<Color, FetchError> {
        tokio::time::timeout(self.timeout, self.fetch_once(request_id))
            .await
            .map_err(|_| FetchError::Timeout(self.timeout))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    async fn serve_once(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        addr.to_string()
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let endpoint = serve_once("HTTP/1.1 200 OK\r\nContent-Length: 5\r\nConnection: close\r\n\r\nblue\n").await;
        let teller = HttpColorTeller::new(&endpoint, Duration::from_secs(2)).unwrap();
        let color = teller.fetch(None).await.unwrap();
        assert_eq!(color.as_str(), "blue");
        assert_eq!(teller.endpoint(), endpoint);
    }

    #[tokio::test]
    async fn test_fetch_error_status() {
        let endpoint = serve_once("HTTP/1.1 500 Internal Server Error\r\nContent-Length: 4\r\nConnection: close\r\n\r\nboom").await;
        let teller = HttpColorTeller::new(&endpoint, Duration::from_secs(2)).unwrap();
        let err = teller.fetch(None).await.unwrap_err();
        assert_eq!(err.outcome(), "status");
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = listener.local_addr().unwrap().to_string();
        drop(listener);

        let teller = HttpColorTeller::new(&endpoint, Duration::from_secs(2)).unwrap();
        let err = teller.fetch(None).await.unwrap_err();
        assert_eq!(err.outcome(), "transport");
    }

    #[tokio::test]
    async fn test_fetch_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = listener.local_addr().unwrap().to_string();
        tokio::spawn(async move {
            // Accept and never answer.
            let _held = listener.accept().await;
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let teller = HttpColorTeller::new(&endpoint, Duration::from_millis(100)).unwrap();
        let err = teller.fetch(None).await.unwrap_err();
        assert!(matches!(err, FetchError::Timeout(_)));
    }
}
