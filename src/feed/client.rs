// Feed HTTP client.
// Handles request headers, timeouts, status checks, and body decoding.

use std::time::Duration;

use reqwest::{
    Client, Response,
    header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT},
};
use tracing::debug;

use crate::error::{FeedError, Result};

use super::types::FeedPayload;

/// Default request timeout. A hung request would otherwise block the load forever.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Source of feed payloads.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Fetch and decode the feed at `endpoint`.
    async fn fetch(&self, endpoint: &str) -> Result<FeedPayload>;
}

/// reqwest-backed transport.
pub struct FeedClient {
    client: Client,
}

impl FeedClient {
    /// Create a client with the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("article-feed/", env!("CARGO_PKG_VERSION"))),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(FeedError::Http)?;

        Ok(Self { client })
    }

    /// Check response status. Anything outside 2xx is a failure.
    fn check_response(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(FeedError::Status {
                status,
                url: response.url().to_string(),
            })
        }
    }
}

impl Transport for FeedClient {
    async fn fetch(&self, endpoint: &str) -> Result<FeedPayload> {
        debug!(endpoint, "fetching feed");
        let response = self.client.get(endpoint).send().await?;
        let response = Self::check_response(response)?;

        // Decode separately so a bad body surfaces as a JSON error, not an HTTP one.
        let body = response.text().await?;
        let payload: FeedPayload = serde_json::from_str(&body)?;
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{
        "publication": "The Pirate Times",
        "tagline": "All the news that's fit to plunder",
        "articles": [
            {"title": "Ahoy", "author": "Anne Bonny", "article": "Yo ho."},
            {"title": "Parley", "author": "Calico Jack", "article": "Terms."}
        ]
    }"#;

    #[tokio::test]
    async fn test_fetch_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/pirates.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(BODY)
            .create_async()
            .await;

        let client = FeedClient::new(DEFAULT_TIMEOUT).unwrap();
        let feed = client
            .fetch(&format!("{}/pirates.json", server.url()))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(feed.publication, "The Pirate Times");
        assert_eq!(feed.articles.len(), 2);
        assert_eq!(feed.articles[1].title, "Parley");
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/fail.json")
            .with_status(404)
            .create_async()
            .await;

        let client = FeedClient::new(DEFAULT_TIMEOUT).unwrap();
        let err = client
            .fetch(&format!("{}/fail.json", server.url()))
            .await
            .unwrap_err();

        match err {
            FeedError::Status { status, .. } => assert_eq!(status.as_u16(), 404),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/pirates.json")
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let client = FeedClient::new(DEFAULT_TIMEOUT).unwrap();
        let err = client
            .fetch(&format!("{}/pirates.json", server.url()))
            .await
            .unwrap_err();

        assert!(matches!(err, FeedError::Json(_)));
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        // Bind then drop so the port is known to be closed
        let addr = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();

        let client = FeedClient::new(Duration::from_secs(2)).unwrap();
        let err = client.fetch(&format!("http://{addr}/pirates.json")).await;
        assert!(matches!(err, Err(FeedError::Http(_))));
    }

    #[tokio::test]
    async fn test_fetch_times_out() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        // Accept connections and never answer
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let client = FeedClient::new(Duration::from_millis(300)).unwrap();
        let err = client
            .fetch(&format!("http://{addr}/pirates.json"))
            .await
            .unwrap_err();

        match err {
            FeedError::Http(e) => assert!(e.is_timeout(), "{e}"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
