// src/services/fetcher.rs

//! Retrying HTTP fetcher.
//!
//! Wraps a shared `reqwest::Client` carrying a fixed browser-like header
//! profile and retries failed requests with exponential backoff and jitter,
//! up to a configured bound. Only HTTP 200 counts as success; every other
//! status and every transport error is retried identically.

use std::time::Duration;

use rand::Rng;
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue};

use crate::error::{AppError, Result};
use crate::models::{CrawlerConfig, RetryConfig};

/// HTTP client with a fixed request profile and bounded retries.
pub struct Fetcher {
    client: reqwest::Client,
    retry: RetryConfig,
}

impl Fetcher {
    /// Build a fetcher from crawler settings.
    ///
    /// The header profile is installed once as client defaults and never
    /// changes for the lifetime of the run; connections are reused through
    /// the shared client.
    pub fn new(config: &CrawlerConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .default_headers(request_profile())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            retry: config.retry.clone(),
        })
    }

    /// Fetch a URL, returning the body of the first 200 response.
    ///
    /// Exhausting the retry bound yields [`AppError::Fetch`] carrying the
    /// attempt count and the last observed failure.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let max_attempts = self.retry.max_attempts;
        let mut last_failure = String::from("no attempt made");

        for attempt in 0..max_attempts {
            if attempt > 0 {
                tokio::time::sleep(backoff_delay(&self.retry, attempt)).await;
            }

            match self.client.get(url).send().await {
                Ok(response) if response.status() == StatusCode::OK => {
                    match response.text().await {
                        Ok(body) => return Ok(body),
                        Err(e) => last_failure = format!("body read failed: {e}"),
                    }
                }
                Ok(response) => {
                    last_failure = format!("unexpected status {}", response.status());
                }
                Err(e) => last_failure = e.to_string(),
            }

            log::warn!(
                "Fetch attempt {}/{} failed for {}: {}",
                attempt + 1,
                max_attempts,
                url,
                last_failure
            );
        }

        Err(AppError::fetch(url, max_attempts, last_failure))
    }
}

/// Backoff before retry number `attempt` (1-based): exponential in the
/// attempt, capped, with full jitter.
fn backoff_delay(retry: &RetryConfig, attempt: u32) -> Duration {
    let exp = attempt.saturating_sub(1).min(16);
    let ceiling = retry
        .base_delay_ms
        .saturating_mul(1u64 << exp)
        .min(retry.max_delay_ms)
        .max(1);
    let jittered = rand::thread_rng().gen_range(1..=ceiling);
    Duration::from_millis(jittered)
}

/// Fixed header set attached to every outbound call.
fn request_profile() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("Connection", HeaderValue::from_static("keep-alive"));
    headers.insert("Cache-Control", HeaderValue::from_static("max-age=0"));
    headers.insert("Upgrade-Insecure-Requests", HeaderValue::from_static("1"));
    headers.insert("csrf-token", HeaderValue::from_static(""));
    headers.insert(
        "Accept",
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,\
             image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.9",
        ),
    );
    headers
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    fn test_config(max_attempts: u32) -> CrawlerConfig {
        CrawlerConfig {
            retry: RetryConfig {
                max_attempts,
                base_delay_ms: 1,
                max_delay_ms: 2,
            },
            ..CrawlerConfig::default()
        }
    }

    /// Serve a fixed HTTP response to every connection, counting hits.
    async fn serve_fixed(listener: TcpListener, response: &'static str, hits: Arc<AtomicU32>) {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            hits.fetch_add(1, Ordering::SeqCst);
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    }

    #[tokio::test]
    async fn test_fetch_returns_body_on_200() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicU32::new(0));
        tokio::spawn(serve_fixed(
            listener,
            "HTTP/1.1 200 OK\r\ncontent-length: 2\r\nconnection: close\r\n\r\nok",
            Arc::clone(&hits),
        ));

        let fetcher = Fetcher::new(&test_config(3)).unwrap();
        let body = fetcher.fetch(&format!("http://{addr}/")).await.unwrap();
        assert_eq!(body, "ok");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fetch_exhausts_bound_on_500() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicU32::new(0));
        tokio::spawn(serve_fixed(
            listener,
            "HTTP/1.1 500 Internal Server Error\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
            Arc::clone(&hits),
        ));

        let fetcher = Fetcher::new(&test_config(3)).unwrap();
        let url = format!("http://{addr}/");
        let err = fetcher.fetch(&url).await.unwrap_err();

        assert!(err.is_fetch());
        match err {
            AppError::Fetch { attempts, .. } => assert_eq!(attempts, 3),
            other => panic!("unexpected error: {other}"),
        }
        // Exactly the configured bound, never more.
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_fetch_fails_when_unreachable() {
        // Bind then drop to get a port with no listener.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let fetcher = Fetcher::new(&test_config(2)).unwrap();
        let err = fetcher.fetch(&format!("http://{addr}/")).await.unwrap_err();
        assert!(err.is_fetch());
    }

    #[test]
    fn test_backoff_respects_cap() {
        let retry = RetryConfig {
            max_attempts: 31,
            base_delay_ms: 1000,
            max_delay_ms: 3000,
        };
        for attempt in 1..40 {
            let delay = backoff_delay(&retry, attempt);
            assert!(delay >= Duration::from_millis(1));
            assert!(delay <= Duration::from_millis(3000));
        }
    }

    #[test]
    fn test_backoff_first_retry_within_base() {
        let retry = RetryConfig {
            max_attempts: 31,
            base_delay_ms: 500,
            max_delay_ms: 3000,
        };
        for _ in 0..50 {
            assert!(backoff_delay(&retry, 1) <= Duration::from_millis(500));
        }
    }
}
