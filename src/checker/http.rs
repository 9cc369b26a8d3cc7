// src/checker/http.rs
// =============================================================================
// This module checks if URLs are alive by making HTTP requests.
//
// Key functionality:
// - StatusFetcher: "give me the HTTP status of this URL" as a trait, so the
//   crawler can be tested without a network
// - HttpStatusFetcher: the reqwest implementation (GET, default redirects)
// - check_links: checks a flat list of URLs a batch at a time, every URL of a
//   batch in flight at once
//
// Rust concepts:
// - async traits: `#[async_trait]` lets trait methods be async
// - Result<T, E>: a transport failure is an Err, a 404 is an Ok(404)
// - join_all: run a group of futures concurrently and keep their order
// =============================================================================

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use futures::future::join_all;
use reqwest::Client;
use tracing::{debug, info};

use crate::crawl::{
    is_absolute, split_into_batches, CrawlError, CrawlTarget, ErrorReport, FailureReporter,
};
use crate::error::ConfigError;

// Something that can tell us the HTTP status code of a URL
#[async_trait]
pub trait StatusFetcher: Send + Sync {
    /// Ok(status) when the server answered, Err when no answer was received
    async fn fetch_status(&self, url: &str) -> Result<u16>;
}

#[async_trait]
impl<T: StatusFetcher + ?Sized> StatusFetcher for Arc<T> {
    async fn fetch_status(&self, url: &str) -> Result<u16> {
        (**self).fetch_status(url).await
    }
}

// Settings of the HTTP transport
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Per-request timeout (connect + response headers)
    pub timeout: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
        }
    }
}

// StatusFetcher backed by a reqwest client
//
// We reuse one client for all requests (connection pooling).
#[derive(Debug, Clone)]
pub struct HttpStatusFetcher {
    client: Client,
}

impl HttpStatusFetcher {
    pub fn new(options: &FetchOptions) -> Result<Self> {
        let client = Client::builder()
            .timeout(options.timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl StatusFetcher for HttpStatusFetcher {
    // Sends a GET and returns the status of the final response
    //
    // Redirects are followed with reqwest's default policy. The body is
    // never read: dropping the response closes the stream.
    async fn fetch_status(&self, url: &str) -> Result<u16> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(describe_error)?;

        Ok(response.status().as_u16())
    }
}

// Turns a reqwest error into a readable failure message
//
// reqwest errors can happen for many reasons:
// - Network timeout
// - DNS resolution failure
// - SSL certificate issues
// - Too many redirects
// The reqwest message is kept after the category.
fn describe_error(error: reqwest::Error) -> anyhow::Error {
    let error_string = error.to_string();

    let category = if error.is_timeout() {
        "Request timed out"
    } else if error.is_redirect() {
        "Too many redirects"
    } else if error.is_connect() {
        if error_string.contains("dns") {
            "Could not resolve hostname"
        } else {
            "Connection failed"
        }
    } else if error_string.contains("certificate") || error_string.contains("ssl") {
        "SSL certificate error"
    } else {
        "Request failed"
    };

    anyhow!("{}: {}", category, error_string)
}

// Checks a flat list of absolute URLs
//
// The list is cut into batches of `batch_size`. The URLs of one batch are
// checked concurrently; batches run one after another, so at most
// `batch_size` requests are in flight. Failures come back in input order,
// one entry per URL.
pub async fn check_links<F>(
    fetcher: &F,
    urls: &[String],
    batch_size: NonZeroUsize,
    reporter: &dyn FailureReporter,
) -> Result<Vec<CrawlError>, ConfigError>
where
    F: StatusFetcher + ?Sized,
{
    if let Some(url) = urls.iter().find(|url| !is_absolute(url)) {
        return Err(ConfigError::RelativeLink(url.clone()));
    }

    let batches = split_into_batches(urls, batch_size);
    info!(
        "Checking {} link(s) in {} batch(es) of up to {}",
        urls.len(),
        batches.len(),
        batch_size
    );

    let mut report = ErrorReport::new();

    for (index, batch) in batches.iter().enumerate() {
        debug!("Batch {}: {} link(s)", index + 1, batch.len());

        let checks = batch
            .iter()
            .map(|url| async move { (url, fetcher.fetch_status(url).await) });

        for (url, result) in join_all(checks).await {
            let target = CrawlTarget::seed(url.clone());
            let error = match result {
                Ok(200) => continue,
                Ok(status) => CrawlError::status(&target, status),
                Err(e) => CrawlError::transport(&target, &e),
            };

            if let Some(recorded) = report.record(error) {
                reporter.failure_recorded(recorded);
            }
        }
    }

    Ok(report.into_errors())
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a trait instead of calling reqwest directly?
//    - The crawler is tested against an in-memory website
//    - Anything that implements StatusFetcher can be plugged in
//
// 2. Why join_all and not buffer_unordered?
//    - buffer_unordered yields results as they finish (random order)
//    - join_all yields them in the order the futures were created, which
//      keeps the report stable between runs
//
// 3. Why is a 404 an Ok(404)?
//    - The server answered; that's a successful request with a bad status
//    - Err is reserved for "no answer at all" (DNS, timeout, refused)
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawl::MemoryReporter;
    use std::collections::HashMap;
    use std::sync::Mutex;

    fn fetcher() -> HttpStatusFetcher {
        HttpStatusFetcher::new(&FetchOptions::default()).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_status_returns_server_code() {
        let mut server = mockito::Server::new_async().await;
        let ok = server.mock("GET", "/ok").with_status(200).create_async().await;
        let missing = server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let fetcher = fetcher();
        let ok_status = fetcher
            .fetch_status(&format!("{}/ok", server.url()))
            .await
            .unwrap();
        let missing_status = fetcher
            .fetch_status(&format!("{}/missing", server.url()))
            .await
            .unwrap();

        assert_eq!(ok_status, 200);
        assert_eq!(missing_status, 404);
        ok.assert_async().await;
        missing.assert_async().await;
    }

    #[tokio::test]
    async fn test_redirects_are_followed() {
        let mut server = mockito::Server::new_async().await;
        let target = format!("{}/new", server.url());
        let _old = server
            .mock("GET", "/old")
            .with_status(301)
            .with_header("location", &target)
            .create_async()
            .await;
        let new = server.mock("GET", "/new").with_status(200).create_async().await;

        let status = fetcher()
            .fetch_status(&format!("{}/old", server.url()))
            .await
            .unwrap();

        assert_eq!(status, 200);
        new.assert_async().await;
    }

    #[tokio::test]
    async fn test_connection_refused_is_an_error() {
        // Nothing listens on port 1
        let result = fetcher().fetch_status("http://127.0.0.1:1/").await;
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.starts_with("Connection failed") || message.starts_with("Request failed"));
    }

    // In-memory fetcher that remembers which URLs it was asked about
    #[derive(Default)]
    struct TableFetcher {
        statuses: HashMap<String, u16>,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl StatusFetcher for TableFetcher {
        async fn fetch_status(&self, url: &str) -> Result<u16> {
            self.calls.lock().unwrap().push(url.to_string());
            self.statuses
                .get(url)
                .copied()
                .ok_or_else(|| anyhow!("dns error: {}", url))
        }
    }

    fn urls(list: &[&str]) -> Vec<String> {
        list.iter().map(|u| u.to_string()).collect()
    }

    #[tokio::test]
    async fn test_check_links_keeps_input_order() {
        let fetcher = TableFetcher {
            statuses: HashMap::from([
                ("https://a.com/1".to_string(), 500),
                ("https://a.com/2".to_string(), 200),
                ("https://a.com/3".to_string(), 404),
            ]),
            ..Default::default()
        };
        let reporter = MemoryReporter::default();
        let list = urls(&[
            "https://a.com/1",
            "https://a.com/2",
            "https://a.com/3",
            "https://a.com/gone",
            "https://a.com/3",
        ]);

        let errors = check_links(&fetcher, &list, NonZeroUsize::new(2).unwrap(), &reporter)
            .await
            .unwrap();

        let summary: Vec<(&str, i32)> = errors
            .iter()
            .map(|e| (e.url.as_str(), e.status_code))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("https://a.com/1", 500),
                ("https://a.com/3", 404),
                ("https://a.com/gone", -1),
            ]
        );
        assert!(errors.iter().all(|e| e.parent_url.is_none()));
        assert_eq!(reporter.lines().len(), 3);
        assert_eq!(fetcher.calls.lock().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_check_links_rejects_relative_urls() {
        let fetcher = TableFetcher::default();
        let reporter = MemoryReporter::default();
        let list = urls(&["https://a.com/", "/about"]);

        let result = check_links(&fetcher, &list, NonZeroUsize::new(5).unwrap(), &reporter).await;

        assert_eq!(result.unwrap_err(), ConfigError::RelativeLink("/about".to_string()));
        assert!(fetcher.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_check_links_against_server() {
        let mut server = mockito::Server::new_async().await;
        let _ok = server.mock("GET", "/ok").with_status(200).create_async().await;
        let _gone = server.mock("GET", "/gone").with_status(410).create_async().await;
        let list = vec![format!("{}/ok", server.url()), format!("{}/gone", server.url())];
        let reporter = MemoryReporter::default();

        let errors = check_links(&fetcher(), &list, NonZeroUsize::new(1).unwrap(), &reporter)
            .await
            .unwrap();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].url, list[1]);
        assert_eq!(errors[0].status_code, 410);
    }
}
