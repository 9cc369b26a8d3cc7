// src/crawl/report.rs
// =============================================================================
// Collecting failures.
//
// - ErrorReport keeps the broken links in the order they were found, at most
//   one entry per URL.
// - FailureReporter is told about each new entry as soon as it is recorded,
//   so progress is visible during a long crawl.
//
// Rust concepts:
// - Traits as capabilities: the crawler receives "something that can report"
//   instead of printing directly, which lets tests capture the output
// - Option<&T>: returning a borrow of the freshly stored entry
// =============================================================================

use std::collections::HashSet;
#[cfg(test)]
use std::sync::Mutex;

use tracing::warn;

use super::model::CrawlError;

// Receives one call per newly recorded failure
pub trait FailureReporter: Send + Sync {
    fn failure_recorded(&self, error: &CrawlError);
}

// Default reporter: one WARN line per failure
#[derive(Debug, Default)]
pub struct LogReporter;

impl FailureReporter for LogReporter {
    fn failure_recorded(&self, error: &CrawlError) {
        warn!(
            parent = error.parent_url.as_deref().unwrap_or("-"),
            "Failed to crawl: {} {}",
            error.url,
            error.status_code
        );
    }
}

// Keeps every reported failure in memory so tests can assert on the live stream
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryReporter {
    lines: Mutex<Vec<String>>,
}

#[cfg(test)]
impl MemoryReporter {
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
impl FailureReporter for MemoryReporter {
    fn failure_recorded(&self, error: &CrawlError) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(format!("{} {}", error.url, error.status_code));
        }
    }
}

// Ordered failures, deduplicated by exact URL
#[derive(Debug, Default)]
pub struct ErrorReport {
    errors: Vec<CrawlError>,
    urls: HashSet<String>,
}

impl ErrorReport {
    pub fn new() -> Self {
        Self::default()
    }

    // Stores the error unless one for the same URL is already there
    //
    // Returns the stored entry, or None when it was a duplicate. The first
    // error for a URL wins, so its parent is the page that reached it first.
    pub fn record(&mut self, error: CrawlError) -> Option<&CrawlError> {
        if !self.urls.insert(error.url.clone()) {
            return None;
        }

        self.errors.push(error);
        self.errors.last()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_errors(self) -> Vec<CrawlError> {
        self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawl::model::CrawlTarget;

    fn not_found(url: &str, parent: &str) -> CrawlError {
        CrawlError::status(&CrawlTarget::discovered(url.to_string(), parent), 404)
    }

    #[test]
    fn test_first_error_per_url_wins() {
        let mut report = ErrorReport::new();

        assert!(report.record(not_found("https://a.com/x", "https://a.com/one")).is_some());
        assert!(report.record(not_found("https://a.com/x", "https://a.com/two")).is_none());
        assert!(report.record(not_found("https://a.com/y", "https://a.com/two")).is_some());

        let errors = report.into_errors();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].url, "https://a.com/x");
        assert_eq!(errors[0].parent_url.as_deref(), Some("https://a.com/one"));
        assert_eq!(errors[1].url, "https://a.com/y");
    }

    #[test]
    fn test_dedup_is_exact_string_match() {
        let mut report = ErrorReport::new();
        report.record(not_found("https://a.com/x", "https://a.com/"));
        report.record(not_found("https://a.com/x/", "https://a.com/"));
        assert_eq!(report.len(), 2);
    }

    #[test]
    fn test_memory_reporter_captures_lines() {
        let reporter = MemoryReporter::default();
        reporter.failure_recorded(&not_found("https://a.com/x", "https://a.com/"));
        assert_eq!(reporter.lines(), vec!["https://a.com/x 404"]);
    }
}
