// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Ordered traversal from one or more seed paths
// - Client-side pages are rendered before their links are collected
// - Links outside the domain (and the allow-list) are checked, not followed
// - Static assets and mailto:/tel:/javascript:/sms: links are skipped
// - Each broken URL is reported once, with the page that linked to it
//
// Submodules:
// - url_utils: pure URL classification helpers
// - model:     CrawlTarget, CrawlError, CrawlerConfig
// - queue:     the append-only frontier
// - report:    the deduplicated error list and failure reporting
// - crawler:   the traversal loop
// - batch:     fixed-size batching for the flat link checker
// =============================================================================

mod batch;
mod crawler;
mod model;
mod queue;
mod report;
mod url_utils;

pub use batch::split_into_batches;
pub use crawler::{CrawlReport, CrawlStats, Crawler};
pub use model::{CrawlError, CrawlTarget, CrawlerConfig};
pub use queue::DedupMode;
pub use report::{ErrorReport, FailureReporter, LogReporter};
pub use url_utils::is_absolute;

#[cfg(test)]
pub use report::MemoryReporter;
