// src/crawl/crawler.rs
// =============================================================================
// The traversal engine.
//
// How it works, for every frontier entry in order:
// 1. Classify: static assets and excluded links are skipped without a request
// 2. Status check: anything but 200 becomes an error in the report
// 3. Render + extract: in-scope pages are rendered and their links appended
//    to the frontier (if not already there)
// 4. Aggregate: an error is kept only once per URL, first parent wins
// The loop ends when the cursor reaches the end of the frontier.
//
// Everything is sequential: a page is fully processed before the next one
// starts, so the frontier and the report need no locking.
//
// Rust concepts:
// - Generics with trait bounds: Crawler<F, R> works with any fetcher/renderer
// - Result as control flow: `?` turns a failed step into a report entry
// - &mut borrows: the frontier and report belong to one run() call
// =============================================================================

use std::sync::Arc;

use tracing::{debug, info};

use super::model::{CrawlError, CrawlTarget, CrawlerConfig};
use super::queue::Frontier;
use super::report::{ErrorReport, FailureReporter};
use super::url_utils::{is_absolute, is_static_asset, join_domain};
use crate::checker::{extract_anchor_hrefs, PageRenderer, StatusFetcher};

// Link schemes that end up glued to the domain ("https://a.com/mailto:...")
// and must never be requested
const EXCLUDED_SCHEMES: &[&str] = &["mailto:", "tel:", "javascript:", "sms:"];

// Share links that always answer with a login wall or a redirect
const EXCLUDED_PREFIXES: &[&str] = &["https://twitter.com/intent/tweet"];

// Counters for the summary line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Targets ever added to the frontier (seeds included)
    pub queued: usize,
    /// Targets skipped as static assets or excluded links
    pub skipped: usize,
    /// Targets that got a status check
    pub checked: usize,
    /// Pages rendered for link extraction
    pub rendered: usize,
}

// Result of a crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Broken links, in discovery order, one per URL
    pub errors: Vec<CrawlError>,
    pub stats: CrawlStats,
}

pub struct Crawler<F, R> {
    config: CrawlerConfig,
    fetcher: F,
    renderer: R,
    reporter: Arc<dyn FailureReporter>,
}

impl<F, R> Crawler<F, R>
where
    F: StatusFetcher,
    R: PageRenderer,
{
    // `reporter` is told about every failure the moment it is recorded
    pub fn new(
        config: CrawlerConfig,
        fetcher: F,
        renderer: R,
        reporter: Arc<dyn FailureReporter>,
    ) -> Self {
        Self {
            config,
            fetcher,
            renderer,
            reporter,
        }
    }

    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }

    // Hands the renderer back so its session can be shut down
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    // Crawls the whole reachable site and returns the broken links
    //
    // Every run starts from the seeds again, so calling run() twice against
    // the same site gives the same report.
    pub async fn run(&self) -> CrawlReport {
        let mut frontier = Frontier::new(self.config.seed_targets(), self.config.dedup());
        let mut report = ErrorReport::new();
        let mut stats = CrawlStats::default();

        info!(
            "Crawling {} from {} seed(s)",
            self.config.domain(),
            self.config.seed_paths().len()
        );

        while let Some(target) = frontier.next_target() {
            if self.should_skip(&target.url) {
                debug!("Skipping {}", target.url);
                stats.skipped += 1;
                continue;
            }

            info!("Crawling: {}", target.url);
            stats.checked += 1;

            if let Err(error) = self.visit(&target, &mut frontier, &mut stats).await {
                if let Some(recorded) = report.record(error) {
                    self.reporter.failure_recorded(recorded);
                }
            }

            debug!("{} target(s) left in the frontier", frontier.remaining());
        }

        stats.queued = frontier.queued();

        if report.is_empty() {
            info!("No broken links found ({} checked)", stats.checked);
        } else {
            info!(
                "Found {} broken link(s) ({} checked)",
                report.len(),
                stats.checked
            );
        }

        CrawlReport {
            errors: report.into_errors(),
            stats,
        }
    }

    // Status check, then render + extract for in-scope pages
    //
    // Any failure is returned as the CrawlError to record; the caller moves on
    // to the next target either way.
    async fn visit(
        &self,
        target: &CrawlTarget,
        frontier: &mut Frontier,
        stats: &mut CrawlStats,
    ) -> Result<(), CrawlError> {
        let status = self
            .fetcher
            .fetch_status(&target.url)
            .await
            .map_err(|e| CrawlError::transport(target, &e))?;

        if status != 200 {
            return Err(CrawlError::status(target, status));
        }

        if !self.is_in_scope(&target.url) {
            return Ok(());
        }

        let html = self
            .renderer
            .render(&target.url)
            .await
            .map_err(|e| CrawlError::transport(target, &e))?;
        stats.rendered += 1;

        let added = self.enqueue_links(&html, target, frontier);
        debug!("{} new link(s) on {}", added, target.url);

        Ok(())
    }

    // Appends every link of the page that isn't in the frontier yet
    //
    // Returns how many targets were added
    fn enqueue_links(&self, html: &str, parent: &CrawlTarget, frontier: &mut Frontier) -> usize {
        let mut added = 0;

        for href in extract_anchor_hrefs(html) {
            let Some(url) = self.resolve_link(&href) else {
                continue;
            };

            if frontier.push_if_new(CrawlTarget::discovered(url, &parent.url)) {
                added += 1;
            }
        }

        added
    }

    // Makes a link absolute: http(s) links stay as they are, everything else
    // is treated as a path under the domain. Empty hrefs are dropped.
    fn resolve_link(&self, href: &str) -> Option<String> {
        let href = href.trim();

        if href.is_empty() {
            None
        } else if is_absolute(href) {
            Some(href.to_string())
        } else {
            Some(join_domain(self.config.domain(), href))
        }
    }

    // Static assets and excluded links never get a request
    fn should_skip(&self, url: &str) -> bool {
        is_static_asset(url) || self.is_excluded(url)
    }

    fn is_excluded(&self, url: &str) -> bool {
        let domain = self.config.domain();

        EXCLUDED_SCHEMES
            .iter()
            .any(|scheme| url.starts_with(&join_domain(domain, scheme)))
            || EXCLUDED_PREFIXES.iter().any(|prefix| url.starts_with(prefix))
    }

    // In scope = on our domain, or on an allowed external domain; and a page
    fn is_in_scope(&self, url: &str) -> bool {
        let on_allowed_domain = url.starts_with(self.config.domain())
            || self
                .config
                .allow_external_domains()
                .iter()
                .any(|external| url.contains(external.as_str()));

        on_allowed_domain && !is_static_asset(url)
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why is the frontier created inside run() and not stored in the struct?
//    - run() takes &self, so a Crawler can be run again from scratch
//    - The frontier and the report are plain local variables: no Mutex needed
//
// 2. What does `let Some(url) = ... else { continue };` do?
//    - let-else: bind the value if the pattern matches, otherwise run the
//      else block (which must leave the loop iteration or the function)
//
// 3. Why Arc<dyn FailureReporter>?
//    - dyn: the reporter type is chosen at runtime (logs, or a test recorder)
//    - Arc: a test keeps its own handle to read what was reported
// -----------------------------------------------------------------------------
