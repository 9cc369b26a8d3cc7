// src/crawl/queue.rs
// =============================================================================
// The frontier: the ordered list of URLs the crawler still has to visit.
//
// How it works:
// 1. Seeds go in first, in the order they were given
// 2. The crawler reads entries front to back through a cursor
// 3. Links found on a page are appended at the back (if not already present)
// 4. Nothing is ever removed; the crawl is over when the cursor reaches the end
//
// Appending while reading is safe because the cursor is a plain index into a
// Vec, not a borrowed iterator.
//
// Rust concepts:
// - Vec + index: an append-only queue that keeps its history
// - HashSet: O(1) membership check on canonical URLs
// - Copy enums: small configuration values passed around by value
// =============================================================================

use std::collections::HashSet;

use super::model::CrawlTarget;
use super::url_utils::canonicalize;

// How the frontier decides that a discovered link is already queued
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DedupMode {
    /// Same canonical URL (case-insensitive host, no fragment, default port dropped)
    #[default]
    Exact,
    /// The link is a substring of a queued URL (loose compatibility check:
    /// "/a" counts as present once "/a-extra" is queued)
    Substring,
}

#[derive(Debug)]
pub struct Frontier {
    targets: Vec<CrawlTarget>,
    cursor: usize,
    // Canonical forms of every queued URL, used by DedupMode::Exact
    canonical: HashSet<String>,
    mode: DedupMode,
}

impl Frontier {
    // Creates a frontier holding the seeds
    //
    // Seeds are taken as given (duplicates included); dedup only applies to
    // links discovered later.
    pub fn new(seeds: Vec<CrawlTarget>, mode: DedupMode) -> Self {
        let canonical = seeds.iter().map(|t| canonicalize(&t.url)).collect();

        Self {
            targets: seeds,
            cursor: 0,
            canonical,
            mode,
        }
    }

    // Returns the next unvisited target and moves the cursor past it
    pub fn next_target(&mut self) -> Option<CrawlTarget> {
        let target = self.targets.get(self.cursor)?.clone();
        self.cursor += 1;
        Some(target)
    }

    // Is an equivalent URL already queued (visited or not)?
    pub fn contains(&self, url: &str) -> bool {
        match self.mode {
            DedupMode::Exact => self.canonical.contains(&canonicalize(url)),
            DedupMode::Substring => self.targets.iter().any(|t| t.url.contains(url)),
        }
    }

    // Appends the target unless an equivalent URL is already queued
    //
    // Returns true if the target was added
    pub fn push_if_new(&mut self, target: CrawlTarget) -> bool {
        if self.contains(&target.url) {
            return false;
        }

        self.canonical.insert(canonicalize(&target.url));
        self.targets.push(target);
        true
    }

    // Total number of targets ever queued
    pub fn queued(&self) -> usize {
        self.targets.len()
    }

    // Number of targets still waiting behind the cursor
    pub fn remaining(&self) -> usize {
        self.targets.len() - self.cursor
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why not a VecDeque with pop_front()?
//    - pop_front() forgets what was already visited
//    - The dedup check has to see visited URLs too, so nothing is removed
//    - A Vec plus a cursor gives both: queue order and full history
//
// 2. Why does next_target() return a clone?
//    - The caller keeps the target while it appends new ones
//    - Returning a reference would borrow the Vec, and Rust won't let us push
//      into a Vec while a reference into it is alive (the Vec may reallocate)
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn frontier(urls: &[&str], mode: DedupMode) -> Frontier {
        let seeds = urls.iter().map(|u| CrawlTarget::seed(u.to_string())).collect();
        Frontier::new(seeds, mode)
    }

    #[test]
    fn test_reads_in_order_while_growing() {
        let mut queue = frontier(&["https://a.com/"], DedupMode::Exact);

        let first = queue.next_target().unwrap();
        assert_eq!(first.url, "https://a.com/");
        assert_eq!(queue.remaining(), 0);

        // Appending after the cursor extends the same pass
        assert!(queue.push_if_new(CrawlTarget::discovered("https://a.com/b".into(), &first.url)));
        assert!(queue.push_if_new(CrawlTarget::discovered("https://a.com/c".into(), &first.url)));

        assert_eq!(queue.next_target().unwrap().url, "https://a.com/b");
        assert_eq!(queue.next_target().unwrap().url, "https://a.com/c");
        assert!(queue.next_target().is_none());
        assert_eq!(queue.queued(), 3);
    }

    #[test]
    fn test_exact_mode_uses_canonical_form() {
        let mut queue = frontier(&["https://a.com/"], DedupMode::Exact);

        assert!(queue.contains("https://A.com"));
        assert!(queue.contains("https://a.com/#top"));
        assert!(!queue.contains("https://a.com/?page=2"));

        assert!(queue.push_if_new(CrawlTarget::seed("https://a.com/a-extra".into())));
        // No over-matching in exact mode
        assert!(!queue.contains("https://a.com/a"));
    }

    #[test]
    fn test_substring_mode_is_loose() {
        let mut queue = frontier(&["https://a.com/a-extra"], DedupMode::Substring);

        assert!(queue.contains("https://a.com/a"));
        assert!(!queue.push_if_new(CrawlTarget::seed("https://a.com/a".into())));
        // Trailing-slash variant is not a substring, so it is queued again
        assert!(queue.push_if_new(CrawlTarget::seed("https://a.com/a-extra/".into())));
        assert_eq!(queue.queued(), 2);
    }

    #[test]
    fn test_visited_entries_still_count() {
        let mut queue = frontier(&["https://a.com/"], DedupMode::Exact);
        queue.next_target();

        assert!(!queue.push_if_new(CrawlTarget::seed("https://a.com/".into())));
        assert_eq!(queue.queued(), 1);
    }
}
