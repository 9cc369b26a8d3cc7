// src/checker/mod.rs
// =============================================================================
// The crawler's collaborators: everything that touches the outside world.
//
// Submodules:
// - http: status checks (reqwest) and the batched flat-list checker
// - render: headless Chrome rendering (chromiumoxide)
// - html: extracts anchor targets from markup (scraper)
//
// The crawler only sees the StatusFetcher and PageRenderer traits, so tests
// can swap in in-memory fakes.
// =============================================================================

mod html;
mod http;
mod render;

pub use html::extract_anchor_hrefs;
pub use http::{check_links, FetchOptions, HttpStatusFetcher, StatusFetcher};
pub use render::{ChromeRenderer, PageRenderer, RenderOptions};
