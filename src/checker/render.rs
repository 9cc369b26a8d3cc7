// src/checker/render.rs
// =============================================================================
// This module renders pages in headless Chrome.
//
// Many sites build their navigation with JavaScript, so the raw HTML from a
// plain GET doesn't contain all the links. We load the page in a real
// browser, let its scripts run, and read the resulting markup.
//
// Lifecycle:
// - One browser process per run (ChromeRenderer::launch)
// - One fresh tab per rendered page, closed on every exit path (the tab is
//   opened blank first, so a failed navigation still leaves a handle to close)
// - A page counts as rendered once Chrome reports the network idle; if that
//   never happens in time we fall back to waiting for the markup to settle
// - shutdown() closes the browser and stops its event-handler task
//
// Rust concepts:
// - async traits: PageRenderer is implemented by Chrome here and by
//   in-memory fakes in the crawler tests
// - JoinHandle: the browser's event loop runs as a separate tokio task
// - Drop: the handler task is aborted even if shutdown() is never called
// =============================================================================

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::{
    EventLifecycleEvent, SetLifecycleEventsEnabledParams,
};
use chromiumoxide::page::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

// Something that can turn a URL into fully rendered markup
#[async_trait]
pub trait PageRenderer: Send + Sync {
    async fn render(&self, url: &str) -> Result<String>;
}

#[async_trait]
impl<T: PageRenderer + ?Sized> PageRenderer for Arc<T> {
    async fn render(&self, url: &str) -> Result<String> {
        (**self).render(url).await
    }
}

// Settings of the headless browser
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// How long to wait for Chrome's "networkIdle" lifecycle event
    pub idle_timeout: Duration,
    /// How long the markup must stay unchanged before it counts as rendered
    pub settle: Duration,
    /// Upper bound on settle rounds, so a page that never stops changing
    /// (a clock, a ticker) still finishes
    pub max_settle_rounds: usize,
    /// Timeout of individual DevTools requests
    pub request_timeout: Duration,
    /// Run Chrome with its sandbox (disable inside containers)
    pub sandbox: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_secs(10),
            settle: Duration::from_millis(500),
            max_settle_rounds: 10,
            request_timeout: Duration::from_secs(30),
            sandbox: true,
        }
    }
}

pub struct ChromeRenderer {
    browser: Browser,
    handler: JoinHandle<()>,
    idle_timeout: Duration,
    settle: Duration,
    max_settle_rounds: usize,
}

impl ChromeRenderer {
    // Starts a headless Chrome and its event-handler task
    pub async fn launch(options: &RenderOptions) -> Result<Self> {
        let mut builder = BrowserConfig::builder().request_timeout(options.request_timeout);
        if !options.sandbox {
            builder = builder.no_sandbox();
        }
        let config = builder
            .build()
            .map_err(|e| anyhow!("Failed to build browser config: {}", e))?;

        info!("Launching headless Chrome");
        let (browser, mut handler) = Browser::launch(config)
            .await
            .context("Failed to launch headless Chrome")?;

        // The handler stream must be polled for the browser to make progress
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler error: {:?}", e);
                }
            }
        });

        Ok(Self {
            browser,
            handler,
            idle_timeout: options.idle_timeout,
            settle: options.settle,
            max_settle_rounds: options.max_settle_rounds,
        })
    }

    // Closes the browser process and waits for it to exit
    pub async fn shutdown(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("Failed to close browser: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            warn!("Failed to wait for browser exit: {}", e);
        }
        self.handler.abort();
    }

    // Navigates the tab to `url` and returns the markup once the page is quiet
    async fn read_rendered(&self, page: &Page, url: &str) -> Result<String> {
        let main_frame = page
            .mainframe()
            .await
            .context("Failed to look up the main frame")?;
        page.execute(SetLifecycleEventsEnabledParams::new(true))
            .await
            .context("Failed to enable lifecycle events")?;
        // Subscribe before navigating so no event is missed
        let mut lifecycle = page
            .event_listener::<EventLifecycleEvent>()
            .await
            .context("Failed to watch page lifecycle")?;

        page.goto(url)
            .await
            .with_context(|| format!("Failed to navigate to {}", url))?;
        page.wait_for_navigation()
            .await
            .context("Page navigation did not complete")?;

        let mut watch = IdleWatch::new(main_frame.map(|id| id.inner().clone()));
        let idle = tokio::time::timeout(self.idle_timeout, async {
            while let Some(event) = lifecycle.next().await {
                if watch.observe(event.frame_id.inner(), &event.name) {
                    return true;
                }
            }
            false
        })
        .await
        .unwrap_or(false);

        if idle {
            return page.content().await.context("Failed to read page markup");
        }

        debug!("No networkIdle for {}, waiting for the markup to settle", url);
        self.wait_for_stable_markup(page).await
    }

    // Polls the markup until two reads in a row are equal
    async fn wait_for_stable_markup(&self, page: &Page) -> Result<String> {
        let mut content = page.content().await.context("Failed to read page markup")?;

        for _ in 0..self.max_settle_rounds {
            tokio::time::sleep(self.settle).await;

            let next = page.content().await.context("Failed to read page markup")?;
            if next == content {
                break;
            }
            content = next;
        }

        Ok(content)
    }
}

// Follows the lifecycle events of one navigation of the main frame
//
// Chrome sends "init" when a navigation starts and "networkIdle" once no
// request has been in flight for 500ms. Events of sub-frames and leftovers
// from the blank page (anything before "init") are ignored.
#[derive(Debug)]
struct IdleWatch {
    main_frame: Option<String>,
    navigating: bool,
}

impl IdleWatch {
    fn new(main_frame: Option<String>) -> Self {
        Self {
            main_frame,
            navigating: false,
        }
    }

    // Returns true once the main frame's network went idle
    fn observe(&mut self, frame_id: &str, name: &str) -> bool {
        if let Some(main) = &self.main_frame {
            if main != frame_id {
                return false;
            }
        }

        match name {
            "init" => {
                self.navigating = true;
                false
            }
            "networkIdle" => self.navigating,
            _ => false,
        }
    }
}

#[async_trait]
impl PageRenderer for ChromeRenderer {
    async fn render(&self, url: &str) -> Result<String> {
        // Blank first: navigation happens in read_rendered, where a failure
        // still reaches the close() below
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .with_context(|| format!("Failed to open a tab for {}", url))?;

        let content = self.read_rendered(&page, url).await;

        // The tab is closed whether or not rendering worked
        if let Err(e) = page.close().await {
            warn!("Failed to close tab for {}: {}", url, e);
        }

        content
    }
}

impl Drop for ChromeRenderer {
    fn drop(&mut self) {
        self.handler.abort();
    }
}
