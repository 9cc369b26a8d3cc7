// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (tracing) and parse command-line arguments (clap)
// 2. Build the collaborators (HTTP client, headless Chrome)
// 3. Run the crawl (or the flat link check) and print the results
// 4. Exit with proper code (0 = success, 1 = broken links, 2 = error)
//
// Rust concepts used:
// - async/await: network requests and browser control are asynchronous
// - Result<T, E>: For error handling (T = success type, E = error type)
// - match: Pattern matching to handle different subcommands
// =============================================================================

mod checker; // src/checker/ - status checks, rendering, link extraction
mod cli; // src/cli.rs - command-line parsing
mod crawl; // src/crawl/ - the traversal engine
mod error; // src/error.rs - configuration errors

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use checker::{ChromeRenderer, FetchOptions, HttpStatusFetcher, RenderOptions};
use cli::{Cli, Commands};
use crawl::{CrawlError, CrawlStats, Crawler, CrawlerConfig, DedupMode, LogReporter};

#[tokio::main]
async fn main() {
    // Logs go to stderr so `--json` output on stdout stays parseable
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = no broken links
//   Ok(1) = broken links found
//   Err   = configuration or setup error (exit code 2)
async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Site {
            domain,
            seeds,
            allow_external,
            dedup,
            timeout,
            settle_ms,
            no_sandbox,
            json,
        } => {
            let site = SiteScan {
                domain,
                seeds,
                allow_external,
                dedup: dedup.into(),
                fetch: FetchOptions {
                    timeout: Duration::from_secs(timeout),
                },
                render: RenderOptions {
                    settle: Duration::from_millis(settle_ms),
                    sandbox: !no_sandbox,
                    ..RenderOptions::default()
                },
            };
            handle_site_scan(site, json).await
        }
        Commands::Links {
            urls,
            batch_size,
            timeout,
            json,
        } => {
            let fetch = FetchOptions {
                timeout: Duration::from_secs(timeout),
            };
            handle_links_check(&urls, batch_size, &fetch, json).await
        }
    }
}

// Everything the `site` subcommand needs, gathered from the CLI flags
struct SiteScan {
    domain: String,
    seeds: Vec<String>,
    allow_external: Vec<String>,
    dedup: DedupMode,
    fetch: FetchOptions,
    render: RenderOptions,
}

// Handles the 'site' subcommand
async fn handle_site_scan(scan: SiteScan, json: bool) -> Result<i32> {
    // Validate before starting a browser: bad input never costs a Chrome launch
    let config =
        CrawlerConfig::new(&scan.domain, scan.seeds, scan.allow_external)?.with_dedup(scan.dedup);

    let fetcher = HttpStatusFetcher::new(&scan.fetch)?;
    let renderer = ChromeRenderer::launch(&scan.render).await?;

    let crawler = Crawler::new(config, fetcher, renderer, Arc::new(LogReporter));
    info!("Scanning website: {}", crawler.config().domain());

    let report = crawler.run().await;

    // Release the browser before printing (it may take a moment to exit)
    crawler.into_renderer().shutdown().await;

    print_results(&report.errors, json)?;
    if !json {
        print_stats(&report.stats);
    }

    Ok(exit_code(&report.errors))
}

// Handles the 'links' subcommand
async fn handle_links_check(
    urls: &[String],
    batch_size: std::num::NonZeroUsize,
    fetch: &FetchOptions,
    json: bool,
) -> Result<i32> {
    let fetcher = HttpStatusFetcher::new(fetch)?;
    let errors = checker::check_links(&fetcher, urls, batch_size, &LogReporter).await?;

    print_results(&errors, json)?;
    if !json {
        println!("📋 Checked: {}", urls.len());
    }

    Ok(exit_code(&errors))
}

fn exit_code(errors: &[CrawlError]) -> i32 {
    if errors.is_empty() {
        0 // Exit code 0 = all good
    } else {
        1 // Exit code 1 = broken links found
    }
}

// Prints the results either as a table or JSON
fn print_results(errors: &[CrawlError], json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(errors)?;
        println!("{}", json_output);
    } else {
        print_table(errors);
    }
    Ok(())
}

// Prints results as a human-readable table in the terminal
fn print_table(errors: &[CrawlError]) {
    if errors.is_empty() {
        println!("✅ No broken links found");
        return;
    }

    println!("{:<60} {:<10} {:<40} {}", "URL", "STATUS", "FOUND ON", "MESSAGE");
    println!("{}", "=".repeat(125));

    for error in errors {
        println!(
            "{:<60} {:<10} {:<40} {}",
            truncate(&error.url, 57),
            format_status(error),
            truncate(error.parent_url.as_deref().unwrap_or("(seed)"), 37),
            error.error_message.as_deref().unwrap_or("")
        );
    }

    println!();
    println!("❌ Broken: {}", errors.len());
}

fn print_stats(stats: &CrawlStats) {
    println!("📊 Summary:");
    println!("   📋 Queued: {}", stats.queued);
    println!("   🌐 Checked: {}", stats.checked);
    println!("   🖥️  Rendered: {}", stats.rendered);
    println!("   ⏭️  Skipped: {}", stats.skipped);
}

fn format_status(error: &CrawlError) -> String {
    if error.is_transport_failure() {
        "⚠️  ERROR".to_string()
    } else {
        error.status_code.to_string()
    }
}

// Shortens long values so the table columns stay aligned
fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() > max_chars {
        let shortened: String = value.chars().take(max_chars).collect();
        format!("{}...", shortened)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 4), "abcd...");
        // Multi-byte characters are never split
        assert_eq!(truncate("ééééé", 2), "éé...");
    }

    #[test]
    fn test_exit_code() {
        assert_eq!(exit_code(&[]), 0);

        let error = CrawlError {
            url: "https://a.com/x".to_string(),
            status_code: 404,
            error_message: None,
            parent_url: None,
        };
        assert_eq!(exit_code(&[error]), 1);
    }
}
