// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// clap is a popular Rust library for parsing command-line arguments.
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Rust concepts:
// - Structs: Custom data types that group related data
// - Enums: Types that can be one of several variants
// - Derive macros: Automatically generate code for our types
// =============================================================================

use std::num::NonZeroUsize;

use clap::{Parser, Subcommand, ValueEnum};

use crate::crawl::DedupMode;

#[derive(Parser, Debug)]
#[command(
    name = "linkwalker",
    version,
    about = "Crawl a website and report every broken link",
    long_about = "linkwalker walks every page reachable from a set of seed paths, renders \
                  client-side content in headless Chrome, and reports each URL that doesn't \
                  answer 200 together with the page that links to it. \
                  Set RUST_LOG (e.g. RUST_LOG=debug) to control log verbosity."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl a website starting from one or more seed paths
    ///
    /// Example: linkwalker site https://example.com --seed / --seed /docs
    Site {
        /// Base URL of the site (e.g., https://example.com)
        domain: String,

        /// Relative path to start from (repeatable)
        #[arg(long = "seed", value_name = "PATH", default_value = "/")]
        seeds: Vec<String>,

        /// External URL prefix whose pages are also rendered and followed
        /// (repeatable)
        #[arg(long = "allow-external", value_name = "URL")]
        allow_external: Vec<String>,

        /// How to decide that a discovered link is already queued
        #[arg(long, value_enum, default_value_t = DedupArg::Exact)]
        dedup: DedupArg,

        /// Timeout of each status request, in seconds
        #[arg(long, default_value_t = 10)]
        timeout: u64,

        /// Time the rendered markup must stay unchanged, in milliseconds
        #[arg(long, default_value_t = 500)]
        settle_ms: u64,

        /// Launch Chrome without its sandbox (needed in most containers)
        #[arg(long)]
        no_sandbox: bool,

        /// Output results in JSON format instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Check a flat list of absolute URLs (no crawling)
    ///
    /// Example: linkwalker links https://example.com/a https://example.com/b
    Links {
        /// Absolute URLs to check
        #[arg(required = true)]
        urls: Vec<String>,

        /// How many URLs are checked at the same time
        #[arg(long, default_value = "20")]
        batch_size: NonZeroUsize,

        /// Timeout of each status request, in seconds
        #[arg(long, default_value_t = 10)]
        timeout: u64,

        /// Output results in JSON format instead of a table
        #[arg(long)]
        json: bool,
    },
}

// Values accepted by `--dedup`
//
// Kept separate from the crawler's DedupMode so clap stays in this file.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupArg {
    /// Same URL once normalized (host case, fragment, default port)
    Exact,
    /// Already queued when the link is part of a queued URL
    Substring,
}

impl From<DedupArg> for DedupMode {
    fn from(arg: DedupArg) -> Self {
        match arg {
            DedupArg::Exact => DedupMode::Exact,
            DedupArg::Substring => DedupMode::Substring,
        }
    }
}
