//! # eksirss
//!
//! Republishes Ekşi Sözlük entry pages as RSS 2.0 feeds.
//!
//! ## Architecture
//!
//! ```text
//! term → Cache ─miss→ Fetcher → Extractor → Feed builder → Cache → bytes
//! ```
//!
//! - [`cache`]: flat file cache with a freshness window
//! - [`fetcher`]: HTTP client for the entry page
//! - [`extractor`]: turns the entry page into feed items
//! - [`feed`]: RSS document assembly and serialization
//! - [`pipeline`]: wires the above together with per-term single-flight
//!
//! ## Quick Start
//!
//! ```bash
//! # Serve feeds on http://127.0.0.1:3000/feed/?t=<term>
//! eksirss serve
//!
//! # Print one feed
//! eksirss feed "haci murat"
//!
//! # Show what is cached for a term
//! eksirss inspect "haci murat"
//! ```

/// Application context and error types.
pub mod app;

/// Flat file feed cache.
///
/// One `<sha256(term)>.xml` per term, fresh for three hours by default.
pub mod cache;

/// Command-line interface using clap.
///
/// - `serve [--bind ADDR]` - Run the HTTP front-end
/// - `feed <term>` - Print the RSS feed for a term
/// - `inspect <term>` - Show the cached feed for a term
pub mod cli;

/// Configuration loaded from `~/.config/eksirss/config.toml`.
pub mod config;

/// Core domain models.
///
/// - [`SearchTerm`](domain::SearchTerm): normalized lookup and cache key
/// - [`ExtractedItem`](domain::ExtractedItem): one scraped entry
pub mod domain;

/// Entry page parsing.
pub mod extractor;

/// RSS 2.0 document assembly.
pub mod feed;

/// Upstream page fetching.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait for entry page fetching
/// - [`HttpFetcher`](fetcher::HttpFetcher): reqwest-based implementation
pub mod fetcher;

/// Cache-or-scrape pipeline.
pub mod pipeline;

/// axum HTTP front-end.
pub mod server;
