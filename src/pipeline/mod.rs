//! Scrape-to-feed pipeline.
//!
//! ```text
//! term → cache lookup ─hit──────────────────────────────→ bytes
//!                     └miss→ fetch → extract → build → store → bytes
//! ```
//!
//! Requests for the same term are serialized on a per-key lock held from
//! lookup to store, so a fresh miss costs exactly one upstream fetch and
//! concurrent callers are answered from the file it wrote.

mod locks;

pub use locks::KeyedLocks;

use std::sync::Arc;

use tracing::{info, warn};

use crate::app::Result;
use crate::cache::FileCache;
use crate::domain::SearchTerm;
use crate::extractor::Extractor;
use crate::feed::FeedBuilder;
use crate::fetcher::http_fetcher::entry_url;
use crate::fetcher::Fetcher;

pub struct FeedPipeline {
    cache: FileCache,
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    extractor: Extractor,
    builder: FeedBuilder,
    base_url: String,
    locks: KeyedLocks,
}

impl FeedPipeline {
    pub fn new(
        cache: FileCache,
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        base_url: &str,
        site_name: &str,
    ) -> Self {
        Self {
            cache,
            fetcher,
            extractor: Extractor::new(base_url),
            builder: FeedBuilder::new(site_name),
            base_url: base_url.trim_end_matches('/').to_string(),
            locks: KeyedLocks::new(),
        }
    }

    pub fn cache(&self) -> &FileCache {
        &self.cache
    }

    /// Serialized RSS feed for `term`, from cache when fresh.
    pub async fn feed(&self, term: &SearchTerm) -> Result<Vec<u8>> {
        let _guard = self.locks.lock(&term.cache_key()).await;

        if let Some(bytes) = self.cache.lookup(term).await? {
            return Ok(bytes);
        }

        info!("Cache miss for {:?}, fetching upstream", term.as_str());
        let bytes = match self.render(term).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Failed to build feed for {:?}: {}", term.as_str(), e);
                return Err(e);
            }
        };

        self.cache.store(term, &bytes).await?;
        Ok(bytes)
    }

    /// Fetch, extract and serialize without touching the cache.
    async fn render(&self, term: &SearchTerm) -> Result<Vec<u8>> {
        let html = self.fetcher.fetch(term).await?;
        let page = self.extractor.extract(&html)?;

        let mut doc = self.builder.build_with_items(&page.title, page.items);
        doc.link = Some(entry_url(&self.base_url, term)?.to_string());

        info!("Built feed {:?} with {} items", doc.title, doc.len());
        Ok(doc.serialize())
    }
}
