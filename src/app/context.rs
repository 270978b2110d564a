use std::sync::Arc;

use crate::app::error::{EksiError, Result};
use crate::cache::FileCache;
use crate::config::Config;
use crate::fetcher::{Fetcher, HttpFetcher};
use crate::pipeline::FeedPipeline;

pub struct AppContext {
    pub config: Config,
    pub pipeline: Arc<FeedPipeline>,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let fetcher: Arc<dyn Fetcher + Send + Sync> = Arc::new(HttpFetcher::new(&config.upstream)?);
        Self::with_fetcher(config, fetcher)
    }

    pub fn with_fetcher(config: Config, fetcher: Arc<dyn Fetcher + Send + Sync>) -> Result<Self> {
        let cache_dir = config
            .cache
            .resolve_dir()
            .map_err(|e| EksiError::Config(e.to_string()))?;
        let cache = FileCache::with_ttl(cache_dir, config.cache.ttl());

        let pipeline = Arc::new(FeedPipeline::new(
            cache,
            fetcher,
            &config.upstream.base_url,
            &config.upstream.site_name,
        ));

        Ok(Self { config, pipeline })
    }
}
