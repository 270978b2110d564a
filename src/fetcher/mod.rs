pub mod http_fetcher;

use async_trait::async_trait;

use crate::app::Result;
use crate::domain::SearchTerm;

pub use http_fetcher::HttpFetcher;

/// Opaque parameter the dictionary site expects on every entry page request.
pub const LEGACY_PAGE_PARAM: &str = "900090020";

#[async_trait]
pub trait Fetcher {
    /// Fetch the raw HTML entry page for `term`.
    async fn fetch(&self, term: &SearchTerm) -> Result<String>;
}
