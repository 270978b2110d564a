use async_trait::async_trait;
use reqwest::Client;
use tracing::info;
use url::Url;

use crate::app::Result;
use crate::config::UpstreamConfig;
use crate::domain::SearchTerm;
use crate::fetcher::{Fetcher, LEGACY_PAGE_PARAM};

pub struct HttpFetcher {
    client: Client,
    base_url: String,
}

impl HttpFetcher {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .gzip(true)
            .brotli(true)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// `<base>/show.asp?t=<term>&i=900090020`
    pub fn entry_url(&self, term: &SearchTerm) -> Result<Url> {
        entry_url(&self.base_url, term)
    }
}

pub fn entry_url(base_url: &str, term: &SearchTerm) -> Result<Url> {
    let url = Url::parse_with_params(
        &format!("{}/show.asp", base_url.trim_end_matches('/')),
        &[("t", term.as_str()), ("i", LEGACY_PAGE_PARAM)],
    )?;
    Ok(url)
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, term: &SearchTerm) -> Result<String> {
        let url = self.entry_url(term)?;
        info!("Fetching {}", url);

        let response = self.client.get(url).send().await?;
        response.error_for_status_ref()?;

        let body = response.text().await?;
        Ok(body)
    }
}
