//! AnimeWorld provider
//!
//! Each public operation performs a single fetch, hands the body to the
//! matching extractor and returns a freshly built record. The provider keeps
//! no state between calls.

pub mod links;

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::config::Config;
use crate::constants::{endpoints, site};
use crate::models::{
    HomePageList, MediaDetailRecord, MediaType, PlaybackLink, ProviderInfo, SearchResultRecord,
    SubtitleRecord,
};
use crate::parser::{parse_home_page, parse_media_detail, parse_search_results};
use crate::scraper::{Fetch, Scraper, ScraperError};

use links::{build_playback_link, parse_grabber_response};

/// Errors surfaced by provider operations
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The fetch itself failed
    #[error(transparent)]
    Transport(#[from] ScraperError),

    /// The link response body is not a JSON object
    #[error("Failed to decode link response: {0}")]
    Decode(String),

    /// The link response has no usable value for the field
    #[error("Link response has no \"{0}\" field")]
    MissingField(&'static str),
}

/// Scraper for the AnimeWorld site
#[derive(Clone)]
pub struct AnimeWorldProvider {
    fetcher: Arc<dyn Fetch>,
    base_url: String,
}

impl AnimeWorldProvider {
    /// Create a provider on top of any transport
    pub fn new(fetcher: Arc<dyn Fetch>, base_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
        }
    }

    /// Create a provider backed by an HTTP [`Scraper`] built from configuration
    pub fn from_config(config: &Config) -> Result<Self, ScraperError> {
        let scraper = Scraper::with_config(config.scraper_config())?;
        Ok(Self::new(Arc::new(scraper), config.base_url.clone()))
    }

    /// Static description of the provider
    pub fn info(&self) -> ProviderInfo {
        ProviderInfo {
            name: site::PROVIDER_NAME.to_string(),
            main_url: self.base_url.clone(),
            lang: site::LANGUAGE.to_string(),
            has_main_page: true,
            supported_types: vec![MediaType::Series, MediaType::Movie, MediaType::Ova],
        }
    }

    /// Lists shown on the home page
    pub async fn get_main_page(&self) -> Result<Vec<HomePageList>, ProviderError> {
        let url = endpoints::home(&self.base_url);
        info!("Fetching home page: {}", url);

        let page = self.fetcher.get(&url).await?;
        Ok(parse_home_page(&page.body, &self.base_url))
    }

    /// Search titles by keyword
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResultRecord>, ProviderError> {
        info!("Searching for anime: {}", query);

        let page = self
            .fetcher
            .get(&endpoints::search(&self.base_url, query))
            .await?;
        Ok(parse_search_results(&page.body, &self.base_url))
    }

    /// Load the full record of a detail page
    pub async fn load(&self, url: &str) -> Result<MediaDetailRecord, ProviderError> {
        info!("Loading anime detail: {}", url);

        let page = self.fetcher.get(url).await?;
        Ok(parse_media_detail(&page.body, url, &self.base_url))
    }

    /// Resolve an episode reference into its playable link
    ///
    /// Fails on transport errors and on any malformed response.
    pub async fn resolve_link(&self, data: &str) -> Result<PlaybackLink, ProviderError> {
        let response = self.fetcher.get(data).await?;
        let stream_url = parse_grabber_response(&response.body)?;
        Ok(build_playback_link(stream_url, &self.base_url))
    }

    /// Resolve an episode reference, emitting every link found
    ///
    /// Returns `Ok(true)` once a link was emitted and `Ok(false)` when the
    /// response could not be decoded, in which case nothing is emitted.
    /// Transport errors are returned as is. This site has no subtitles, so
    /// `_emit_subtitle` is never called.
    pub async fn load_links<L, S>(
        &self,
        data: &str,
        mut emit_link: L,
        _emit_subtitle: S,
    ) -> Result<bool, ProviderError>
    where
        L: FnMut(PlaybackLink),
        S: FnMut(SubtitleRecord),
    {
        info!("Resolving links: {}", data);

        match self.resolve_link(data).await {
            Ok(link) => {
                emit_link(link);
                Ok(true)
            }
            Err(ProviderError::Transport(e)) => Err(ProviderError::Transport(e)),
            Err(e) => {
                warn!("No playable link for {}: {}", data, e);
                Ok(false)
            }
        }
    }
}
