//! Constants module for the AnimeWorld scraper
//!
//! Contains endpoint URL builders that use the base URL from configuration,
//! plus the fixed vocabulary of the site's markup.

/// URL builder functions for all endpoints
pub mod endpoints {
    /// Home page URL
    pub fn home(base_url: &str) -> String {
        base_url.to_string()
    }

    /// Search URL with keyword parameter
    pub fn search(base_url: &str, query: &str) -> String {
        format!("{}/search?keyword={}", base_url, urlencoding::encode(query))
    }

    /// Episode info endpoint, answered with a JSON envelope carrying the stream URL
    pub fn episode_info(base_url: &str, id: &str) -> String {
        format!("{}/api/episode/info?id={}", base_url, id)
    }
}

/// Fixed strings of the AnimeWorld site
pub mod site {
    /// Provider display name, also used as the link source
    pub const PROVIDER_NAME: &str = "AnimeWorld";

    /// Default site root
    pub const DEFAULT_BASE_URL: &str = "https://www.animeworld.tv";

    /// Content language of the site
    pub const LANGUAGE: &str = "it";

    /// Marker appended to titles of dubbed entries
    pub const LANGUAGE_TAG_SUFFIX: &str = " (ITA)";

    /// Marker appended to home page tab names
    pub const TAB_SUFFIX: &str = "-ITA";

    /// Audio value that identifies a dubbed title
    pub const NATIVE_AUDIO: &str = "Italiano";

    /// Mirror whose episode list is authoritative
    pub const CANONICAL_SERVER: &str = "9";

    /// JSON field of the episode info response holding the stream URL
    pub const GRABBER_FIELD: &str = "grabber";
}
