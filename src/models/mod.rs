//! Data models for the AnimeWorld scraper
//!
//! Canonical records produced by the extraction pipeline, plus the JSON
//! envelopes used by the HTTP API. Every record is built fresh per call and
//! owned by the caller.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Kind of media a title represents
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
pub enum MediaType {
    /// Episodic series, the default when nothing more specific is known
    Series,
    Movie,
    #[serde(rename = "OVA")]
    Ova,
}

/// Audio track variant
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, ToSchema,
)]
pub enum DubStatus {
    Dubbed,
    Subbed,
}

/// Airing status of a title
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
pub enum ShowStatus {
    Ongoing,
    Completed,
}

/// Stream quality tiers, ordered from worst to best
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    ToSchema,
)]
pub enum Quality {
    #[default]
    Unknown,
    P360,
    P480,
    P720,
    P1080,
    P1440,
    P2160,
}

/// One title as shown in a grid or list (item card)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultRecord {
    /// From a.name text, language tag stripped
    pub title: String,
    /// From a.name data-jtitle, only when it differs from the title
    pub alternate_title: Option<String>,
    /// Absolute detail page URL
    pub url: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    /// From a.poster img src
    pub poster_url: String,
    /// Track(s) available for this title
    pub dub_or_sub: BTreeSet<DubStatus>,
    pub latest_dub_episode: Option<u32>,
    pub latest_sub_episode: Option<u32>,
}

/// Opaque handle to an episode, resolved into a link by a second fetch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeRef {
    /// Episode info endpoint for this episode
    pub resolver_url: String,
    pub episode_number: Option<u32>,
}

/// Ids of the title on external trackers
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExternalIds {
    pub mal_id: Option<u32>,
    pub anilist_id: Option<u32>,
}

/// Full information from a detail page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MediaDetailRecord {
    pub title: String,
    pub alternate_title: Option<String>,
    /// The URL the page was loaded from
    pub url: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub poster_url: String,
    pub plot: Option<String>,
    pub year: Option<u32>,
    pub status: Option<ShowStatus>,
    pub duration_minutes: Option<u32>,
    /// Average vote multiplied by 1000
    pub rating: Option<i32>,
    pub genres: Vec<String>,
    pub trailer_url: Option<String>,
    pub external_ids: ExternalIds,
    /// Episodes keyed by track. At most one track is ever present.
    pub episodes: BTreeMap<DubStatus, Vec<EpisodeRef>>,
    pub recommendations: Vec<SearchResultRecord>,
}

/// A playable stream
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackLink {
    /// Provider that produced the link
    pub source: String,
    pub display_name: String,
    pub stream_url: String,
    /// Referer the player must send when requesting the stream
    pub referer_url: String,
    pub quality: Quality,
    /// Whether the stream is an HLS playlist
    pub is_m3u8: bool,
}

/// A subtitle file for a stream
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubtitleRecord {
    pub language: String,
    pub url: String,
}

/// A named row of titles on the home page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HomePageList {
    pub name: String,
    pub items: Vec<SearchResultRecord>,
}

/// Static description of the provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProviderInfo {
    pub name: String,
    pub main_url: String,
    pub lang: String,
    pub has_main_page: bool,
    pub supported_types: Vec<MediaType>,
}

/// Everything emitted by a link resolution
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LinksResponse {
    /// Whether a playable link was produced
    pub success: bool,
    pub links: Vec<PlaybackLink>,
    pub subtitles: Vec<SubtitleRecord>,
}

/// Generic API response wrapper for successful responses
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    /// Whether the operation was successful (always true for this type)
    pub success: bool,
    /// The response payload
    pub data: T,
    /// ISO timestamp of when data was fetched
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    /// Create a new successful API response with the current timestamp
    pub fn new(data: T) -> Self {
        Self::with_timestamp(data, Utc::now())
    }

    /// Create a new successful API response with a custom timestamp
    pub fn with_timestamp(data: T, timestamp: DateTime<Utc>) -> Self {
        Self {
            success: true,
            data,
            timestamp: timestamp.to_rfc3339(),
        }
    }
}

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Whether the operation was successful (always false for errors)
    pub success: bool,
    /// Error message describing what went wrong
    pub error: String,
    /// ISO timestamp of when the error occurred
    pub timestamp: String,
}

impl ApiError {
    /// Create a new API error response with the current timestamp
    pub fn new(error: impl Into<String>) -> Self {
        Self::with_timestamp(error, Utc::now())
    }

    /// Create a new API error response with a custom timestamp
    pub fn with_timestamp(error: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            success: false,
            error: error.into(),
            timestamp: timestamp.to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_record() -> SearchResultRecord {
        SearchResultRecord {
            title: "Naruto".to_string(),
            alternate_title: None,
            url: "https://www.animeworld.tv/play/naruto.abc12".to_string(),
            media_type: MediaType::Ova,
            poster_url: "https://img.animeworld.tv/naruto.jpg".to_string(),
            dub_or_sub: BTreeSet::from([DubStatus::Subbed]),
            latest_dub_episode: None,
            latest_sub_episode: Some(3),
        }
    }

    #[test]
    fn test_search_result_serialization() {
        let json = serde_json::to_value(sample_record()).unwrap();
        assert_eq!(json["type"], "OVA");
        assert_eq!(json["posterUrl"], "https://img.animeworld.tv/naruto.jpg");
        assert_eq!(json["dubOrSub"], serde_json::json!(["Subbed"]));
        assert_eq!(json["latestSubEpisode"], 3);
        assert!(json["latestDubEpisode"].is_null());
    }

    #[test]
    fn test_episodes_serialize_keyed_by_track() {
        let detail = MediaDetailRecord {
            title: "Naruto".to_string(),
            alternate_title: None,
            url: "https://www.animeworld.tv/play/naruto.abc12".to_string(),
            media_type: MediaType::Series,
            poster_url: String::new(),
            plot: None,
            year: Some(2002),
            status: Some(ShowStatus::Completed),
            duration_minutes: Some(23),
            rating: Some(8500),
            genres: vec!["Azione".to_string()],
            trailer_url: None,
            external_ids: ExternalIds::default(),
            episodes: BTreeMap::from([(
                DubStatus::Dubbed,
                vec![EpisodeRef {
                    resolver_url: "https://www.animeworld.tv/api/episode/info?id=1".to_string(),
                    episode_number: Some(1),
                }],
            )]),
            recommendations: vec![],
        };

        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["episodes"]["Dubbed"][0]["episodeNumber"], 1);
        assert_eq!(json["status"], "Completed");
        assert_eq!(json["externalIds"]["malId"], serde_json::Value::Null);
    }

    #[test]
    fn test_quality_ranking() {
        assert_eq!(Quality::default(), Quality::Unknown);
        assert!(Quality::Unknown < Quality::P360);
        assert!(Quality::P720 < Quality::P1080);
        assert!(Quality::P1440 < Quality::P2160);
    }

    #[test]
    fn test_api_response_with_timestamp() {
        let timestamp = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let response = ApiResponse::with_timestamp(vec![1, 2], timestamp);
        assert!(response.success);
        assert_eq!(response.timestamp, "2024-01-02T03:04:05+00:00");
    }

    #[test]
    fn test_api_error_is_unsuccessful() {
        let error = ApiError::new("boom");
        assert!(!error.success);
        assert_eq!(error.error, "boom");
    }
}
