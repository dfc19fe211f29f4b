//! Link resolution for episode references
//!
//! The episode info endpoint answers with a small JSON object whose
//! `grabber` field is the final stream URL.

use serde_json::Value;

use super::ProviderError;
use crate::constants::site;
use crate::models::{PlaybackLink, Quality};

/// Extract the stream URL from an episode info response body
pub fn parse_grabber_response(body: &str) -> Result<String, ProviderError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| ProviderError::Decode(e.to_string()))?;

    let object = value
        .as_object()
        .ok_or_else(|| ProviderError::Decode("expected a JSON object".to_string()))?;

    object
        .get(site::GRABBER_FIELD)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(ProviderError::MissingField(site::GRABBER_FIELD))
}

/// Wrap a stream URL into the single link this provider emits
pub fn build_playback_link(stream_url: String, referer_url: &str) -> PlaybackLink {
    let is_m3u8 = stream_url
        .split(['?', '#'])
        .next()
        .is_some_and(|path| path.ends_with(".m3u8"));

    PlaybackLink {
        source: site::PROVIDER_NAME.to_string(),
        display_name: site::PROVIDER_NAME.to_string(),
        stream_url,
        referer_url: referer_url.to_string(),
        quality: Quality::Unknown,
        is_m3u8,
    }
}
