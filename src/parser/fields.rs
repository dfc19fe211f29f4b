//! Field parsers turning raw text fragments into typed values
//!
//! Every function here is total: unparseable input yields `None` (or the
//! documented default) instead of an error.

use crate::constants::site;
use crate::models::{MediaType, ShowStatus};

/// Parse a duration such as `"24 min"` or `"1h e 30 min"` into minutes
pub fn parse_duration(text: &str) -> Option<u32> {
    let segments: Vec<&str> = text.trim().split(" e ").collect();
    match segments.as_slice() {
        [minutes] => leading_number(minutes),
        [hours, minutes] => {
            let minutes = leading_number(minutes)?;
            let hours = hours.trim();
            let hours: u32 = hours.strip_suffix('h').unwrap_or(hours).parse().ok()?;
            hours.checked_mul(60)?.checked_add(minutes)
        }
        _ => None,
    }
}

fn leading_number(segment: &str) -> Option<u32> {
    segment.split_whitespace().next()?.parse().ok()
}

/// Parse an average vote such as `"8.5"` into thousandths (`8500`)
pub fn parse_rating(text: &str) -> Option<i32> {
    let value: f64 = text.trim().parse().ok()?;
    let scaled = (value * 1000.0).round();
    if !scaled.is_finite() || scaled < i32::MIN as f64 || scaled > i32::MAX as f64 {
        return None;
    }
    Some(scaled as i32)
}

/// Parse the year out of a date string, taken from its last token
pub fn parse_year(text: &str) -> Option<u32> {
    text.split_whitespace().last()?.parse().ok()
}

/// Map the site's status vocabulary; unknown values are dropped
pub fn map_status(text: Option<&str>) -> Option<ShowStatus> {
    match text?.trim().to_lowercase().as_str() {
        "finito" => Some(ShowStatus::Completed),
        "in corso" => Some(ShowStatus::Ongoing),
        _ => None,
    }
}

/// Map the site's type vocabulary, defaulting to `Series`
pub fn map_type(text: Option<&str>) -> MediaType {
    match text.map(|t| t.trim().to_lowercase()).as_deref() {
        Some("movie") => MediaType::Movie,
        Some("ova") => MediaType::Ova,
        _ => MediaType::Series,
    }
}

/// Parse the numeric id after the final `/` of a URL
///
/// `"https://myanimelist.net/anime/20"` gives `Some(20)`; a trailing slash
/// or a non-numeric segment gives `None`.
pub fn parse_trailing_id(url: &str) -> Option<u32> {
    url.rsplit('/').next()?.parse().ok()
}

/// Strip the trailing ` (ITA)` marker from a title
pub fn strip_language_tag(title: &str) -> &str {
    title.strip_suffix(site::LANGUAGE_TAG_SUFFIX).unwrap_or(title)
}

/// Drop the tracking suffix from a card link
///
/// The second dot-delimited segment is cut at its last `/`, so
/// `"/play/naruto.abc12/xYz9"` becomes `"/play/naruto.abc12"`.
pub fn normalize_href(href: &str) -> String {
    href.split('.')
        .enumerate()
        .map(|(i, part)| {
            if i == 1 {
                part.rfind('/').map_or(part, |idx| &part[..idx])
            } else {
                part
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}

/// Resolve a possibly relative URL against the site root
pub fn fix_url(base_url: &str, url: &str) -> String {
    if url.is_empty() || url.starts_with("http") {
        url.to_string()
    } else if let Some(rest) = url.strip_prefix("//") {
        format!("https://{}", rest)
    } else if url.starts_with('/') {
        format!("{}{}", base_url, url)
    } else {
        format!("{}/{}", base_url, url)
    }
}
