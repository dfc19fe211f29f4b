//! Parser module for extracting structured data from HTML
//!
//! This module turns the markup of AnimeWorld pages into the canonical
//! records of [`crate::models`]. Missing elements never fail a parse: they
//! become `None`, empty strings or empty lists.

pub mod fields;

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::constants::{endpoints, site};
use crate::models::{
    DubStatus, EpisodeRef, ExternalIds, HomePageList, MediaDetailRecord, MediaType,
    SearchResultRecord, ShowStatus,
};

use fields::{
    fix_url, map_status, map_type, normalize_href, parse_duration, parse_rating,
    parse_trailing_id, parse_year, strip_language_tag,
};

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("hard-coded selector must parse")
}

// Item card
static CARD_NAME: LazyLock<Selector> = LazyLock::new(|| selector("a.name"));
static CARD_POSTER: LazyLock<Selector> = LazyLock::new(|| selector("a.poster img"));
static CARD_DUB: LazyLock<Selector> = LazyLock::new(|| selector("div.status .dub"));
static CARD_EPISODE: LazyLock<Selector> = LazyLock::new(|| selector("div.status .ep"));
static CARD_MOVIE: LazyLock<Selector> = LazyLock::new(|| selector("div.status .movie"));
static CARD_OVA: LazyLock<Selector> = LazyLock::new(|| selector("div.status .ova"));

// Home page and search
static HOTNEW_WIDGET: LazyLock<Selector> = LazyLock::new(|| selector(".widget.hotnew"));
static TRACK_TABS: LazyLock<Selector> =
    LazyLock::new(|| selector(r#".tabs [data-name="sub"], .tabs [data-name="dub"]"#));
static TRENDING_TABS: LazyLock<Selector> =
    LazyLock::new(|| selector(r#".tabs [data-name="trending"]"#));
static NAMED_PANEL: LazyLock<Selector> = LazyLock::new(|| selector("[data-name]"));
static PANEL_ITEMS: LazyLock<Selector> = LazyLock::new(|| selector(".film-list .item"));
static SEARCH_ITEMS: LazyLock<Selector> = LazyLock::new(|| selector(".film-list > .item"));

// Detail page
static INFO_WIDGET: LazyLock<Selector> = LazyLock::new(|| selector("div.widget.info"));
static INFO_TITLE: LazyLock<Selector> = LazyLock::new(|| selector(".info .title"));
static LONG_DESCRIPTION: LazyLock<Selector> = LazyLock::new(|| selector(".desc .long"));
static DESCRIPTION: LazyLock<Selector> = LazyLock::new(|| selector(".desc"));
static POSTER: LazyLock<Selector> = LazyLock::new(|| selector(".thumb img"));
static FIRST_VALUE: LazyLock<Selector> = LazyLock::new(|| selector("dd"));
static GENRES: LazyLock<Selector> = LazyLock::new(|| selector(r#".meta a[href*="/genre/"]"#));
static AVERAGE_VOTE: LazyLock<Selector> = LazyLock::new(|| selector("#average-vote"));
static TRAILER: LazyLock<Selector> = LazyLock::new(|| selector(".trailer[data-url]"));
static MAL_BUTTON: LazyLock<Selector> = LazyLock::new(|| selector("#mal-button"));
static ANILIST_BUTTON: LazyLock<Selector> = LazyLock::new(|| selector("#anilist-button"));
static META_ENTRIES: LazyLock<Selector> = LazyLock::new(|| selector(".meta dt, .meta dd"));
static SERVER_EPISODES: LazyLock<Selector> = LazyLock::new(|| {
    selector(&format!(
        r#".widget.servers .server[data-name="{}"] .episode"#,
        site::CANONICAL_SERVER
    ))
});
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| selector("a"));
static RECOMMENDATIONS: LazyLock<Selector> =
    LazyLock::new(|| selector(".film-list.interesting .item"));

/// Text content of an element with whitespace runs collapsed
fn text_of(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn first_text(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    scope.select(selector).next().map(text_of)
}

fn first_attr<'a>(scope: ElementRef<'a>, selector: &Selector, attr: &str) -> Option<&'a str> {
    scope.select(selector).next().and_then(|el| el.value().attr(attr))
}

fn next_element_sibling(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element.next_siblings().find_map(ElementRef::wrap)
}

/// Parse one item card into a search result
///
/// `show_episode` controls whether the latest episode count is kept; movies
/// never carry one.
pub fn parse_item_card(
    card: ElementRef<'_>,
    base_url: &str,
    show_episode: bool,
) -> SearchResultRecord {
    let name = card.select(&CARD_NAME).next();

    let title = name
        .map(text_of)
        .map(|t| strip_language_tag(&t).to_string())
        .unwrap_or_default();

    let alternate_title = name
        .and_then(|el| el.value().attr("data-jtitle"))
        .map(|t| strip_language_tag(t.trim()).to_string())
        .filter(|t| !t.is_empty() && *t != title);

    let url = name
        .and_then(|el| el.value().attr("href"))
        .map(|href| fix_url(base_url, &normalize_href(href)))
        .unwrap_or_default();

    let poster_url = first_attr(card, &CARD_POSTER, "src")
        .unwrap_or_default()
        .to_string();

    let dub = card.select(&CARD_DUB).next().is_some();
    let media_type = if card.select(&CARD_MOVIE).next().is_some() {
        MediaType::Movie
    } else if card.select(&CARD_OVA).next().is_some() {
        MediaType::Ova
    } else {
        MediaType::Series
    };

    let episode = first_text(card, &CARD_EPISODE)
        .and_then(|text| text.split_whitespace().last()?.parse::<u32>().ok())
        .filter(|_| show_episode && media_type != MediaType::Movie);

    let track = if dub { DubStatus::Dubbed } else { DubStatus::Subbed };

    SearchResultRecord {
        title,
        alternate_title,
        url,
        media_type,
        poster_url,
        dub_or_sub: BTreeSet::from([track]),
        latest_dub_episode: if dub { episode } else { None },
        latest_sub_episode: if dub { None } else { episode },
    }
}

/// Parse search results from the search page HTML
///
/// Extracts cards matching `.film-list > .item`; episode counts are not shown.
pub fn parse_search_results(html: &str, base_url: &str) -> Vec<SearchResultRecord> {
    let document = Html::parse_document(html);
    let results: Vec<_> = document
        .select(&SEARCH_ITEMS)
        .map(|card| parse_item_card(card, base_url, false))
        .collect();
    tracing::debug!("Parsed {} search results", results.len());
    results
}

/// Items shown in the tab panel identified by `tab_id`
fn tab_items<'a>(
    widget: ElementRef<'a>,
    tab_id: &'a str,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    widget
        .select(&NAMED_PANEL)
        .filter(move |panel| panel.value().attr("data-name") == Some(tab_id))
        .flat_map(|panel| panel.select(&PANEL_ITEMS))
}

/// Parse the home page lists from the `hotnew` widget
///
/// The sub and dub tabs come first, in page order, with episode counts shown.
/// The trending tab follows with counts hidden and duplicate titles removed.
pub fn parse_home_page(html: &str, base_url: &str) -> Vec<HomePageList> {
    let document = Html::parse_document(html);
    let Some(widget) = document.select(&HOTNEW_WIDGET).next() else {
        return Vec::new();
    };

    let mut lists = Vec::new();

    for tab in widget.select(&TRACK_TABS) {
        let tab_id = tab.value().attr("data-name").unwrap_or_default();
        let name = text_of(tab);
        let name = name.strip_suffix(site::TAB_SUFFIX).unwrap_or(&name).to_string();
        let items = tab_items(widget, tab_id)
            .map(|card| parse_item_card(card, base_url, true))
            .collect();
        lists.push(HomePageList { name, items });
    }

    for tab in widget.select(&TRENDING_TABS) {
        let tab_id = tab.value().attr("data-name").unwrap_or_default();
        let mut seen = HashSet::new();
        let items = tab_items(widget, tab_id)
            .map(|card| parse_item_card(card, base_url, false))
            .filter(|record| seen.insert(record.url.clone()))
            .collect();
        lists.push(HomePageList {
            name: text_of(tab),
            items,
        });
    }

    tracing::debug!("Parsed {} home page lists", lists.len());
    lists
}

/// Values read from the `.meta` label/value table
#[derive(Debug, Default, PartialEq)]
struct MetaTable {
    dub: Option<bool>,
    year: Option<u32>,
    status: Option<ShowStatus>,
    duration: Option<u32>,
}

/// Scan label/value pairs in document order, keeping the first value found
/// for each field
fn scan_meta_table(root: ElementRef<'_>) -> MetaTable {
    let mut table = MetaTable::default();

    for entry in root.select(&META_ENTRIES) {
        let label = text_of(entry);
        let value = next_element_sibling(entry).map(text_of);
        let value = value.as_deref();

        if label.contains("Audio") {
            if table.dub.is_none() {
                table.dub = Some(value == Some(site::NATIVE_AUDIO));
            }
        } else if label.contains("Data") {
            if table.year.is_none() {
                table.year = value.and_then(parse_year);
            }
        } else if label.contains("Stato") {
            if table.status.is_none() {
                table.status = map_status(value);
            }
        } else if label.contains("Durata") {
            if table.duration.is_none() {
                table.duration = value.and_then(parse_duration);
            }
        }
    }

    table
}

/// Parse anime detail from a detail page HTML
///
/// `url` is the address the page was loaded from and becomes the record's
/// canonical URL.
pub fn parse_media_detail(html: &str, url: &str, base_url: &str) -> MediaDetailRecord {
    let document = Html::parse_document(html);
    let root = document.root_element();
    let widget = root.select(&INFO_WIDGET).next();

    let title_element = widget.and_then(|w| w.select(&INFO_TITLE).next());
    let title = title_element
        .map(text_of)
        .map(|t| strip_language_tag(&t).to_string())
        .unwrap_or_default();
    let alternate_title = title_element
        .and_then(|el| el.value().attr("data-jtitle"))
        .map(|t| strip_language_tag(t.trim()).to_string())
        .filter(|t| !t.is_empty() && *t != title);

    let plot = widget
        .and_then(|w| first_text(w, &LONG_DESCRIPTION).or_else(|| first_text(w, &DESCRIPTION)))
        .filter(|p| !p.is_empty());

    let poster_url = first_attr(root, &POSTER, "src").unwrap_or_default().to_string();

    let media_type = map_type(widget.and_then(|w| first_text(w, &FIRST_VALUE)).as_deref());

    let genres: Vec<String> = widget
        .map(|w| w.select(&GENRES).map(text_of).filter(|g| !g.is_empty()).collect())
        .unwrap_or_default();

    let rating = widget
        .and_then(|w| first_text(w, &AVERAGE_VOTE))
        .and_then(|vote| parse_rating(&vote));

    let trailer_url = first_attr(root, &TRAILER, "data-url")
        .filter(|u| !u.is_empty())
        .map(str::to_string);

    let external_ids = ExternalIds {
        mal_id: first_attr(root, &MAL_BUTTON, "href").and_then(parse_trailing_id),
        anilist_id: first_attr(root, &ANILIST_BUTTON, "href").and_then(parse_trailing_id),
    };

    let meta = scan_meta_table(root);
    let dub = meta.dub.unwrap_or(false);

    let episodes: Vec<EpisodeRef> = root
        .select(&SERVER_EPISODES)
        .map(|entry| {
            let link = entry.select(&ANCHOR).next();
            let id = link.and_then(|a| a.value().attr("data-id")).unwrap_or_default();
            let episode_number = link
                .and_then(|a| a.value().attr("data-episode-num"))
                .and_then(|n| n.trim().parse().ok());
            EpisodeRef {
                resolver_url: endpoints::episode_info(base_url, id),
                episode_number,
            }
        })
        .collect();
    tracing::debug!("Found {} episodes on server {}", episodes.len(), site::CANONICAL_SERVER);

    let mut episodes_by_track = BTreeMap::new();
    if !episodes.is_empty() {
        let track = if dub { DubStatus::Dubbed } else { DubStatus::Subbed };
        episodes_by_track.insert(track, episodes);
    }

    let recommendations: Vec<SearchResultRecord> = root
        .select(&RECOMMENDATIONS)
        .map(|card| parse_item_card(card, base_url, false))
        .collect();

    MediaDetailRecord {
        title,
        alternate_title,
        url: url.to_string(),
        media_type,
        poster_url,
        plot,
        year: meta.year,
        status: meta.status,
        duration_minutes: meta.duration,
        rating,
        genres,
        trailer_url,
        external_ids,
        episodes: episodes_by_track,
        recommendations,
    }
}
