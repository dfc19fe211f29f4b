//! API Routes module for the AnimeWorld scraper API
//!
//! This module exposes the provider operations as JSON endpoints.

use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use tracing::{error, info};
use utoipa::{IntoParams, OpenApi, ToSchema};

use crate::error::{AppError, AppResult};
use crate::models::{
    ApiError, ApiResponse, DubStatus, EpisodeRef, ExternalIds, HomePageList, LinksResponse,
    MediaDetailRecord, MediaType, PlaybackLink, ProviderInfo, Quality, SearchResultRecord,
    ShowStatus, SubtitleRecord,
};
use crate::provider::AnimeWorldProvider;

/// Application state shared across handlers
pub struct AppState {
    pub provider: AnimeWorldProvider,
}

/// Return the trimmed value of a required query parameter
fn required<'a>(value: &'a Option<String>, message: &str) -> AppResult<&'a str> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::validation(message)),
    }
}

/// GET /api/info - Describe the provider
#[utoipa::path(
    get,
    path = "/api/info",
    tag = "provider",
    responses(
        (status = 200, description = "Provider description", body = ProviderInfo)
    )
)]
pub async fn get_info(data: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(ApiResponse::new(data.provider.info()))
}

/// GET /api/home - Get the home page lists
#[utoipa::path(
    get,
    path = "/api/home",
    tag = "anime",
    responses(
        (status = 200, description = "Home page lists retrieved successfully", body = Vec<HomePageList>),
        (status = 502, description = "Upstream site error", body = ApiError)
    )
)]
pub async fn get_home(data: web::Data<AppState>) -> AppResult<HttpResponse> {
    let lists = data.provider.get_main_page().await.map_err(|e| {
        error!("Failed to fetch home page: {}", e);
        e
    })?;

    info!("Returning {} home page lists", lists.len());
    Ok(HttpResponse::Ok().json(ApiResponse::new(lists)))
}

/// Query parameters for search endpoint
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct SearchQuery {
    /// Search keyword
    pub q: Option<String>,
}

/// GET /api/search - Search for anime
///
/// Query parameter: q (required) - search keyword
#[utoipa::path(
    get,
    path = "/api/search",
    tag = "anime",
    params(SearchQuery),
    responses(
        (status = 200, description = "Search results retrieved successfully", body = Vec<SearchResultRecord>),
        (status = 400, description = "Bad request - search query is required", body = ApiError),
        (status = 502, description = "Upstream site error", body = ApiError)
    )
)]
pub async fn search_anime(
    data: web::Data<AppState>,
    query: web::Query<SearchQuery>,
) -> AppResult<HttpResponse> {
    let keyword = required(&query.q, "Search query is required")?;

    let results = data.provider.search(keyword).await.map_err(|e| {
        error!("Failed to search anime: {}", e);
        e
    })?;

    Ok(HttpResponse::Ok().json(ApiResponse::new(results)))
}

/// Query parameters for load endpoint
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct LoadQuery {
    /// Detail page URL, as returned in search results
    pub url: Option<String>,
}

/// GET /api/load - Load the full record of a title
#[utoipa::path(
    get,
    path = "/api/load",
    tag = "anime",
    params(LoadQuery),
    responses(
        (status = 200, description = "Anime detail retrieved successfully", body = MediaDetailRecord),
        (status = 400, description = "Bad request - url is required", body = ApiError),
        (status = 502, description = "Upstream site error", body = ApiError)
    )
)]
pub async fn load_anime(
    data: web::Data<AppState>,
    query: web::Query<LoadQuery>,
) -> AppResult<HttpResponse> {
    let url = required(&query.url, "Detail page url is required")?;

    let detail = data.provider.load(url).await.map_err(|e| {
        error!("Failed to load {}: {}", url, e);
        e
    })?;

    Ok(HttpResponse::Ok().json(ApiResponse::new(detail)))
}

/// Query parameters for links endpoint
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct LinksQuery {
    /// Episode resolver URL, as returned in a detail record
    pub data: Option<String>,
}

/// GET /api/links - Resolve an episode into playable links
///
/// An undecodable upstream response yields `success: false` with no links.
#[utoipa::path(
    get,
    path = "/api/links",
    tag = "anime",
    params(LinksQuery),
    responses(
        (status = 200, description = "Link resolution finished", body = LinksResponse),
        (status = 400, description = "Bad request - data is required", body = ApiError),
        (status = 502, description = "Upstream site error", body = ApiError)
    )
)]
pub async fn load_links(
    data: web::Data<AppState>,
    query: web::Query<LinksQuery>,
) -> AppResult<HttpResponse> {
    let episode = required(&query.data, "Episode data is required")?;

    let mut links = Vec::new();
    let mut subtitles = Vec::new();
    let success = data
        .provider
        .load_links(episode, |link| links.push(link), |sub| subtitles.push(sub))
        .await
        .map_err(|e| {
            error!("Failed to resolve links for {}: {}", episode, e);
            e
        })?;

    Ok(HttpResponse::Ok().json(ApiResponse::new(LinksResponse {
        success,
        links,
        subtitles,
    })))
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "AnimeWorld Scraper API",
        version = "0.1.0",
        description = "API for extracting anime metadata and stream links from AnimeWorld",
        license(
            name = "MIT"
        )
    ),
    paths(
        get_info,
        get_home,
        search_anime,
        load_anime,
        load_links
    ),
    components(
        schemas(
            SearchResultRecord,
            MediaDetailRecord,
            EpisodeRef,
            ExternalIds,
            HomePageList,
            PlaybackLink,
            SubtitleRecord,
            LinksResponse,
            ProviderInfo,
            MediaType,
            DubStatus,
            ShowStatus,
            Quality,
            ApiError,
            SearchQuery,
            LoadQuery,
            LinksQuery
        )
    ),
    tags(
        (name = "anime", description = "Anime listing, detail and link endpoints"),
        (name = "provider", description = "Provider metadata")
    )
)]
pub struct ApiDoc;

/// Configure all API routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/info", web::get().to(get_info))
            .route("/home", web::get().to(get_home))
            .route("/search", web::get().to(search_anime))
            .route("/load", web::get().to(load_anime))
            .route("/links", web::get().to(load_links)),
    );
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{http::StatusCode, test, App};
    use serde_json::Value;

    use super::*;
    use crate::scraper::testing::StaticFetcher;

    const BASE: &str = "https://www.animeworld.tv";

    fn state(fetcher: StaticFetcher) -> web::Data<AppState> {
        web::Data::new(AppState {
            provider: AnimeWorldProvider::new(Arc::new(fetcher), BASE),
        })
    }

    #[actix_rt::test]
    async fn test_search_requires_query() {
        let app = test::init_service(
            App::new()
                .app_data(state(StaticFetcher::new()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/search?q=%20").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Search query is required");
    }

    #[actix_rt::test]
    async fn test_search_returns_results() {
        let html = r#"<div class="film-list"><div class="item"><a class="name" href="/play/a.1/x">A</a></div></div>"#;
        let app = test::init_service(
            App::new()
                .app_data(state(
                    StaticFetcher::new().page("https://www.animeworld.tv/search?keyword=a", html),
                ))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/search?q=a").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"][0]["title"], "A");
        assert_eq!(body["data"][0]["url"], "https://www.animeworld.tv/play/a.1");
    }

    #[actix_rt::test]
    async fn test_load_upstream_failure_is_bad_gateway() {
        let url = "https://www.animeworld.tv/play/gone.z";
        let app = test::init_service(
            App::new()
                .app_data(state(StaticFetcher::new().status(url, 500)))
                .configure(configure_routes),
        )
        .await;

        let uri = format!("/api/load?url={}", urlencoding::encode(url));
        let req = test::TestRequest::get().uri(&uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }

    #[actix_rt::test]
    async fn test_links_reports_success_flag() {
        let good = "https://www.animeworld.tv/api/episode/info?id=e1";
        let bad = "https://www.animeworld.tv/api/episode/info?id=e2";
        let app = test::init_service(
            App::new()
                .app_data(state(
                    StaticFetcher::new()
                        .page(good, r#"{"grabber":"https://cdn.example/stream.m3u8"}"#)
                        .page(bad, "{}"),
                ))
                .configure(configure_routes),
        )
        .await;

        let uri = format!("/api/links?data={}", urlencoding::encode(good));
        let resp = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["success"], true);
        assert_eq!(body["data"]["links"][0]["streamUrl"], "https://cdn.example/stream.m3u8");
        assert_eq!(body["data"]["links"][0]["isM3u8"], true);
        assert_eq!(body["data"]["subtitles"], serde_json::json!([]));

        let uri = format!("/api/links?data={}", urlencoding::encode(bad));
        let resp = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["success"], false);
        assert_eq!(body["data"]["links"], serde_json::json!([]));
    }

    #[actix_rt::test]
    async fn test_info_endpoint() {
        let app = test::init_service(
            App::new()
                .app_data(state(StaticFetcher::new()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/info").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["name"], "AnimeWorld");
        assert_eq!(body["data"]["supportedTypes"], serde_json::json!(["Series", "Movie", "OVA"]));
    }
}
