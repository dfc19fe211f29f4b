//! AnimeWorld Scraper Library
//!
//! This library extracts anime metadata, episode lists and stream links from
//! animeworld.tv and exposes them through REST API endpoints.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod parser;
pub mod provider;
pub mod routes;
pub mod scraper;
