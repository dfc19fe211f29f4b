//! Global error handling module for the AnimeWorld scraper API
//!
//! This module provides a unified error type for the HTTP layer and converts
//! it to responses with a consistent JSON structure.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::models::ApiError;
use crate::provider::ProviderError;
use crate::scraper::ScraperError;

/// Application-wide error type that unifies all error sources
#[derive(Debug, Error)]
pub enum AppError {
    /// Provider errors (transport or upstream response decoding)
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Validation errors (bad request)
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            // The upstream site failed or answered with something unusable
            AppError::Provider(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),

            AppError::Provider(provider_err) => match provider_err {
                ProviderError::Transport(scraper_err) => match scraper_err {
                    ScraperError::NetworkError(msg) => {
                        format!("Failed to connect to server: {}", msg)
                    }
                    ScraperError::HttpError(status) => {
                        format!("Server returned error status: {}", status)
                    }
                    ScraperError::ResponseError(msg) => {
                        format!("Failed to read response: {}", msg)
                    }
                    ScraperError::ClientBuild(_) => "HTTP client is unavailable".to_string(),
                },
                ProviderError::Decode(_) | ProviderError::MissingField(_) => {
                    "Server returned an unexpected response".to_string()
                }
            },
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status_code()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error_response = ApiError::new(self.user_message());

        HttpResponse::build(status).json(error_response)
    }
}

/// Result type alias for operations that can fail with AppError
pub type AppResult<T> = Result<T, AppError>;
