//! Error types for pushgateway-handler
//!
//! This module defines the error types used throughout the application.

use thiserror::Error;

/// Errors raised while pushing metrics to the Pushgateway
#[derive(Error, Debug)]
pub enum PublishError {
    /// HTTP client construction failed
    #[error("Failed to initialize HTTP client: {0}")]
    HttpClientInit(#[source] reqwest::Error),

    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[source] reqwest::Error),

    /// HTTP response body could not be read
    #[error("Failed to read HTTP response: {0}")]
    HttpResponse(#[source] reqwest::Error),

    /// Pushgateway answered with a non-2xx status
    #[error("Pushgateway rejected metrics (status {status}): {body}")]
    HttpStatus { status: u16, body: String },

    /// Request timed out
    #[error("Request timed out")]
    Timeout,

    /// Connection could not be established
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
}

impl From<reqwest::Error> for PublishError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            PublishError::Timeout
        } else if err.is_connect() {
            PublishError::ConnectionFailed(err.to_string())
        } else if err.is_request() {
            PublishError::HttpRequest(err)
        } else {
            PublishError::HttpResponse(err)
        }
    }
}

impl PublishError {
    /// HTTP status code carried by the error, if any
    pub fn http_status(&self) -> Option<u16> {
        match self {
            PublishError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
