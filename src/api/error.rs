//! Shared error type for the API client and the verse extractor.

use thiserror::Error;

/// Errors from URL building, HTTP dispatch, and passage XML parsing.
#[derive(Debug, Error)]
pub enum ApiError {
    // Descriptor lookup
    #[error("Unknown endpoint: '{id}'. Known endpoints: query, query_info, passage_query, reading_plan_query, reading_plan_info, verse, daily_verse.")]
    UnknownEndpoint { id: String },

    #[error("Unknown output format: '{id}'. Use html, xml, plain-text, or mp3.")]
    UnknownFormat { id: String },

    #[error("Invalid base URL: {input}: {reason}")]
    InvalidBaseUrl { input: String, reason: String },

    // HTTP and network
    #[error("Network error: could not reach {url}: {source}")]
    Network { url: String, source: reqwest::Error },

    #[error("HTTP {status} when fetching: {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Failed to read response body: {source}")]
    BodyRead { source: reqwest::Error },

    // Passage XML
    #[error("Could not parse passage markup: {message}")]
    ParsePassage { message: String },

    /// A verse-unit lacked a required sub-field (verse-num or marker).
    #[error("Verse unit {index} is missing its '{field}' field.")]
    MissingVerseField { index: usize, field: &'static str },
}
