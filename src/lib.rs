//! esvfetch: CLI and library client for the Crossway ESV Bible web service (API v2).

pub mod api;
pub mod cli;
pub mod config;
pub mod model;
pub mod verses;

// Re-exports for CLI and consumers.
pub use api::{
    ApiError, ApiSchema, EndpointDescriptor, EsvClient, EsvClientBuilder, FormatDescriptor,
    OptionValue, Options, RestClient, RestClientBuilder,
};
pub use model::Verse;
pub use verses::{extract_verses, strip_tags, VERSE_KEEP_TAGS};
