//! ESV web service client: descriptor schema, query building, and fetch
//! operations, one method per remote endpoint.

mod client;
mod error;
mod schema;

pub use client::{RestClient, RestClientBuilder};
pub use error::ApiError;
pub use schema::{ApiSchema, EndpointDescriptor, FormatDescriptor, OptionValue, Options};

use crate::model::Verse;
use crate::verses::extract_verses;
use reqwest::Url;

/// Default base URL for version 2 of the Crossway REST API.
pub const DEFAULT_BASE_URL: &str = "http://www.esvapi.org/v2/rest/";

/// Default access key. Crossway hands out "IP" for low-volume anonymous use.
pub const DEFAULT_KEY: &str = "IP";

/// Format a variable-format endpoint falls back to when the caller names none.
const FALLBACK_FORMAT: &str = "html";

/// Client for the ESV web service. Holds the transport, the descriptor
/// schema, the base URL, and the access key; all immutable after build.
#[derive(Debug)]
pub struct EsvClient {
    http: RestClient,
    schema: ApiSchema,
    base_url: String,
    key: String,
}

impl EsvClient {
    /// Build a client with the default key, base URL, and schema.
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::builder().build()
    }

    /// Builder for custom key, base URL, transport settings, or schema.
    pub fn builder() -> EsvClientBuilder {
        EsvClientBuilder::default()
    }

    /// Build the full request URL for an endpoint without dispatching it.
    ///
    /// The endpoint's fixed format (if any) wins over `format_id`;
    /// variable-format endpoints default to html. Options are filtered and
    /// merged per the descriptor tables; the access key is appended last.
    pub fn build_url(
        &self,
        endpoint_id: &str,
        format_id: Option<&str>,
        options: &Options,
    ) -> Result<String, ApiError> {
        let endpoint =
            self.schema
                .endpoint(endpoint_id)
                .ok_or_else(|| ApiError::UnknownEndpoint {
                    id: endpoint_id.to_string(),
                })?;
        let format_id = endpoint
            .fixed_format
            .or(format_id)
            .unwrap_or(FALLBACK_FORMAT);
        let format = self
            .schema
            .format(format_id)
            .ok_or_else(|| ApiError::UnknownFormat {
                id: format_id.to_string(),
            })?;

        let query = schema::build_query(endpoint, format, options, &self.key);

        let raw = format!("{}{}", self.base_url, endpoint.path);
        let mut url = Url::parse(&raw).map_err(|e| ApiError::InvalidBaseUrl {
            input: raw.clone(),
            reason: e.to_string(),
        })?;
        {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in &query {
                pairs.append_pair(name, value);
            }
        }
        Ok(url.to_string())
    }

    /// GET an endpoint and return the response body as text.
    pub fn get_text(
        &self,
        endpoint_id: &str,
        format_id: Option<&str>,
        options: &Options,
    ) -> Result<String, ApiError> {
        let url = self.build_url(endpoint_id, format_id, options)?;
        let response = self.dispatch(&url)?;
        response.text().map_err(|e| ApiError::BodyRead { source: e })
    }

    /// GET an endpoint and return the raw response bytes (audio formats).
    pub fn get_bytes(
        &self,
        endpoint_id: &str,
        format_id: Option<&str>,
        options: &Options,
    ) -> Result<Vec<u8>, ApiError> {
        let url = self.build_url(endpoint_id, format_id, options)?;
        let response = self.dispatch(&url)?;
        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| ApiError::BodyRead { source: e })
    }

    fn dispatch(&self, url: &str) -> Result<reqwest::blocking::Response, ApiError> {
        let response = self.http.get(url).map_err(|e| ApiError::Network {
            url: url.to_string(),
            source: e,
        })?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response)
    }

    /// Search query. Always answers in HTML.
    pub fn query(&self, options: &Options) -> Result<String, ApiError> {
        self.get_text("query", None, options)
    }

    /// Metadata about what a search query would match. Always XML.
    pub fn query_info(&self, options: &Options) -> Result<String, ApiError> {
        self.get_text("query_info", None, options)
    }

    /// Look up a passage by reference in the given format (default html).
    pub fn passage_query(
        &self,
        format_id: Option<&str>,
        options: &Options,
    ) -> Result<String, ApiError> {
        self.get_text("passage_query", format_id, options)
    }

    /// Today's (or a given date's) reading-plan text.
    pub fn reading_plan_query(
        &self,
        format_id: Option<&str>,
        options: &Options,
    ) -> Result<String, ApiError> {
        self.get_text("reading_plan_query", format_id, options)
    }

    /// Reading-plan references without the text. Always XML.
    pub fn reading_plan_info(&self, options: &Options) -> Result<String, ApiError> {
        self.get_text("reading_plan_info", None, options)
    }

    /// A single verse, random unless pinned by passage or seed.
    pub fn verse(&self, format_id: Option<&str>, options: &Options) -> Result<String, ApiError> {
        self.get_text("verse", format_id, options)
    }

    /// The verse of the day.
    pub fn daily_verse(
        &self,
        format_id: Option<&str>,
        options: &Options,
    ) -> Result<String, ApiError> {
        self.get_text("daily_verse", format_id, options)
    }

    /// Fetch a passage as XML and reduce it to structured verse records.
    pub fn get_verses(&self, passage: &str) -> Result<Vec<Verse>, ApiError> {
        let xml = self.passage_query(Some("xml"), &Options::new().set("passage", passage))?;
        extract_verses(&xml)
    }
}

/// Builder for EsvClient with optional key, base URL, transport, and schema.
#[derive(Debug, Default)]
pub struct EsvClientBuilder {
    key: Option<String>,
    base_url: Option<String>,
    user_agent: Option<String>,
    timeout_secs: Option<u64>,
    schema: Option<ApiSchema>,
}

impl EsvClientBuilder {
    /// Set the access key. Default "IP".
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Set the base URL. Default the public v2 REST endpoint. A trailing
    /// slash is appended if missing so path segments concatenate cleanly.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set a custom HTTP User-Agent.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Set request timeout in seconds. Default 30.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Replace the descriptor schema (e.g. for a mirror with extra endpoints).
    pub fn schema(mut self, schema: ApiSchema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Build the transport and the client.
    pub fn build(self) -> Result<EsvClient, reqwest::Error> {
        let mut http = RestClient::builder();
        if let Some(ua) = self.user_agent {
            http = http.user_agent(ua);
        }
        if let Some(secs) = self.timeout_secs {
            http = http.timeout_secs(secs);
        }
        let mut base_url = self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Ok(EsvClient {
            http: http.build()?,
            schema: self.schema.unwrap_or_default(),
            base_url,
            key: self.key.unwrap_or_else(|| DEFAULT_KEY.to_string()),
        })
    }
}
