//! Blocking HTTP transport with configurable User-Agent and timeout.
//!
//! One request in flight per call, no retries, no delay: the remote service
//! is a plain request/response API and failures are surfaced as-is.

use std::time::Duration;

const DEFAULT_USER_AGENT: &str = "esvfetch/0.1 (+https://github.com/esvfetch)";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const MAX_REDIRECTS: usize = 10;

/// Thin wrapper around a blocking reqwest client.
#[derive(Debug)]
pub struct RestClient {
    inner: reqwest::blocking::Client,
}

impl RestClient {
    /// Build a client with default User-Agent and timeout.
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::builder().build()
    }

    /// Builder for custom User-Agent and/or timeout.
    pub fn builder() -> RestClientBuilder {
        RestClientBuilder::default()
    }

    /// Perform one blocking GET request.
    pub fn get(&self, url: &str) -> Result<reqwest::blocking::Response, reqwest::Error> {
        self.inner.get(url).send()
    }
}

/// Builder for RestClient.
#[derive(Debug)]
pub struct RestClientBuilder {
    user_agent: Option<String>,
    timeout_secs: u64,
}

impl Default for RestClientBuilder {
    fn default() -> Self {
        Self {
            user_agent: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl RestClientBuilder {
    /// Set a custom User-Agent. If not set, an esvfetch default is used.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Set request timeout in seconds. Default 30.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Build the blocking client.
    pub fn build(self) -> Result<RestClient, reqwest::Error> {
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());
        let inner = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(self.timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()?;
        Ok(RestClient { inner })
    }
}
