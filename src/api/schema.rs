//! Static descriptor tables for the ESV v2 REST API and per-call option handling.
//!
//! The tables are configuration data, not an algorithm: one descriptor per
//! endpoint (remote path segment plus allowed option names) and one per output
//! format (allowed option names plus their documented defaults). They are
//! built once and never mutated.

use std::collections::BTreeMap;

/// One remote operation: its id, REST path segment, and allowed options.
///
/// Endpoints that only ever answer in one encoding (e.g. queryInfo is always
/// XML) carry a `fixed_format` which overrides any caller-supplied format.
#[derive(Debug, Clone)]
pub struct EndpointDescriptor {
    pub id: &'static str,
    pub path: &'static str,
    pub options: &'static [&'static str],
    pub fixed_format: Option<&'static str>,
}

impl EndpointDescriptor {
    pub fn allows(&self, option: &str) -> bool {
        self.options.contains(&option)
    }
}

/// One output encoding: its id and allowed options with documented defaults.
///
/// The allow-list is the set of default names. An option whose value equals
/// the documented default is omitted from built queries; `output-format`, when
/// declared, is always included because the remote service needs it to select
/// the response encoding.
#[derive(Debug, Clone)]
pub struct FormatDescriptor {
    pub id: &'static str,
    pub defaults: &'static [(&'static str, &'static str)],
}

impl FormatDescriptor {
    pub fn default_for(&self, option: &str) -> Option<&'static str> {
        self.defaults
            .iter()
            .find(|(name, _)| *name == option)
            .map(|(_, value)| *value)
    }
}

const QUERY_OPTIONS: &[&str] = &[
    "q",
    "passage",
    "words",
    "phrase",
    "not-words",
    "scope",
    "matches",
    "search-text",
    "page",
    "link-url",
    "results-per-page",
];

const QUERY_INFO_OPTIONS: &[&str] = &["q"];

const READING_PLAN_OPTIONS: &[&str] = &["date", "reading-plan", "start-date"];

const VERSE_OPTIONS: &[&str] = &["passage", "seed"];

const DAILY_VERSE_OPTIONS: &[&str] = &[
    "include-headings",
    "begin-character",
    "correct-capitalization",
    "correct-end-punctuation",
    "end-character",
    "correct-quotes",
];

const HTML_DEFAULTS: &[(&str, &str)] = &[
    ("include-passage-references", "true"),
    ("include-first-verse-numbers", "true"),
    ("include-verse-numbers", "true"),
    ("include-footnotes", "true"),
    ("include-footnote-links", "true"),
    ("include-headings", "true"),
    ("include-subheadings", "true"),
    ("include-surrounding-chapters", "false"),
    ("include-word-ids", "true"),
    ("link-url", "http://www.gnpcb.org/esv/search/"),
    ("include-audio-link", "true"),
    ("audio-format", "flash"),
    ("audio-version", "hw"),
    ("include-short-copyright", "true"),
    ("include-copyright", "false"),
];

const XML_DEFAULTS: &[(&str, &str)] = &[
    ("include-xml-declaration", "false"),
    ("include-doctype", "true"),
    ("include-quote-entities", "true"),
    ("include-simple-entities", "false"),
    ("include-cross-references", "false"),
    ("include-line-breaks", "true"),
    ("include-word-ids", "false"),
    ("include-virtual-attributes", "false"),
    ("base-element", "verse-unit"),
    ("output-format", "crossway-xml-1.0"),
];

const PLAIN_TEXT_DEFAULTS: &[(&str, &str)] = &[
    ("include-passage-references", "true"),
    ("include-first-verse-numbers", "true"),
    ("include-verse-numbers", "true"),
    ("include-footnotes", "true"),
    ("include-short-copyright", "true"),
    ("include-copyright", "false"),
    ("include-passage-horizontal-lines", "true"),
    ("include-heading-horizontal-lines", "true"),
    ("include-headings", "true"),
    ("include-subheadings", "true"),
    ("include-selahs", "true"),
    ("include-content-type", "true"),
    ("line-length", "74"),
    ("output-format", "plain-text"),
];

const MP3_DEFAULTS: &[(&str, &str)] = &[("output-format", "mp3")];

/// The full set of endpoint and format descriptors for one API version.
///
/// Injectable into [EsvClient](crate::api::EsvClient); [ApiSchema::esv_v2]
/// matches version 2 of the Crossway REST API.
#[derive(Debug, Clone)]
pub struct ApiSchema {
    endpoints: Vec<EndpointDescriptor>,
    formats: Vec<FormatDescriptor>,
}

impl ApiSchema {
    /// Descriptor tables for ESV API v2 (http://www.esvapi.org/api).
    pub fn esv_v2() -> Self {
        Self {
            endpoints: vec![
                EndpointDescriptor {
                    id: "query",
                    path: "query",
                    options: QUERY_OPTIONS,
                    fixed_format: Some("html"),
                },
                EndpointDescriptor {
                    id: "query_info",
                    path: "queryInfo",
                    options: QUERY_INFO_OPTIONS,
                    fixed_format: Some("xml"),
                },
                EndpointDescriptor {
                    id: "passage_query",
                    path: "passageQuery",
                    options: QUERY_OPTIONS,
                    fixed_format: None,
                },
                EndpointDescriptor {
                    id: "reading_plan_query",
                    path: "readingPlanQuery",
                    options: READING_PLAN_OPTIONS,
                    fixed_format: None,
                },
                EndpointDescriptor {
                    id: "reading_plan_info",
                    path: "readingPlanInfo",
                    options: READING_PLAN_OPTIONS,
                    fixed_format: Some("xml"),
                },
                EndpointDescriptor {
                    id: "verse",
                    path: "verse",
                    options: VERSE_OPTIONS,
                    fixed_format: None,
                },
                EndpointDescriptor {
                    id: "daily_verse",
                    path: "dailyVerse",
                    options: DAILY_VERSE_OPTIONS,
                    fixed_format: None,
                },
            ],
            formats: vec![
                FormatDescriptor {
                    id: "html",
                    defaults: HTML_DEFAULTS,
                },
                FormatDescriptor {
                    id: "xml",
                    defaults: XML_DEFAULTS,
                },
                FormatDescriptor {
                    id: "plain-text",
                    defaults: PLAIN_TEXT_DEFAULTS,
                },
                FormatDescriptor {
                    id: "mp3",
                    defaults: MP3_DEFAULTS,
                },
            ],
        }
    }

    pub fn endpoint(&self, id: &str) -> Option<&EndpointDescriptor> {
        self.endpoints.iter().find(|e| e.id == id)
    }

    pub fn format(&self, id: &str) -> Option<&FormatDescriptor> {
        self.formats.iter().find(|f| f.id == id)
    }
}

impl Default for ApiSchema {
    fn default() -> Self {
        Self::esv_v2()
    }
}

/// One option value: text, integer, or flag. Flags serialize as the literal
/// strings "true"/"false" the remote service expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Text(String),
    Number(i64),
    Flag(bool),
}

impl OptionValue {
    fn into_query_value(self) -> String {
        match self {
            OptionValue::Text(s) => s,
            OptionValue::Number(n) => n.to_string(),
            OptionValue::Flag(true) => "true".to_string(),
            OptionValue::Flag(false) => "false".to_string(),
        }
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        OptionValue::Text(s.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(s: String) -> Self {
        OptionValue::Text(s)
    }
}

impl From<i64> for OptionValue {
    fn from(n: i64) -> Self {
        OptionValue::Number(n)
    }
}

impl From<u32> for OptionValue {
    fn from(n: u32) -> Self {
        OptionValue::Number(n as i64)
    }
}

impl From<bool> for OptionValue {
    fn from(b: bool) -> Self {
        OptionValue::Flag(b)
    }
}

/// Per-call options, kept in insertion order. Names are normalized on entry:
/// underscores become hyphens, so `results_per_page` and `results-per-page`
/// address the same remote parameter.
#[derive(Debug, Clone, Default)]
pub struct Options {
    entries: Vec<(String, String)>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an option, consuming and returning self for chaining.
    pub fn set(mut self, name: &str, value: impl Into<OptionValue>) -> Self {
        let name = name.replace('_', "-");
        self.entries.push((name, value.into().into_query_value()));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

/// Filter and merge options into the final query map.
///
/// Endpoint options pass on allow-list membership alone; format options pass
/// only when they differ from the documented default; `output-format` (when
/// the format declares one) and the access key are always present, and the
/// key overrides any caller-supplied value. BTreeMap keeps the pair order
/// deterministic so identical inputs build identical URLs.
pub(crate) fn build_query(
    endpoint: &EndpointDescriptor,
    format: &FormatDescriptor,
    options: &Options,
    key: &str,
) -> BTreeMap<String, String> {
    let mut merged = BTreeMap::new();

    for (name, value) in options.iter() {
        if endpoint.allows(name) {
            merged.insert(name.to_string(), value.to_string());
        }
    }

    // Format options override endpoint options of the same name. No reason to
    // send values the service would assume anyway.
    for (name, value) in options.iter() {
        if let Some(default) = format.default_for(name) {
            if value != default {
                merged.insert(name.to_string(), value.to_string());
            }
        }
    }

    // output-format is the one format option the service requires.
    if let Some(output_format) = format.default_for("output-format") {
        merged.insert("output-format".to_string(), output_format.to_string());
    }

    merged.insert("key".to_string(), key.to_string());
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> ApiSchema {
        ApiSchema::esv_v2()
    }

    #[test]
    fn schema_knows_all_seven_endpoints() {
        let s = schema();
        for id in [
            "query",
            "query_info",
            "passage_query",
            "reading_plan_query",
            "reading_plan_info",
            "verse",
            "daily_verse",
        ] {
            assert!(s.endpoint(id).is_some(), "missing endpoint {}", id);
        }
        assert!(s.endpoint("bulk_export").is_none());
    }

    #[test]
    fn schema_knows_all_four_formats() {
        let s = schema();
        for id in ["html", "xml", "plain-text", "mp3"] {
            assert!(s.format(id).is_some(), "missing format {}", id);
        }
        assert!(s.format("pdf").is_none());
    }

    #[test]
    fn options_normalize_underscores_and_bools() {
        let opts = Options::new()
            .set("results_per_page", 25u32)
            .set("include_footnotes", false);
        let entries: Vec<_> = opts.iter().collect();
        assert_eq!(entries[0], ("results-per-page", "25"));
        assert_eq!(entries[1], ("include-footnotes", "false"));
    }

    #[test]
    fn build_query_drops_unknown_options() {
        let s = schema();
        let endpoint = s.endpoint("passage_query").unwrap();
        let format = s.format("html").unwrap();
        let opts = Options::new()
            .set("passage", "John 3")
            .set("frobnicate", "yes");
        let query = build_query(endpoint, format, &opts, "IP");
        assert_eq!(query.get("passage").map(String::as_str), Some("John 3"));
        assert!(!query.contains_key("frobnicate"));
    }

    #[test]
    fn build_query_never_leaks_outside_allow_lists() {
        let s = schema();
        let endpoint = s.endpoint("verse").unwrap();
        let format = s.format("plain-text").unwrap();
        let opts = Options::new()
            .set("passage", "Gen 1:1")
            .set("seed", 42i64)
            .set("q", "smuggled")
            .set("date", "2026-01-01");
        let query = build_query(endpoint, format, &opts, "IP");
        for name in query.keys() {
            let allowed = name == "key"
                || endpoint.allows(name)
                || format.default_for(name).is_some();
            assert!(allowed, "{} escaped the allow-lists", name);
        }
        assert!(!query.contains_key("q"));
        assert!(!query.contains_key("date"));
    }

    #[test]
    fn build_query_suppresses_format_defaults() {
        let s = schema();
        let endpoint = s.endpoint("passage_query").unwrap();
        let format = s.format("html").unwrap();
        // include-headings defaults to "true": sending true is redundant,
        // sending false is not.
        let redundant = Options::new().set("include_headings", true);
        let query = build_query(endpoint, format, &redundant, "IP");
        assert!(!query.contains_key("include-headings"));

        let meaningful = Options::new().set("include_headings", false);
        let query = build_query(endpoint, format, &meaningful, "IP");
        assert_eq!(
            query.get("include-headings").map(String::as_str),
            Some("false")
        );
    }

    #[test]
    fn build_query_always_includes_declared_output_format() {
        let s = schema();
        let endpoint = s.endpoint("passage_query").unwrap();
        for (format_id, expected) in [
            ("xml", Some("crossway-xml-1.0")),
            ("plain-text", Some("plain-text")),
            ("mp3", Some("mp3")),
            ("html", None),
        ] {
            let format = s.format(format_id).unwrap();
            let query = build_query(endpoint, format, &Options::new(), "IP");
            assert_eq!(
                query.get("output-format").map(String::as_str),
                expected,
                "format {}",
                format_id
            );
        }
    }

    #[test]
    fn build_query_key_cannot_be_overridden() {
        let s = schema();
        let endpoint = s.endpoint("passage_query").unwrap();
        let format = s.format("html").unwrap();
        let opts = Options::new().set("key", "HIJACK").set("passage", "John 3");
        let query = build_query(endpoint, format, &opts, "IP");
        assert_eq!(query.get("key").map(String::as_str), Some("IP"));
    }

    #[test]
    fn build_query_is_deterministic() {
        let s = schema();
        let endpoint = s.endpoint("query").unwrap();
        let format = s.format("html").unwrap();
        let opts = Options::new().set("passage", "John 3").set("page", 2u32);
        let a = build_query(endpoint, format, &opts, "IP");
        let b = build_query(endpoint, format, &opts, "IP");
        assert_eq!(a, b);
    }
}
