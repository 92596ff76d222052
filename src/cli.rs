//! CLI parsing and orchestration. Parses args, fetches a passage in the
//! requested format, prints or writes the result. Maps errors to exit codes.

use crate::api::{ApiError, EsvClient, Options};
use crate::config;
use clap::Parser;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// CLI error carrying exit code and message.
#[derive(Debug, Error)]
pub enum CliRunError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Api(#[from] ApiError),

    #[error("Failed to write output: {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CliRunError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliRunError::InvalidInput(_) => 1,
            CliRunError::Api(_) => 2,
            CliRunError::Output { .. } => 3,
        }
    }
}

/// What the CLI emits for a passage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    /// Structured verse records as JSON (passage fetched as XML, then reduced).
    Verses,
    Html,
    Xml,
    Text,
    /// Audio-link response; binary, requires --output.
    Mp3,
}

#[derive(Parser, Debug)]
#[command(name = "esvfetch")]
#[command(about = "Fetch ESV Bible passages from the Crossway web service")]
#[command(
    after_help = "Config file keys (key, base_url, user_agent, timeout_secs) are read from ./esvfetch.toml or the user config directory. CLI flags override config."
)]
pub struct Args {
    /// Passage reference, e.g. "John 3:16" or "Ps 23".
    pub passage: String,

    /// Output format: verses (JSON records), html, xml, text, or mp3.
    #[arg(long, default_value = "verses", value_parser = parse_output_kind)]
    pub format: OutputKind,

    /// Write to this path instead of stdout. Required for mp3.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Access key (overrides config; default IP).
    #[arg(long)]
    pub key: Option<String>,

    /// HTTP User-Agent (overrides config).
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Request timeout in seconds (overrides config; default 30).
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Print verbose error chain.
    #[arg(long)]
    pub verbose: bool,
}

fn parse_output_kind(s: &str) -> Result<OutputKind, String> {
    match s.to_lowercase().as_str() {
        "verses" | "json" => Ok(OutputKind::Verses),
        "html" => Ok(OutputKind::Html),
        "xml" => Ok(OutputKind::Xml),
        "text" | "txt" | "plain-text" => Ok(OutputKind::Text),
        "mp3" | "audio" => Ok(OutputKind::Mp3),
        _ => Err(format!(
            "Invalid --format value: '{}'. Use verses, html, xml, text, or mp3.",
            s
        )),
    }
}

/// Ensure output path parent exists; return error naming the path otherwise.
fn validate_output_path(path: &Path) -> Result<(), CliRunError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            return Err(CliRunError::InvalidInput(format!(
                "Cannot write output: {}: parent directory does not exist.",
                path.display()
            )));
        }
    }
    Ok(())
}

fn write_or_print(text: &str, output: Option<&Path>) -> Result<(), CliRunError> {
    match output {
        Some(path) => {
            validate_output_path(path)?;
            std::fs::write(path, text).map_err(|e| CliRunError::Output {
                path: path.to_path_buf(),
                source: e,
            })
        }
        None => {
            println!("{}", text);
            Ok(())
        }
    }
}

/// Entry point for the CLI. Returns Ok(()) on success; Err with exit code and message on failure.
pub fn run(args: &Args) -> Result<(), CliRunError> {
    if args.passage.trim().is_empty() {
        return Err(CliRunError::InvalidInput(
            "Passage reference is empty. Example: esvfetch \"John 3:16\"".to_string(),
        ));
    }

    let config = config::load_config().map_err(CliRunError::InvalidInput)?;

    let key = args
        .key
        .clone()
        .or_else(|| config.as_ref().and_then(|c| c.key.clone()));
    let base_url = config.as_ref().and_then(|c| c.base_url.clone());
    let user_agent = args
        .user_agent
        .clone()
        .or_else(|| config.as_ref().and_then(|c| c.user_agent.clone()));
    let timeout_secs = args
        .timeout
        .or_else(|| config.as_ref().and_then(|c| c.timeout_secs));

    let mut builder = EsvClient::builder();
    if let Some(key) = key {
        builder = builder.key(key);
    }
    if let Some(base_url) = base_url {
        builder = builder.base_url(base_url);
    }
    if let Some(ua) = user_agent {
        builder = builder.user_agent(ua);
    }
    if let Some(secs) = timeout_secs {
        builder = builder.timeout_secs(secs);
    }
    let client = builder
        .build()
        .map_err(|e| CliRunError::InvalidInput(format!("Failed to create HTTP client: {}", e)))?;

    let options = Options::new().set("passage", args.passage.as_str());

    match args.format {
        OutputKind::Verses => {
            let verses = client.get_verses(&args.passage)?;
            let json = serde_json::to_string_pretty(&verses).map_err(|e| {
                CliRunError::InvalidInput(format!("Could not serialize verses: {}", e))
            })?;
            write_or_print(&json, args.output.as_deref())
        }
        OutputKind::Html => {
            let body = client.passage_query(Some("html"), &options)?;
            write_or_print(&body, args.output.as_deref())
        }
        OutputKind::Xml => {
            let body = client.passage_query(Some("xml"), &options)?;
            write_or_print(&body, args.output.as_deref())
        }
        OutputKind::Text => {
            let body = client.passage_query(Some("plain-text"), &options)?;
            write_or_print(&body, args.output.as_deref())
        }
        OutputKind::Mp3 => {
            let path = args.output.as_deref().ok_or_else(|| {
                CliRunError::InvalidInput(
                    "mp3 output is binary: use --output <path> to write it to a file.".to_string(),
                )
            })?;
            validate_output_path(path)?;
            let bytes = client.get_bytes("passage_query", Some("mp3"), &options)?;
            std::fs::write(path, bytes).map_err(|e| CliRunError::Output {
                path: path.to_path_buf(),
                source: e,
            })
        }
    }
}
