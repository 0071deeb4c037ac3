use std::path::PathBuf;

use axum::{
    body::Body,
    http::{
        header::{
            InvalidHeaderValue, CACHE_CONTROL, ETAG, IF_MODIFIED_SINCE, IF_NONE_MATCH,
            LAST_MODIFIED,
        },
        HeaderMap, HeaderName, HeaderValue, Method, Response, StatusCode,
    },
};
use clap::{Parser, Subcommand};

use conditional_get::config::{load_config, ConditionalGetConfig};
use conditional_get::digest;
use conditional_get::freshness::RequestValidators;
use conditional_get::observability::init_logging;
use conditional_get::EtagAnnotator;

#[derive(Parser)]
#[command(name = "etag-cli")]
#[command(about = "Compute weak ETags and evaluate conditional GET validators", long_about = None)]
struct Cli {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the SHA-256 digest, weak ETag and Cache-Control for each file
    Digest {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Decide whether a response would be answered with 304 Not Modified
    Check {
        #[arg(long, default_value = "GET")]
        method: String,
        /// Response ETag
        #[arg(long)]
        etag: Option<String>,
        /// Response Last-Modified
        #[arg(long)]
        last_modified: Option<String>,
        /// Request If-None-Match
        #[arg(long)]
        if_none_match: Option<String>,
        /// Request If-Modified-Since
        #[arg(long)]
        if_modified_since: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ConditionalGetConfig::default(),
    };
    init_logging(&config.observability)?;

    match cli.command {
        Commands::Digest { files } => {
            let annotator = EtagAnnotator::from_config(&config.etag)?;
            for path in files {
                let content = tokio::fs::read(&path).await?;
                let hex = digest::hexdigest(&content).await?;
                let content_len = content.len();
                let tagged = annotator.annotate(Response::new(Body::from(content))).await;

                println!("{}", path.display());
                println!("  sha256:        {hex}");
                let skipped = skip_reason(&annotator, content_len);
                print_header(tagged.headers(), "etag", &ETAG, skipped.as_deref());
                print_header(tagged.headers(), "cache-control", &CACHE_CONTROL, skipped.as_deref());
            }
        }
        Commands::Check {
            method,
            etag,
            last_modified,
            if_none_match,
            if_modified_since,
        } => {
            let check = Check {
                method,
                etag,
                last_modified,
                if_none_match,
                if_modified_since,
            };
            let status = check.evaluate()?;
            println!(
                "{} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or_default()
            );
        }
    }

    Ok(())
}

/// Inputs of the `check` subcommand.
#[derive(Debug, Default)]
struct Check {
    method: String,
    etag: Option<String>,
    last_modified: Option<String>,
    if_none_match: Option<String>,
    if_modified_since: Option<String>,
}

impl Check {
    /// Status a 200 with these validators would leave with.
    fn evaluate(&self) -> Result<StatusCode, Box<dyn std::error::Error>> {
        let method = Method::from_bytes(self.method.to_ascii_uppercase().as_bytes())?;

        let mut request_headers = HeaderMap::new();
        insert_opt(&mut request_headers, IF_NONE_MATCH, &self.if_none_match)?;
        insert_opt(&mut request_headers, IF_MODIFIED_SINCE, &self.if_modified_since)?;

        let mut response = Response::new(Body::empty());
        insert_opt(response.headers_mut(), ETAG, &self.etag)?;
        insert_opt(response.headers_mut(), LAST_MODIFIED, &self.last_modified)?;

        let validators = RequestValidators::from_parts(&method, &request_headers);
        Ok(validators.evaluate(response).status())
    }
}

fn insert_opt(
    headers: &mut HeaderMap,
    name: HeaderName,
    value: &Option<String>,
) -> Result<(), InvalidHeaderValue> {
    if let Some(value) = value {
        headers.insert(name, HeaderValue::from_str(value)?);
    }
    Ok(())
}

/// Why a file of `len` bytes goes out without an ETag, if it does.
fn skip_reason(annotator: &EtagAnnotator, len: usize) -> Option<String> {
    if len == 0 {
        Some("(not set: empty file)".to_string())
    } else if len > annotator.max_body_bytes() {
        Some(format!(
            "(not set: exceeds max_body_bytes = {})",
            annotator.max_body_bytes()
        ))
    } else {
        None
    }
}

fn print_header(headers: &HeaderMap, label: &str, name: &HeaderName, skipped: Option<&str>) {
    let label = format!("{label}:");
    match headers.get(name).and_then(|v| v.to_str().ok()) {
        Some(value) => println!("  {label:<14} {value}"),
        None => println!("  {label:<14} {}", skipped.unwrap_or("(not set)")),
    }
}
