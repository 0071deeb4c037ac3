//! Weak ETag annotation for outgoing responses.
//!
//! # Responsibilities
//! - Digest 200 response bodies into a weak `ETag`
//! - Default `Cache-Control` so clients revalidate
//! - Leave caller-supplied validators untouched
//!
//! # Design Decisions
//! - Digest failures never fail the response; it just goes out untagged
//! - The body is teed, so the client still receives every byte
//! - The ETag keeps 27 hex characters and has no closing quote, matching
//!   what existing clients already hold

use std::sync::Arc;

use axum::{
    body::Body,
    http::{
        header::{CACHE_CONTROL, ETAG, LAST_MODIFIED},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::Response,
};

use crate::body::{self, BodyError};
use crate::config::schema::{EtagConfig, DEFAULT_CACHE_CONTROL, DEFAULT_MAX_BODY_BYTES};
use crate::config::validation::{cache_control_value, ValidationError};
use crate::digest::{self, DigestError, DigestProvider};

/// Hex characters of the digest kept in the ETag.
pub const WEAK_ETAG_HEX_LEN: usize = 27;

/// Format a digest as the weak ETag value: `W/"` plus the first 27 hex chars.
pub fn weak_etag(hexdigest: &str) -> String {
    let prefix: String = hexdigest.chars().take(WEAK_ETAG_HEX_LEN).collect();
    format!("W/\"{prefix}")
}

/// Whether the response already carries a validator of its own.
fn has_validator(headers: &HeaderMap) -> bool {
    headers.contains_key(ETAG) || headers.contains_key(LAST_MODIFIED)
}

/// Adds weak ETags and a default `Cache-Control` to 200 responses.
#[derive(Debug, Clone)]
pub struct EtagAnnotator {
    /// `None` defers to the process-wide backend.
    provider: Option<Arc<dyn DigestProvider>>,
    cache_control: HeaderValue,
    max_body_bytes: usize,
}

impl Default for EtagAnnotator {
    fn default() -> Self {
        Self {
            provider: None,
            cache_control: HeaderValue::from_static(DEFAULT_CACHE_CONTROL),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl EtagAnnotator {
    /// Build an annotator from config.
    pub fn from_config(config: &EtagConfig) -> Result<Self, ValidationError> {
        if config.max_body_bytes == 0 {
            return Err(ValidationError::ZeroBodyLimit);
        }
        Ok(Self {
            provider: None,
            cache_control: cache_control_value(config)?,
            max_body_bytes: config.max_body_bytes,
        })
    }

    /// Use `provider` instead of the process-wide backend.
    pub fn with_provider(mut self, provider: Arc<dyn DigestProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Bodies above this many bytes are not digested.
    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }

    /// The `Cache-Control` value applied to tagged responses lacking one.
    pub fn cache_control(&self) -> &HeaderValue {
        &self.cache_control
    }

    async fn hexdigest(&self, data: &[u8]) -> Result<String, DigestError> {
        match &self.provider {
            Some(provider) => provider.hexdigest(data),
            None => digest::hexdigest(data).await,
        }
    }

    /// Tag `response` if it is a 200 with a body and no validators.
    ///
    /// The response comes back with the same status, headers and body bytes
    /// plus, at most, `ETag` and `Cache-Control`.
    pub async fn annotate(&self, response: Response<Body>) -> Response<Body> {
        if response.status() != StatusCode::OK
            || has_validator(response.headers())
            || !body::is_present(response.body())
        {
            return response;
        }

        let (mut parts, body) = response.into_parts();
        let (body, buffered) = body::tee(body, self.max_body_bytes).await;

        let bytes = match buffered {
            Ok(bytes) if bytes.is_empty() => return Response::from_parts(parts, body),
            Ok(bytes) => bytes,
            Err(e @ BodyError::TooLarge { .. }) => {
                tracing::debug!(error = %e, "Skipping ETag");
                return Response::from_parts(parts, body);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Response body failed while digesting");
                return Response::from_parts(parts, body);
            }
        };

        match self.hexdigest(&bytes).await {
            Ok(hex) if !hex.is_empty() => self.apply(&mut parts.headers, &hex),
            Ok(_) => tracing::warn!("Digest backend returned an empty digest"),
            Err(e) => tracing::warn!(error = %e, "No digest available, skipping ETag"),
        }

        Response::from_parts(parts, body)
    }

    fn apply(&self, headers: &mut HeaderMap, hexdigest: &str) {
        let etag = match HeaderValue::from_str(&weak_etag(hexdigest)) {
            Ok(etag) => etag,
            Err(e) => {
                tracing::warn!(error = %e, "Digest is not a valid header value");
                return;
            }
        };

        tracing::debug!(etag = ?etag, "Tagged response");
        headers.insert(ETAG, etag);
        if !headers.contains_key(CACHE_CONTROL) {
            headers.insert(CACHE_CONTROL, self.cache_control.clone());
        }
    }
}

/// Tag `response` using the process-wide digest backend and default policy.
pub async fn add_etag(response: Response<Body>) -> Response<Body> {
    EtagAnnotator::default().annotate(response).await
}
