//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check header values are sendable as-is
//! - Validate value ranges (body limit > 0, known log level)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ConditionalGetConfig → Result<(), Vec<ValidationError>>

use std::str::FromStr;

use axum::http::HeaderValue;
use thiserror::Error;
use tracing_subscriber::filter::LevelFilter;

use crate::config::schema::{ConditionalGetConfig, EtagConfig};

/// A single semantic problem in a config.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("etag.cache_control must not be empty")]
    EmptyCacheControl,

    #[error("etag.cache_control {0:?} is not a valid header value")]
    InvalidCacheControl(String),

    #[error("etag.max_body_bytes must be greater than zero")]
    ZeroBodyLimit,

    #[error("observability.log_level {0:?} is not a log level")]
    UnknownLogLevel(String),
}

/// Parse the configured `Cache-Control` into a header value.
pub fn cache_control_value(config: &EtagConfig) -> Result<HeaderValue, ValidationError> {
    let value = config.cache_control.trim();
    if value.is_empty() {
        return Err(ValidationError::EmptyCacheControl);
    }
    HeaderValue::from_str(value)
        .map_err(|_| ValidationError::InvalidCacheControl(config.cache_control.clone()))
}

/// Check a config, collecting every problem found.
pub fn validate_config(config: &ConditionalGetConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = cache_control_value(&config.etag) {
        errors.push(e);
    }

    if config.etag.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if LevelFilter::from_str(&config.observability.log_level).is_err() {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
