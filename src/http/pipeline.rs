//! The annotate-then-evaluate pipeline shared by the layer and middleware.

use std::sync::Arc;

use axum::{body::Body, response::Response};

use crate::config::{ConditionalGetConfig, ConfigError};
use crate::digest::DigestProvider;
use crate::etag::EtagAnnotator;
use crate::freshness::RequestValidators;

/// ETag annotation followed by freshness evaluation.
#[derive(Debug, Clone)]
pub struct ConditionalGet {
    annotator: Option<EtagAnnotator>,
    freshness: bool,
}

impl Default for ConditionalGet {
    fn default() -> Self {
        Self {
            annotator: Some(EtagAnnotator::default()),
            freshness: true,
        }
    }
}

impl ConditionalGet {
    pub fn new(annotator: Option<EtagAnnotator>, freshness: bool) -> Self {
        Self {
            annotator,
            freshness,
        }
    }

    pub fn from_config(config: &ConditionalGetConfig) -> Result<Self, ConfigError> {
        let annotator = if config.etag.enabled {
            Some(EtagAnnotator::from_config(&config.etag)?)
        } else {
            None
        };
        Ok(Self::new(annotator, config.freshness.enabled))
    }

    /// Route digesting through `provider` instead of the process backend.
    pub fn with_provider(mut self, provider: Arc<dyn DigestProvider>) -> Self {
        self.annotator = self.annotator.map(|a| a.with_provider(provider));
        self
    }

    pub async fn process(
        &self,
        validators: &RequestValidators,
        response: Response<Body>,
    ) -> Response<Body> {
        let response = match &self.annotator {
            Some(annotator) => annotator.annotate(response).await,
            None => response,
        };

        if self.freshness {
            validators.evaluate(response)
        } else {
            response
        }
    }
}
