//! Conditional GET: replace fresh responses with 304 Not Modified.
//!
//! # Responsibilities
//! - Capture request validators before the request is consumed
//! - Decide whether the client's cached copy is still valid
//! - Build the bodiless 304
//!
//! # Design Decisions
//! - `If-None-Match` wins over `If-Modified-Since` (RFC 7232 §6); a failed
//!   match does not fall back to dates
//! - `If-None-Match` is compared byte-for-byte, no list parsing
//! - Unparseable dates mean "not fresh", never an error
//! - Only the three HTTP-date forms are dates; ISO-8601 and other
//!   free-form timestamps are unparseable

use std::time::SystemTime;

use axum::{
    body::Body,
    http::{
        header::{CONTENT_TYPE, ETAG, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED},
        HeaderMap, HeaderValue, Method, Request, StatusCode,
    },
    response::Response,
};

/// Which validator made a response fresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validator {
    EntityTag,
    ModifiedSince,
}

/// Method and conditional headers of a request.
#[derive(Debug, Clone)]
pub struct RequestValidators {
    method: Method,
    if_none_match: Option<HeaderValue>,
    if_modified_since: Option<HeaderValue>,
}

/// Header value, treating an empty one as absent.
fn non_empty(
    headers: &HeaderMap,
    name: impl axum::http::header::AsHeaderName,
) -> Option<HeaderValue> {
    headers.get(name).filter(|v| !v.is_empty()).cloned()
}

fn parse_date(value: &HeaderValue) -> Option<SystemTime> {
    let value = value.to_str().ok()?;
    httpdate::parse_http_date(value.trim()).ok()
}

impl RequestValidators {
    pub fn from_parts(method: &Method, headers: &HeaderMap) -> Self {
        Self {
            method: method.clone(),
            if_none_match: non_empty(headers, IF_NONE_MATCH),
            if_modified_since: non_empty(headers, IF_MODIFIED_SINCE),
        }
    }

    pub fn from_request<B>(request: &Request<B>) -> Self {
        Self::from_parts(request.method(), request.headers())
    }

    /// Only GET and HEAD can be answered with 304.
    pub fn is_conditional_method(&self) -> bool {
        self.method == Method::GET || self.method == Method::HEAD
    }

    /// The validator that proves the client's copy current, if any.
    pub fn matched_validator(&self, response_headers: &HeaderMap) -> Option<Validator> {
        if let Some(if_none_match) = &self.if_none_match {
            let matches = response_headers
                .get(ETAG)
                .is_some_and(|etag| etag.as_bytes() == if_none_match.as_bytes());
            return matches.then_some(Validator::EntityTag);
        }

        if let Some(if_modified_since) = &self.if_modified_since {
            let since = parse_date(if_modified_since)?;
            let last_modified = response_headers.get(LAST_MODIFIED).and_then(parse_date)?;
            return (since >= last_modified).then_some(Validator::ModifiedSince);
        }

        None
    }

    /// Whether the client's cached copy is still valid.
    pub fn is_fresh(&self, response_headers: &HeaderMap) -> bool {
        self.matched_validator(response_headers).is_some()
    }

    /// Return a 304 in place of `response` when fresh, else `response` as is.
    pub fn evaluate(&self, response: Response<Body>) -> Response<Body> {
        if !self.is_conditional_method() || response.status() != StatusCode::OK {
            return response;
        }

        match self.matched_validator(response.headers()) {
            Some(validator) => {
                tracing::debug!(
                    method = %self.method,
                    validator = ?validator,
                    "Responding 304 Not Modified"
                );
                not_modified(response)
            }
            None => response,
        }
    }
}

/// A 304 carrying `response`'s headers minus `Content-Type`, without a body.
pub fn not_modified(response: Response<Body>) -> Response<Body> {
    let (parts, _body) = response.into_parts();
    let mut headers = parts.headers;
    headers.remove(CONTENT_TYPE);

    let mut not_modified = Response::new(Body::empty());
    *not_modified.status_mut() = StatusCode::NOT_MODIFIED;
    *not_modified.headers_mut() = headers;
    not_modified
}

/// Replace `response` with a 304 if `request`'s validators show it unchanged.
pub fn return_304_if_fresh<B>(request: &Request<B>, response: Response<Body>) -> Response<Body> {
    RequestValidators::from_request(request).evaluate(response)
}
