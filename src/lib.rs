//! HTTP conditional GET support.
//!
//! Tags 200 responses with a weak, content-derived `ETag` and answers
//! requests whose validators still match with `304 Not Modified`.

pub mod body;
pub mod config;
pub mod digest;
pub mod etag;
pub mod freshness;
pub mod http;
pub mod observability;

pub use config::ConditionalGetConfig;
pub use etag::{add_etag, EtagAnnotator};
pub use freshness::{return_304_if_fresh, RequestValidators};
pub use http::{ConditionalGet, ConditionalGetLayer};
