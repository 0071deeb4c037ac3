//! HTTP integration subsystem.
//!
//! # Data Flow
//! ```text
//! Request
//!     → RequestValidators captured (method, If-None-Match, If-Modified-Since)
//!     → inner service / handler
//!     → etag.rs (weak ETag + Cache-Control on 200s)
//!     → freshness.rs (304 when the client copy is current)
//!     → Send to client
//! ```
//!
//! # Design Decisions
//! - One pipeline, two mounting styles: tower layer and axum middleware fn
//! - Validators are captured before the request moves into the handler

pub mod layer;
pub mod middleware;
pub mod pipeline;

pub use layer::{ConditionalGetLayer, ConditionalGetService};
pub use middleware::conditional_get_middleware;
pub use pipeline::ConditionalGet;
