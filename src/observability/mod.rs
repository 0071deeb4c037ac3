//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! digest.rs, etag.rs, freshness.rs produce:
//!     → tracing events (backend resolution, skipped ETags, 304 decisions)
//!
//! Consumers:
//!     → logging.rs subscriber (stdout, human or JSON)
//! ```

pub mod logging;

pub use logging::init_logging;
