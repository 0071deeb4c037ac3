//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ConditionalGetConfig (validated, immutable)
//!     → ConditionalGet::from_config / init_logging
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{ConditionalGetConfig, EtagConfig, FreshnessConfig, ObservabilityConfig};
pub use validation::{validate_config, ValidationError};
