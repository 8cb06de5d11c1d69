//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize, defaults for missing fields)
//!     → command-line overrides (main.rs)
//!     → validation.rs (semantic checks)
//!     → OracleConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, read_secret, ConfigError};
pub use schema::{OracleConfig, RecordConfig, RetryConfig, RpcConfig};
pub use validation::{validate_config, ValidationError};
