//! # jirabot core
//!
//! Shared building blocks used by the jirabot service crates: environment
//! lookup with aggregated error reporting, host URL normalization and common
//! constants.

pub mod consts;
pub mod env;
pub mod url;

pub use env::{ConfigError, EnvReader};
pub use url::ensure_url_scheme;
