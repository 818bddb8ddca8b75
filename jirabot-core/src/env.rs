//! Environment lookup for process configuration.
//!
//! Configuration is read once at startup. [`EnvReader`] wraps a lookup
//! function so tests can supply variables without mutating the process
//! environment, and it collects every missing required variable so the
//! operator sees the full list in one error instead of fixing them one by one.

use std::fmt::Display;
use std::str::FromStr;

use thiserror::Error;

/// Errors raised while building configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
  #[error("Missing required environment variables: {}", .0.join(", "))]
  Missing(Vec<String>),
  #[error("Invalid value for {key}: {reason}")]
  Invalid { key: String, reason: String },
  #[error("Host cannot be empty")]
  EmptyHost,
  #[error("Failed to parse URL: '{0}'. Ensure it has a valid scheme.")]
  InvalidUrl(String),
}

type Lookup<'a> = Box<dyn Fn(&str) -> Option<String> + 'a>;

/// Reads configuration values from a lookup function.
pub struct EnvReader<'a> {
  lookup: Lookup<'a>,
  missing: Vec<String>,
}

impl EnvReader<'static> {
  /// Read from the process environment.
  pub fn process() -> Self {
    Self::from_fn(|key| std::env::var(key).ok())
  }
}

impl<'a> EnvReader<'a> {
  pub fn from_fn<F>(lookup: F) -> Self
  where
    F: Fn(&str) -> Option<String> + 'a,
  {
    Self {
      lookup: Box::new(lookup),
      missing: Vec::new(),
    }
  }

  /// Return a trimmed value, treating blank values as unset.
  pub fn optional(&self, key: &str) -> Option<String> {
    (self.lookup)(key)
      .map(|value| value.trim().to_string())
      .filter(|value| !value.is_empty())
  }

  /// Return the value of a required variable.
  ///
  /// A missing variable is recorded and an empty string is returned; the
  /// caller must call [`EnvReader::finish`] before using the values.
  pub fn required(&mut self, key: &str) -> String {
    match self.optional(key) {
      Some(value) => value,
      None => {
        self.missing.push(key.to_string());
        String::new()
      }
    }
  }

  /// Parse an optional variable, falling back to `default` when unset.
  pub fn parsed_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
  where
    T: FromStr,
    T::Err: Display,
  {
    match self.optional(key) {
      Some(raw) => raw.parse::<T>().map_err(|e| ConfigError::Invalid {
        key: key.to_string(),
        reason: e.to_string(),
      }),
      None => Ok(default),
    }
  }

  /// Fail if any required variable was missing.
  pub fn finish(self) -> Result<(), ConfigError> {
    if self.missing.is_empty() {
      Ok(())
    } else {
      Err(ConfigError::Missing(self.missing))
    }
  }
}
