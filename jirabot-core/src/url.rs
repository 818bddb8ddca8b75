//! Host URL normalization.
//!
//! Hosts are commonly configured without a scheme (`company.atlassian.net`),
//! so every service base URL passes through [`ensure_url_scheme`].

use url::{Position, Url};

use crate::env::ConfigError;

/// Render a URL without the trailing slash the parser adds to a bare host.
fn normalize_url(url: &Url) -> String {
  let mut result = String::new();
  result.push_str(&url[..Position::BeforePath]);

  let path = url.path().trim_end_matches('/');
  result.push_str(path);

  if let Some(query) = url.query() {
    result.push('?');
    result.push_str(query);
  }

  result
}

fn parse_with_https_prefix(input: &str) -> Result<Url, ConfigError> {
  let with_scheme = format!("https://{input}");
  Url::parse(&with_scheme).map_err(|_| ConfigError::InvalidUrl(input.to_string()))
}

/// Ensure a URL has a proper scheme (http:// or https://).
///
/// If the input doesn't include a scheme, assumes https://. Trailing slashes
/// are removed so callers can append `/rest/...` style paths directly.
pub fn ensure_url_scheme(input: &str) -> Result<String, ConfigError> {
  let trimmed = input.trim();
  if trimmed.is_empty() {
    return Err(ConfigError::EmptyHost);
  }

  let url = match Url::parse(trimmed) {
    // "localhost:8080" parses as scheme "localhost", so require a host too
    Ok(url) if url.host().is_some() => url,
    _ => parse_with_https_prefix(trimmed)?,
  };

  Ok(normalize_url(&url))
}
