//! Runtime server configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Deserialised from `config.toml` and `PETCONNECT_*` environment
/// variables. Every field has a default set on the config builder, so the
/// binary runs with no config file at all.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  pub host:              String,
  pub port:              u16,
  pub store_path:        PathBuf,
  /// Secret key for the payment provider. The `/payments/intent` route
  /// fails upstream until this is set.
  pub stripe_secret_key: String,
  pub stripe_base_url:   String,
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
