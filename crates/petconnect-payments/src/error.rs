//! Error type for `petconnect-payments`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Transport-level failure: connection refused, timeout, TLS, malformed
  /// response body.
  #[error("payment request failed: {0}")]
  Http(#[from] reqwest::Error),

  /// The provider answered with a non-success status.
  #[error("payment provider returned {status}: {body}")]
  Api {
    status: reqwest::StatusCode,
    body:   String,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
