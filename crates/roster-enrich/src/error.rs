//! Errors from the enrichment lookups.

use std::fmt;

use thiserror::Error;

/// Which of the three lookup services an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
  Age,
  Gender,
  Nationality,
}

impl fmt::Display for Service {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Age => "age",
      Self::Gender => "gender",
      Self::Nationality => "nationality",
    })
  }
}

#[derive(Debug, Error)]
pub enum EnrichError {
  /// The HTTP client could not be constructed.
  #[error("failed to build HTTP client: {0}")]
  Client(#[source] reqwest::Error),

  /// Network failure, timeout, non-2xx status or undecodable body.
  #[error("{service} lookup failed: {source}")]
  Lookup {
    service: Service,
    #[source]
    source:  reqwest::Error,
  },

  /// The service answered but did not recognise the name.
  #[error("can't determine {service}, check if name is valid")]
  Undetermined { service: Service },
}
