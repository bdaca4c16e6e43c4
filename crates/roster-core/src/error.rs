//! Error types for `roster-core`.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error("query parameter is undefined: {0:?}")]
  UndefinedFilter(String),

  #[error("{0} query parameter is not valid")]
  InvalidFilter(String),

  #[error("name and surname must not be empty")]
  MissingName,

  #[error("unknown gender: {0:?}")]
  UnknownGender(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
