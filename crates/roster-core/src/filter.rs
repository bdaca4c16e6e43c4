//! Validation of `GET /persons` query parameters.
//!
//! | parameter | valid iff |
//! |-----------|-----------|
//! | `gender` | exactly `male` or `female` |
//! | `ageplus` | only ASCII digits |
//! | `ageminus` | only ASCII digits |
//! | `nationality` | contains no digit |
//! | `limit` | integer >= 1 |
//! | `offset` | integer >= -1 (`-1` means unset) |

use crate::{Error, Result, person::Gender, query::PersonQuery};

pub const GENDER: &str = "gender";
pub const AGE_PLUS: &str = "ageplus";
pub const AGE_MINUS: &str = "ageminus";
pub const NATIONALITY: &str = "nationality";
pub const LIMIT: &str = "limit";
pub const OFFSET: &str = "offset";

const KNOWN: [&str; 6] = [GENDER, AGE_PLUS, AGE_MINUS, NATIONALITY, LIMIT, OFFSET];

fn has_digit(value: &str) -> bool { value.bytes().any(|b| b.is_ascii_digit()) }

fn is_age(value: &str) -> bool {
  value.bytes().all(|b| b.is_ascii_digit()) && value.parse::<i64>().is_ok()
}

/// Check `value` against the grammar of `param`, returning it unchanged when
/// valid.
pub fn validate_filter<'a>(param: &str, value: &'a str) -> Result<&'a str> {
  let valid = match param {
    GENDER => !has_digit(value) && matches!(value, "male" | "female"),
    AGE_PLUS | AGE_MINUS => is_age(value),
    NATIONALITY => !has_digit(value),
    LIMIT => value.parse::<i64>().is_ok_and(|n| n >= 1),
    OFFSET => value.parse::<i64>().is_ok_and(|n| n >= -1),
    other => return Err(Error::UndefinedFilter(other.to_owned())),
  };

  if valid {
    Ok(value)
  } else {
    Err(Error::InvalidFilter(param.to_owned()))
  }
}

fn parse_int(param: &str, value: &str) -> Result<i64> {
  value
    .parse()
    .map_err(|_| Error::InvalidFilter(param.to_owned()))
}

// ─── Filter ──────────────────────────────────────────────────────────────────

/// One validated, typed query parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
  Gender(Gender),
  AgeAbove(i64),
  AgeBelow(i64),
  Nationality(String),
  Limit(i64),
  /// `None` when the caller passed the `-1` sentinel.
  Offset(Option<i64>),
}

impl Filter {
  pub fn parse(param: &str, raw: &str) -> Result<Self> {
    let value = validate_filter(param, raw)?;
    Ok(match param {
      GENDER => Self::Gender(value.parse()?),
      AGE_PLUS => Self::AgeAbove(parse_int(param, value)?),
      AGE_MINUS => Self::AgeBelow(parse_int(param, value)?),
      NATIONALITY => Self::Nationality(value.to_owned()),
      LIMIT => Self::Limit(parse_int(param, value)?),
      OFFSET => match parse_int(param, value)? {
        -1 => Self::Offset(None),
        n => Self::Offset(Some(n)),
      },
      other => return Err(Error::UndefinedFilter(other.to_owned())),
    })
  }
}

impl PersonQuery {
  /// Apply a single filter, replacing any earlier value for the same field.
  pub fn apply(&mut self, filter: Filter) {
    match filter {
      Filter::Gender(g) => self.gender = Some(g),
      Filter::AgeAbove(n) => self.age_above = Some(n),
      Filter::AgeBelow(n) => self.age_below = Some(n),
      Filter::Nationality(n) => self.nationality = Some(n),
      Filter::Limit(n) => self.limit = Some(n),
      Filter::Offset(n) => self.offset = n,
    }
  }

  /// Build a query from raw `(name, value)` pairs as they appear in a URL.
  ///
  /// Only the first occurrence of each known name is read; unknown names are
  /// ignored. Empty values count as absent.
  pub fn from_params<I, K, V>(params: I) -> Result<Self>
  where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
  {
    let mut query = Self::default();
    let mut seen = [false; KNOWN.len()];
    for (param, raw) in params {
      let (param, raw) = (param.as_ref(), raw.as_ref());
      let Some(slot) = KNOWN.iter().position(|known| *known == param) else {
        continue;
      };
      if std::mem::replace(&mut seen[slot], true) || raw.is_empty() {
        continue;
      }
      query.apply(Filter::parse(param, raw)?);
    }
    Ok(query)
  }
}
