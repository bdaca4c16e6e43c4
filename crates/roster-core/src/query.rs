//! [`PersonQuery`] and the predicates it expands into.
//!
//! Backends never see raw filter strings. They receive an ordered list of
//! [`Predicate`]s, each naming a column, a comparison and a value to bind, and
//! render them with whatever placeholder syntax their driver uses.

use crate::person::Gender;

// ─── Predicate ───────────────────────────────────────────────────────────────

/// The comparison a [`Predicate`] applies between its column and its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
  Eq,
  Gt,
  Lt,
}

impl Comparison {
  pub fn as_sql(&self) -> &'static str {
    match self {
      Self::Eq => "=",
      Self::Gt => ">",
      Self::Lt => "<",
    }
  }
}

/// A value bound to a placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
  Integer(i64),
  Text(String),
}

/// A single condition on the `persons` table, e.g. `age > 20`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
  pub column: &'static str,
  pub op:     Comparison,
  pub value:  SqlValue,
}

// ─── Query ───────────────────────────────────────────────────────────────────

/// Parameters for [`crate::store::PersonStore::get_persons`].
///
/// Every field is optional; an empty query returns all persons ordered by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonQuery {
  pub gender:      Option<Gender>,
  /// Only persons strictly older than this (`ageplus`).
  pub age_above:   Option<i64>,
  /// Only persons strictly younger than this (`ageminus`).
  pub age_below:   Option<i64>,
  pub nationality: Option<String>,
  pub limit:       Option<i64>,
  pub offset:      Option<i64>,
}

impl PersonQuery {
  /// Active predicates in their fixed order: gender, ageplus, ageminus,
  /// nationality. The first becomes the `WHERE` clause, the rest are `AND`-ed.
  pub fn predicates(&self) -> Vec<Predicate> {
    let mut preds = Vec::with_capacity(4);

    if let Some(gender) = self.gender {
      preds.push(Predicate {
        column: "gender",
        op:     Comparison::Eq,
        value:  SqlValue::Text(gender.as_str().to_owned()),
      });
    }
    if let Some(age) = self.age_above {
      preds.push(Predicate {
        column: "age",
        op:     Comparison::Gt,
        value:  SqlValue::Integer(age),
      });
    }
    if let Some(age) = self.age_below {
      preds.push(Predicate {
        column: "age",
        op:     Comparison::Lt,
        value:  SqlValue::Integer(age),
      });
    }
    if let Some(nationality) = &self.nationality {
      preds.push(Predicate {
        column: "nationality",
        op:     Comparison::Eq,
        value:  SqlValue::Text(nationality.clone()),
      });
    }

    preds
  }
}
