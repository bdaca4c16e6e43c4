//! Person records — the only entity the service manages.
//!
//! A person is created from a name supplied by the caller plus three facts
//! (age, gender, nationality) guessed by the enrichment lookups. After that it
//! is replaced wholesale on update and removed outright on delete.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Gender ──────────────────────────────────────────────────────────────────

/// The two values the gender lookup can settle on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
  Male,
  Female,
}

impl Gender {
  /// The string stored in the `gender` column and accepted by the `gender`
  /// query parameter. Must match the serde names above.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Male => "male",
      Self::Female => "female",
    }
  }
}

impl FromStr for Gender {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "male" => Ok(Self::Male),
      "female" => Ok(Self::Female),
      other => Err(Error::UnknownGender(other.to_owned())),
    }
  }
}

impl fmt::Display for Gender {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Person ──────────────────────────────────────────────────────────────────

/// A persisted person.
///
/// `gender` travels as `sex` in JSON but is called `gender` everywhere else
/// (database column, query parameter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
  /// Server-assigned; increases with insertion order and never changes.
  pub id:          i64,
  pub name:        String,
  pub surname:     String,
  pub patronymic:  String,
  pub age:         i64,
  #[serde(rename = "sex")]
  pub gender:      Gender,
  /// Two-letter country code.
  pub nationality: String,
}

// ─── Enrichment ──────────────────────────────────────────────────────────────

/// The facts guessed for a first name by the external lookup services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrichment {
  pub age:         i64,
  pub gender:      Gender,
  pub nationality: String,
}

// ─── NewPerson ───────────────────────────────────────────────────────────────

/// Input to [`crate::store::PersonStore::add_person`] and
/// [`crate::store::PersonStore::update_person`]. The id is always chosen by the
/// store (on insert) or by the caller's path (on update), never carried here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPerson {
  pub name:        String,
  pub surname:     String,
  pub patronymic:  String,
  pub age:         i64,
  pub gender:      Gender,
  pub nationality: String,
}

impl NewPerson {
  /// Combine caller-supplied names with the enriched facts.
  pub fn enriched(
    name: String,
    surname: String,
    patronymic: String,
    enrichment: Enrichment,
  ) -> Self {
    Self {
      name,
      surname,
      patronymic,
      age: enrichment.age,
      gender: enrichment.gender,
      nationality: enrichment.nationality,
    }
  }

  /// Fails with [`Error::MissingName`] unless both name and surname are set.
  pub fn check_names(&self) -> Result<()> {
    check_names(&self.name, &self.surname)
  }

  /// Attach the id assigned by the store.
  pub fn into_person(self, id: i64) -> Person {
    Person {
      id,
      name: self.name,
      surname: self.surname,
      patronymic: self.patronymic,
      age: self.age,
      gender: self.gender,
      nationality: self.nationality,
    }
  }
}

/// Name and surname are mandatory on every write.
pub fn check_names(name: &str, surname: &str) -> Result<()> {
  if name.is_empty() || surname.is_empty() {
    return Err(Error::MissingName);
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn alice() -> Person {
    Person {
      id:          7,
      name:        "Alice".into(),
      surname:     "Smith".into(),
      patronymic:  String::new(),
      age:         30,
      gender:      Gender::Female,
      nationality: "US".into(),
    }
  }

  #[test]
  fn gender_is_called_sex_on_the_wire() {
    let json = serde_json::to_value(alice()).unwrap();
    assert_eq!(json["sex"], "female");
    assert!(json.get("gender").is_none());

    let back: Person = serde_json::from_value(json).unwrap();
    assert_eq!(back, alice());
  }

  #[test]
  fn gender_parses_only_known_values() {
    assert_eq!("male".parse::<Gender>().unwrap(), Gender::Male);
    assert_eq!("female".parse::<Gender>().unwrap(), Gender::Female);
    assert_eq!(
      "Female".parse::<Gender>().unwrap_err(),
      Error::UnknownGender("Female".into())
    );
  }

  #[test]
  fn names_are_mandatory() {
    assert!(check_names("Alice", "Smith").is_ok());
    assert_eq!(check_names("", "Smith"), Err(Error::MissingName));
    assert_eq!(check_names("Alice", ""), Err(Error::MissingName));
  }

  #[test]
  fn enriched_copies_every_fact() {
    let p = NewPerson::enriched(
      "Alice".into(),
      "Smith".into(),
      "Jane".into(),
      Enrichment {
        age:         30,
        gender:      Gender::Female,
        nationality: "US".into(),
      },
    )
    .into_person(1);

    assert_eq!(p.id, 1);
    assert_eq!(p.patronymic, "Jane");
    assert_eq!(p.age, 30);
    assert_eq!(p.gender, Gender::Female);
    assert_eq!(p.nationality, "US");
  }
}
