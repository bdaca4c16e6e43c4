//! Encoding and decoding helpers between Rust domain types and the values
//! stored in SQLite columns.

use roster_core::{
  person::{Gender, Person},
  query::SqlValue,
};
use rusqlite::types::Value;

use crate::Result;

// ─── Bound values ────────────────────────────────────────────────────────────

pub fn encode_value(v: SqlValue) -> Value {
  match v {
    SqlValue::Integer(n) => Value::Integer(n),
    SqlValue::Text(s) => Value::Text(s),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list shared by every `SELECT`; [`RawPerson::from_row`] relies on
/// this order.
pub const PERSON_COLUMNS: &str =
  "id, name, surname, patronymic, age, gender, nationality";

/// Raw values read directly from a `persons` row.
pub struct RawPerson {
  pub id:          i64,
  pub name:        String,
  pub surname:     String,
  pub patronymic:  String,
  pub age:         i64,
  pub gender:      String,
  pub nationality: String,
}

impl RawPerson {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      name:        row.get(1)?,
      surname:     row.get(2)?,
      patronymic:  row.get(3)?,
      age:         row.get(4)?,
      gender:      row.get(5)?,
      nationality: row.get(6)?,
    })
  }

  pub fn into_person(self) -> Result<Person> {
    Ok(Person {
      id:          self.id,
      name:        self.name,
      surname:     self.surname,
      patronymic:  self.patronymic,
      age:         self.age,
      gender:      self.gender.parse::<Gender>()?,
      nationality: self.nationality,
    })
  }
}
