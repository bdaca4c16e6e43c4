//! Rendering of [`PersonQuery`] into a parameterised `SELECT`.
//!
//! Filter values never appear in the SQL text; each one is bound to a
//! numbered placeholder in the order the predicates are emitted.

use roster_core::query::{PersonQuery, SqlValue};

use crate::encode::PERSON_COLUMNS;

/// A statement ready to be prepared, with its bound values in placeholder
/// order.
#[derive(Debug, PartialEq, Eq)]
pub struct Statement {
  pub sql:    String,
  pub params: Vec<SqlValue>,
}

/// SQLite needs a `LIMIT` before any `OFFSET`; `-1` means "no limit".
const NO_LIMIT: i64 = -1;

pub fn select_persons(query: &PersonQuery) -> Statement {
  let mut sql = format!("SELECT {PERSON_COLUMNS} FROM persons");
  let mut params = Vec::new();

  for pred in query.predicates() {
    let keyword = if params.is_empty() { "WHERE" } else { "AND" };
    params.push(pred.value);
    sql.push_str(&format!(
      " {keyword} {} {} ?{}",
      pred.column,
      pred.op.as_sql(),
      params.len()
    ));
  }

  sql.push_str(" ORDER BY id ASC");

  let limit = match (query.limit, query.offset) {
    (Some(n), _) => Some(n),
    (None, Some(_)) => Some(NO_LIMIT),
    (None, None) => None,
  };
  if let Some(n) = limit {
    params.push(SqlValue::Integer(n));
    sql.push_str(&format!(" LIMIT ?{}", params.len()));
  }
  if let Some(n) = query.offset {
    params.push(SqlValue::Integer(n));
    sql.push_str(&format!(" OFFSET ?{}", params.len()));
  }

  Statement { sql, params }
}
