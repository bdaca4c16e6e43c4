//! [`SqliteStore`] — the SQLite implementation of [`PersonStore`].

use std::path::Path;

use roster_core::{
  person::{NewPerson, Person},
  query::PersonQuery,
  store::PersonStore,
};

use crate::{
  Result,
  encode::{RawPerson, encode_value},
  schema::SCHEMA,
  sql::{Statement, select_persons},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Roster person store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── PersonStore impl ────────────────────────────────────────────────────────

impl PersonStore for SqliteStore {
  type Error = crate::Error;

  async fn get_persons(&self, query: &PersonQuery) -> Result<Vec<Person>> {
    let Statement { sql, params } = select_persons(query);
    let values: Vec<_> = params.into_iter().map(encode_value).collect();

    let raws: Vec<RawPerson> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(values), RawPerson::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .inspect_err(|e| tracing::debug!(error = %e, "get_persons failed"))?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }

  async fn add_person(&self, person: NewPerson) -> Result<Person> {
    person.check_names()?;

    let row = person.clone();
    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO persons (name, surname, patronymic, age, gender, nationality)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            row.name,
            row.surname,
            row.patronymic,
            row.age,
            row.gender.as_str(),
            row.nationality,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await
      .inspect_err(|e| tracing::debug!(error = %e, "add_person failed"))?;

    Ok(person.into_person(id))
  }

  async fn update_person(&self, id: i64, person: NewPerson) -> Result<usize> {
    person.check_names()?;

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE persons
              SET name = ?1, surname = ?2, patronymic = ?3,
                  age = ?4, gender = ?5, nationality = ?6
            WHERE id = ?7",
          rusqlite::params![
            person.name,
            person.surname,
            person.patronymic,
            person.age,
            person.gender.as_str(),
            person.nationality,
            id,
          ],
        )?)
      })
      .await
      .inspect_err(|e| tracing::debug!(error = %e, id, "update_person failed"))?;

    Ok(changed)
  }

  async fn delete_person_by_id(&self, id: i64) -> Result<usize> {
    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM persons WHERE id = ?1",
          rusqlite::params![id],
        )?)
      })
      .await
      .inspect_err(|e| tracing::debug!(error = %e, id, "delete_person_by_id failed"))?;

    Ok(removed)
  }
}
