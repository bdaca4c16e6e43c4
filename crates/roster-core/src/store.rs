//! The `PersonStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `roster-store-sqlite`).
//! The HTTP layer (`roster-api`) depends on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use crate::{
  person::{NewPerson, Person},
  query::PersonQuery,
};

/// Abstraction over a Roster person store backend.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait PersonStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Return persons matching `query`, ordered by ascending id.
  fn get_persons<'a>(
    &'a self,
    query: &'a PersonQuery,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + 'a;

  /// Insert a new person and return it with its assigned id.
  ///
  /// Refuses records with an empty name or surname.
  fn add_person(
    &self,
    person: NewPerson,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Replace every field of person `id`. Returns the number of rows changed;
  /// an unknown id is not an error and yields `0`.
  ///
  /// Refuses records with an empty name or surname.
  fn update_person(
    &self,
    id: i64,
    person: NewPerson,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Delete person `id`. Returns the number of rows removed; an unknown id is
  /// not an error and yields `0`.
  fn delete_person_by_id(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;
}
