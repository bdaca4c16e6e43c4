//! JSON HTTP API for Roster.
//!
//! Exposes an axum [`Router`] serving `/persons`, backed by any
//! [`PersonStore`] and any [`Enricher`]. Transport and tracing layers are the
//! caller's responsibility.

pub mod error;
pub mod persons;

use std::sync::Arc;

use axum::{Router, routing::any};
use roster_core::store::PersonStore;
use roster_enrich::Enricher;

pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through the handler.
#[derive(Clone)]
pub struct AppState<S, E> {
  pub store:    Arc<S>,
  pub enricher: Arc<E>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the API router. `/persons` accepts every method so that unsupported
/// ones get an explicit 405 from [`persons::dispatch`].
pub fn router<S, E>(state: AppState<S, E>) -> Router
where
  S: PersonStore + Clone + 'static,
  E: Enricher + Clone + 'static,
{
  Router::new()
    .route("/persons", any(persons::dispatch::<S, E>))
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
  };

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
  };
  use roster_core::{
    person::{Enrichment, Gender, NewPerson, Person},
    query::PersonQuery,
  };
  use roster_enrich::{EnrichError, Service};
  use roster_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  use super::*;

  /// Answers every name with a fixed enrichment, or "undetermined" when
  /// `result` is `None`. Counts calls.
  #[derive(Clone)]
  struct StubEnricher {
    result: Option<Enrichment>,
    calls:  Arc<AtomicUsize>,
  }

  impl Enricher for StubEnricher {
    async fn enrich(&self, _name: &str) -> Result<Enrichment, EnrichError> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      self.result.clone().ok_or(EnrichError::Undetermined {
        service: Service::Age,
      })
    }
  }

  fn alice_facts() -> Enrichment {
    Enrichment {
      age:         30,
      gender:      Gender::Female,
      nationality: "US".into(),
    }
  }

  async fn make_state(
    result: Option<Enrichment>,
  ) -> AppState<SqliteStore, StubEnricher> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    AppState {
      store:    Arc::new(store),
      enricher: Arc::new(StubEnricher {
        result,
        calls: Arc::new(AtomicUsize::new(0)),
      }),
    }
  }

  async fn oneshot_raw(
    state:  AppState<SqliteStore, StubEnricher>,
    method: &str,
    uri:    &str,
    body:   &str,
  ) -> Response {
    let req = Request::builder()
      .method(method)
      .uri(uri)
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(body.to_string()))
      .unwrap();
    router(state).oneshot(req).await.unwrap()
  }

  async fn json_body(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  async fn list(
    state: AppState<SqliteStore, StubEnricher>,
    uri: &str,
  ) -> Vec<Person> {
    let resp = oneshot_raw(state, "GET", uri, "").await;
    assert_eq!(resp.status(), StatusCode::OK);
    serde_json::from_value(json_body(resp).await).unwrap()
  }

  async fn create(state: AppState<SqliteStore, StubEnricher>, body: Value) {
    let resp = oneshot_raw(state, "POST", "/persons", &body.to_string()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
  }

  // ── GET ─────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn get_empty_store_returns_empty_array() {
    let state = make_state(Some(alice_facts())).await;
    let resp = oneshot_raw(state, "GET", "/persons", "").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let ct = resp.headers().get(header::CONTENT_TYPE).unwrap();
    assert_eq!(ct, "application/json");
    assert_eq!(json_body(resp).await, json!([]));
  }

  #[tokio::test]
  async fn get_with_invalid_filters_returns_400() {
    for uri in [
      "/persons?gender=3",
      "/persons?gender=other",
      "/persons?ageplus=12a",
      "/persons?ageminus=-5",
      "/persons?nationality=US1",
      "/persons?limit=0",
      "/persons?limit=abc",
      "/persons?offset=-2",
    ] {
      let state = make_state(Some(alice_facts())).await;
      let resp = oneshot_raw(state, "GET", uri, "").await;
      assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
      let body = json_body(resp).await;
      assert!(body["error"].is_string(), "{uri}: {body}");
    }
  }

  #[tokio::test]
  async fn get_filters_and_paginates() {
    let state = make_state(Some(alice_facts())).await;
    for name in ["Alice", "Beth", "Cleo"] {
      create(state.clone(), json!({ "name": name, "surname": "Smith" })).await;
    }

    let all = list(state.clone(), "/persons?gender=female&ageplus=20").await;
    assert_eq!(all.len(), 3);

    let none = list(state.clone(), "/persons?gender=male").await;
    assert!(none.is_empty());

    let page = list(state.clone(), "/persons?limit=1&offset=1").await;
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].name, "Beth");

    let rest = list(state, "/persons?offset=-1&nationality=US&ageminus=31").await;
    assert_eq!(rest.len(), 3);
  }

  #[tokio::test]
  async fn get_ignores_unknown_and_repeated_params() {
    let state = make_state(Some(alice_facts())).await;
    create(state.clone(), json!({ "name": "Alice", "surname": "Smith" })).await;

    assert_eq!(list(state.clone(), "/persons?_=1700000000").await.len(), 1);
    assert_eq!(list(state.clone(), "/persons?page=2&sex=").await.len(), 1);

    let first_wins =
      list(state, "/persons?gender=male&gender=female&limit=5&limit=0").await;
    assert!(first_wins.is_empty());
  }

  // ── POST ────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn post_persists_enriched_person() {
    let state = make_state(Some(alice_facts())).await;
    let resp = oneshot_raw(
      state.clone(),
      "POST",
      "/persons",
      r#"{"name":"Alice","surname":"Smith","sex":"male","age":99}"#,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let created = json_body(resp).await;
    assert_eq!(created["sex"], "female");
    assert_eq!(created["age"], 30);

    let persons = list(state, "/persons").await;
    assert_eq!(persons, vec![Person {
      id:          1,
      name:        "Alice".into(),
      surname:     "Smith".into(),
      patronymic:  String::new(),
      age:         30,
      gender:      Gender::Female,
      nationality: "US".into(),
    }]);
  }

  #[tokio::test]
  async fn post_with_empty_name_returns_400_without_enrichment() {
    let state = make_state(Some(alice_facts())).await;
    let resp = oneshot_raw(
      state.clone(),
      "POST",
      "/persons",
      r#"{"name":"","surname":"Smith"}"#,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(state.enricher.calls.load(Ordering::SeqCst), 0);
    assert!(list(state, "/persons").await.is_empty());
  }

  #[tokio::test]
  async fn post_with_failed_enrichment_stores_nothing() {
    let state = make_state(None).await;
    let resp = oneshot_raw(
      state.clone(),
      "POST",
      "/persons",
      r#"{"name":"Xq","surname":"Smith"}"#,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = json_body(resp).await;
    assert!(body["error"].as_str().unwrap().contains("can't determine age"));
    assert!(list(state, "/persons").await.is_empty());
  }

  #[tokio::test]
  async fn post_with_malformed_json_returns_400() {
    let state = make_state(Some(alice_facts())).await;
    let resp = oneshot_raw(state, "POST", "/persons", "{not json").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  // ── PATCH ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn patch_replaces_person() {
    let state = make_state(Some(alice_facts())).await;
    create(state.clone(), json!({ "name": "Alice", "surname": "Smith" })).await;

    let body = json!({
      "id": 1, "name": "Alicia", "surname": "Smythe", "patronymic": "J",
      "age": 31, "sex": "female", "nationality": "GB"
    });
    let resp = oneshot_raw(state.clone(), "PATCH", "/persons", &body.to_string()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await, json!({ "rows_affected": 1 }));

    let persons = list(state, "/persons").await;
    assert_eq!(persons[0].name, "Alicia");
    assert_eq!(persons[0].nationality, "GB");
    assert_eq!(persons[0].age, 31);
  }

  #[tokio::test]
  async fn patch_unknown_id_succeeds_with_zero_rows() {
    let state = make_state(Some(alice_facts())).await;
    let body = json!({
      "id": 42, "name": "Nobody", "surname": "Here",
      "age": 1, "sex": "male", "nationality": "US"
    });
    let resp = oneshot_raw(state, "PATCH", "/persons", &body.to_string()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await, json!({ "rows_affected": 0 }));
  }

  #[tokio::test]
  async fn patch_with_empty_surname_returns_400() {
    let state = make_state(Some(alice_facts())).await;
    create(state.clone(), json!({ "name": "Alice", "surname": "Smith" })).await;

    let body = json!({
      "id": 1, "name": "Alice", "surname": "",
      "age": 30, "sex": "female", "nationality": "US"
    });
    let resp = oneshot_raw(state.clone(), "PATCH", "/persons", &body.to_string()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(list(state, "/persons").await[0].surname, "Smith");
  }

  #[tokio::test]
  async fn patch_with_unknown_sex_returns_400() {
    let state = make_state(Some(alice_facts())).await;
    let body = json!({
      "id": 1, "name": "Alice", "surname": "Smith",
      "age": 30, "sex": "other", "nationality": "US"
    });
    let resp = oneshot_raw(state, "PATCH", "/persons", &body.to_string()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  // ── DELETE ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn delete_existing_returns_204() {
    let state = make_state(Some(alice_facts())).await;
    create(state.clone(), json!({ "name": "Alice", "surname": "Smith" })).await;

    let resp = oneshot_raw(state.clone(), "DELETE", "/persons", r#"{"id":1}"#).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(list(state, "/persons").await.is_empty());
  }

  #[tokio::test]
  async fn delete_unknown_id_returns_204() {
    let state = make_state(Some(alice_facts())).await;
    let resp = oneshot_raw(state, "DELETE", "/persons", r#"{"id":999}"#).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
  }

  #[tokio::test]
  async fn delete_without_id_returns_400() {
    let state = make_state(Some(alice_facts())).await;
    let resp = oneshot_raw(state, "DELETE", "/persons", "{}").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  // ── Store failures ──────────────────────────────────────────────────────────

  #[derive(Debug, thiserror::Error)]
  #[error("disk on fire")]
  struct DiskError;

  /// Fails every operation.
  #[derive(Clone)]
  struct BrokenStore;

  impl PersonStore for BrokenStore {
    type Error = DiskError;

    async fn get_persons(&self, _query: &PersonQuery) -> Result<Vec<Person>, DiskError> {
      Err(DiskError)
    }

    async fn add_person(&self, _person: NewPerson) -> Result<Person, DiskError> {
      Err(DiskError)
    }

    async fn update_person(&self, _id: i64, _person: NewPerson) -> Result<usize, DiskError> {
      Err(DiskError)
    }

    async fn delete_person_by_id(&self, _id: i64) -> Result<usize, DiskError> {
      Err(DiskError)
    }
  }

  async fn oneshot_broken(method: &str, body: &str) -> Response {
    let state = AppState {
      store:    Arc::new(BrokenStore),
      enricher: Arc::new(StubEnricher {
        result: Some(alice_facts()),
        calls:  Arc::new(AtomicUsize::new(0)),
      }),
    };
    let req = Request::builder()
      .method(method)
      .uri("/persons")
      .body(Body::from(body.to_string()))
      .unwrap();
    router(state).oneshot(req).await.unwrap()
  }

  #[tokio::test]
  async fn failed_read_returns_500_with_json_error() {
    let resp = oneshot_broken("GET", "").await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
      json_body(resp).await,
      json!({ "error": "store error: disk on fire" })
    );
  }

  #[tokio::test]
  async fn failed_writes_return_400_with_json_error() {
    let update = json!({
      "id": 1, "name": "Alice", "surname": "Smith",
      "age": 30, "sex": "female", "nationality": "US"
    });
    for (method, body) in [
      ("POST", r#"{"name":"Alice","surname":"Smith"}"#.to_string()),
      ("PATCH", update.to_string()),
      ("DELETE", r#"{"id":1}"#.to_string()),
    ] {
      let resp = oneshot_broken(method, &body).await;
      assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{method}");
      let body = json_body(resp).await;
      assert_eq!(body["error"], "store error: disk on fire", "{method}");
    }
  }

  // ── Other methods ───────────────────────────────────────────────────────────

  #[tokio::test]
  async fn unsupported_method_returns_405() {
    let state = make_state(Some(alice_facts())).await;
    let resp = oneshot_raw(state, "PUT", "/persons", "{}").await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    let allow = resp.headers().get(header::ALLOW).unwrap();
    assert_eq!(allow, "GET, POST, PATCH, DELETE");
  }
}
