//! Handler for the `/persons` resource.
//!
//! | Method | Body | Success |
//! |--------|------|---------|
//! | `GET` | none; optional `gender`, `ageplus`, `ageminus`, `nationality`, `limit`, `offset` | 200 + JSON array |
//! | `POST` | [`CreateBody`] | 201 + created person |
//! | `PATCH` | [`UpdateBody`] | 200 + `{"rows_affected": n}` |
//! | `DELETE` | [`DeleteBody`] | 204 |
//!
//! Any other method gets 405.

use axum::{
  Json,
  body::{Body, Bytes},
  extract::{Query, Request, State},
  http::{StatusCode, Uri},
  response::{IntoResponse, Response},
};
use roster_core::{
  person::{Gender, NewPerson, check_names},
  query::PersonQuery,
  store::PersonStore,
};
use roster_enrich::Enricher;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{AppState, error::ApiError};

const MAX_BODY_BYTES: usize = 1024 * 1024;

// ─── Bodies ──────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /persons`.
///
/// `age`, `sex` and `nationality` may be present but are ignored; enrichment
/// supplies them.
#[derive(Debug, Deserialize)]
pub struct CreateBody {
  #[serde(default)]
  pub name:       String,
  #[serde(default)]
  pub surname:    String,
  #[serde(default)]
  pub patronymic: String,
}

/// JSON body accepted by `PATCH /persons`. Every field is replaced, so all of
/// them except `patronymic` must be supplied.
#[derive(Debug, Deserialize)]
pub struct UpdateBody {
  pub id:          i64,
  #[serde(default)]
  pub name:        String,
  #[serde(default)]
  pub surname:     String,
  #[serde(default)]
  pub patronymic:  String,
  pub age:         i64,
  pub sex:         Gender,
  pub nationality: String,
}

impl From<UpdateBody> for NewPerson {
  fn from(b: UpdateBody) -> Self {
    NewPerson {
      name:        b.name,
      surname:     b.surname,
      patronymic:  b.patronymic,
      age:         b.age,
      gender:      b.sex,
      nationality: b.nationality,
    }
  }
}

/// JSON body accepted by `DELETE /persons`.
#[derive(Debug, Deserialize)]
pub struct DeleteBody {
  pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct RowsAffected {
  pub rows_affected: usize,
}

// ─── Dispatch ────────────────────────────────────────────────────────────────

/// Routes every method on `/persons`.
pub async fn dispatch<S, E>(
  State(state): State<AppState<S, E>>,
  req: Request<Body>,
) -> Response
where
  S: PersonStore + Clone + 'static,
  E: Enricher + Clone + 'static,
{
  let method = req.method().clone();
  let result = match method.as_str() {
    "GET" => list(&state, req.uri()).await,
    "POST" => match collect_body(req).await {
      Ok(body) => create(&state, &body).await,
      Err(e) => Err(e),
    },
    "PATCH" => match collect_body(req).await {
      Ok(body) => update(&state, &body).await,
      Err(e) => Err(e),
    },
    "DELETE" => match collect_body(req).await {
      Ok(body) => delete(&state, &body).await,
      Err(e) => Err(e),
    },
    _ => Err(ApiError::MethodNotAllowed),
  };

  result.unwrap_or_else(|e| {
    tracing::debug!(%method, error = %e, "request failed");
    e.into_response()
  })
}

async fn collect_body(req: Request<Body>) -> Result<Bytes, ApiError> {
  axum::body::to_bytes(req.into_body(), MAX_BODY_BYTES)
    .await
    .map_err(|e| ApiError::BadRequest(format!("can't read request body: {e}")))
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
  serde_json::from_slice(body)
    .map_err(|e| ApiError::BadRequest(format!("can't decode request body: {e}")))
}

// ─── Operations ──────────────────────────────────────────────────────────────

/// `GET /persons[?gender=..][&ageplus=..][&ageminus=..][&nationality=..][&limit=..][&offset=..]`
async fn list<S, E>(
  state: &AppState<S, E>,
  uri: &Uri,
) -> Result<Response, ApiError>
where
  S: PersonStore,
{
  let Query(params) = Query::<Vec<(String, String)>>::try_from_uri(uri)
    .map_err(|e| ApiError::BadRequest(e.body_text()))?;
  let query = PersonQuery::from_params(params)?;

  let persons = state
    .store
    .get_persons(&query)
    .await
    .map_err(|e| ApiError::Read(Box::new(e)))?;
  Ok((StatusCode::OK, Json(persons)).into_response())
}

/// `POST /persons` — enrich, then insert. Returns 201 + the stored person.
async fn create<S, E>(
  state: &AppState<S, E>,
  body: &[u8],
) -> Result<Response, ApiError>
where
  S: PersonStore,
  E: Enricher,
{
  let body: CreateBody = decode(body)?;
  check_names(&body.name, &body.surname)?;

  let enrichment = state
    .enricher
    .enrich(&body.name)
    .await
    .inspect_err(|e| tracing::warn!(name = %body.name, error = %e, "enrichment failed"))?;

  let person = state
    .store
    .add_person(NewPerson::enriched(
      body.name,
      body.surname,
      body.patronymic,
      enrichment,
    ))
    .await
    .map_err(|e| ApiError::Write(Box::new(e)))?;

  tracing::info!(id = person.id, "person created");
  Ok((StatusCode::CREATED, Json(person)).into_response())
}

/// `PATCH /persons` — replace every field of the person with the body's `id`.
async fn update<S, E>(
  state: &AppState<S, E>,
  body: &[u8],
) -> Result<Response, ApiError>
where
  S: PersonStore,
{
  let body: UpdateBody = decode(body)?;
  let id = body.id;
  let person = NewPerson::from(body);
  person.check_names()?;

  let rows_affected = state
    .store
    .update_person(id, person)
    .await
    .map_err(|e| ApiError::Write(Box::new(e)))?;
  Ok((StatusCode::OK, Json(RowsAffected { rows_affected })).into_response())
}

/// `DELETE /persons` — body: `{"id": 1}`. Unknown ids still get 204.
async fn delete<S, E>(
  state: &AppState<S, E>,
  body: &[u8],
) -> Result<Response, ApiError>
where
  S: PersonStore,
{
  let DeleteBody { id } = decode(body)?;

  let removed = state
    .store
    .delete_person_by_id(id)
    .await
    .map_err(|e| ApiError::Write(Box::new(e)))?;
  tracing::debug!(id, removed, "delete");
  Ok(StatusCode::NO_CONTENT.into_response())
}
