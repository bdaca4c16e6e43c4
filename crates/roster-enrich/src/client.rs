//! Async HTTP client for the name-lookup services.
//!
//! | Service | Request | Response |
//! |---------|---------|----------|
//! | agify | `GET ?name=<name>` | `{"age": 30}` |
//! | genderize | `GET ?name=<name>` | `{"gender": "female"}` |
//! | nationalize | `GET ?name=<name>` | `{"country": [{"country_id": "US", "probability": 0.5}]}` |

use std::time::Duration;

use reqwest::Client;
use roster_core::person::{Enrichment, Gender};
use serde::{Deserialize, de::DeserializeOwned};

use crate::{EnrichError, Enricher, Service};

// ─── Configuration ───────────────────────────────────────────────────────────

/// Lookup endpoints and the per-call timeout.
#[derive(Debug, Clone)]
pub struct EnrichConfig {
  pub agify_url:       String,
  pub genderize_url:   String,
  pub nationalize_url: String,
  pub timeout:         Duration,
}

impl Default for EnrichConfig {
  fn default() -> Self {
    Self {
      agify_url:       "https://api.agify.io/".to_string(),
      genderize_url:   "https://api.genderize.io/".to_string(),
      nationalize_url: "https://api.nationalize.io/".to_string(),
      timeout:         Duration::from_secs(10),
    }
  }
}

// ─── Payloads ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct AgePayload {
  age: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct GenderPayload {
  gender: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NationalityPayload {
  #[serde(default)]
  country: Vec<CountryGuess>,
}

/// One scored candidate from the nationality lookup.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CountryGuess {
  pub country_id:  String,
  pub probability: f64,
}

/// The candidate with the highest probability. When several share the
/// maximum, the last of them in input order wins.
pub fn most_probable(candidates: &[CountryGuess]) -> Option<&CountryGuess> {
  candidates
    .iter()
    .max_by(|a, b| a.probability.total_cmp(&b.probability))
}

// ─── Client ──────────────────────────────────────────────────────────────────

/// [`Enricher`] backed by the agify, genderize and nationalize HTTP APIs.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct HttpEnricher {
  client: Client,
  config: EnrichConfig,
}

impl HttpEnricher {
  pub fn new(config: EnrichConfig) -> Result<Self, EnrichError> {
    let client = Client::builder()
      .timeout(config.timeout)
      .build()
      .map_err(EnrichError::Client)?;
    Ok(Self { client, config })
  }

  async fn lookup<T: DeserializeOwned>(
    &self,
    service: Service,
    url: &str,
    name: &str,
  ) -> Result<T, EnrichError> {
    tracing::debug!(%service, name, "looking up name");
    let failed = |source| EnrichError::Lookup { service, source };

    self
      .client
      .get(url)
      .query(&[("name", name)])
      .send()
      .await
      .and_then(reqwest::Response::error_for_status)
      .map_err(failed)?
      .json()
      .await
      .map_err(failed)
  }

  /// Age guess; `0` or `null` means the name was not recognised.
  pub async fn age(&self, name: &str) -> Result<i64, EnrichError> {
    let payload: AgePayload =
      self.lookup(Service::Age, &self.config.agify_url, name).await?;
    match payload.age {
      Some(age) if age > 0 => Ok(age),
      _ => Err(EnrichError::Undetermined { service: Service::Age }),
    }
  }

  /// Gender guess; anything other than `male` / `female` is undetermined.
  pub async fn gender(&self, name: &str) -> Result<Gender, EnrichError> {
    let payload: GenderPayload = self
      .lookup(Service::Gender, &self.config.genderize_url, name)
      .await?;
    payload
      .gender
      .and_then(|g| g.parse().ok())
      .ok_or(EnrichError::Undetermined { service: Service::Gender })
  }

  /// Country code of the most probable nationality.
  pub async fn nationality(&self, name: &str) -> Result<String, EnrichError> {
    let payload: NationalityPayload = self
      .lookup(Service::Nationality, &self.config.nationalize_url, name)
      .await?;
    most_probable(&payload.country)
      .map(|c| c.country_id.clone())
      .ok_or(EnrichError::Undetermined {
        service: Service::Nationality,
      })
  }
}

impl Enricher for HttpEnricher {
  async fn enrich(&self, name: &str) -> Result<Enrichment, EnrichError> {
    let (age, gender, nationality) = tokio::try_join!(
      self.age(name),
      self.gender(name),
      self.nationality(name)
    )?;
    Ok(Enrichment { age, gender, nationality })
  }
}
