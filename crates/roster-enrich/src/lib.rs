//! Enrichment of new person records with age, gender and nationality guesses.
//!
//! The [`Enricher`] trait is what the HTTP layer depends on. [`HttpEnricher`]
//! implements it against the agify / genderize / nationalize lookup services.

pub mod client;
pub mod error;

use std::future::Future;

use roster_core::person::Enrichment;

pub use client::{EnrichConfig, HttpEnricher};
pub use error::{EnrichError, Service};

/// Derives the enriched facts for a first name.
pub trait Enricher: Send + Sync {
  /// All three facts or the first failure; never a partial result.
  fn enrich<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Enrichment, EnrichError>> + Send + 'a;
}
