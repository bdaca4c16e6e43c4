//! Core types and trait definitions for the Roster person service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod error;
pub mod filter;
pub mod person;
pub mod query;
pub mod store;

pub use error::{Error, Result};
