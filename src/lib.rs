//! Markbook, a small HTTP service for keeping student records in a
//! document store. The store is Postgres when `DATABASE_URL` is set and
//! process memory otherwise.

pub mod config;
pub mod err;
pub mod models;
pub mod pg;
pub mod repo;
pub mod store;
pub mod students;

use axum::Json;

use crate::err::Error;

/// What every handler returns: a JSON body or a JSON error.
pub type Payload<T> = Result<Json<T>, Error>;
