//! `PostgreSQL` adapters for release lifecycle persistence.

mod models;
mod repository;
mod schema;

pub use repository::{PostgresPitchingRepository, PostgresReleaseRepository, ReleasePgPool};
