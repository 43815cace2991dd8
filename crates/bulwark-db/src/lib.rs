//! Postgres access for Bulwark
//!
//! A single pool is built at startup and shared by every request. Query
//! failures are logged here and then propagated unchanged; the server maps
//! them to its generic internal error.

mod error;
mod migrate;
mod store;

pub use error::DbError;
pub use migrate::run_migrations;
pub use store::{DataStore, PgStore, SqlParam};
