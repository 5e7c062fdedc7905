#[macro_use]
extern crate tracing;

use axum::extract::FromRef;
use common::DbPool;

mod config;

pub mod controllers;
pub mod routes;
pub mod schemas;
pub mod session;

pub use config::Config;
pub use session::{MaybeSession, Session};

/// Shared state for the entire app
#[derive(Clone)]
pub struct AppState {
	pub config:        Config,
	pub database_pool: DbPool,
}

impl FromRef<AppState> for Config {
	fn from_ref(input: &AppState) -> Self { input.config.clone() }
}

impl FromRef<AppState> for DbPool {
	fn from_ref(input: &AppState) -> Self { input.database_pool.clone() }
}
