use common::DbPool;
use deadpool_diesel::postgres::{Manager, Pool};
use diesel::{Connection, PgConnection, RunQueryDsl, sql_query};
use diesel_migrations::{
	EmbeddedMigrations,
	MigrationHarness,
	embed_migrations,
};
use uuid::Uuid;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

/// A throwaway database carved out of the server behind `DATABASE_URL`,
/// migrated on creation and dropped again when the guard goes out of scope
pub struct TempDb {
	admin_url: String,
	name:      String,
	url:       String,
}

impl TempDb {
	/// Create and migrate a fresh uniquely-named database
	///
	/// # Panics
	/// Panics if `DATABASE_URL` is unset or the server refuses the setup;
	/// every test needs a reachable postgres with createdb rights
	pub fn create() -> Self {
		let admin_url = std::env::var("DATABASE_URL")
			.expect("DATABASE_URL must point at a postgres server");
		let (server, _) = admin_url
			.rsplit_once('/')
			.expect("DATABASE_URL must name a database");

		let name = format!("fieldbook_test_{}", Uuid::new_v4().simple());
		let url = format!("{server}/{name}");

		let mut admin = PgConnection::establish(&admin_url)
			.expect("could not reach the postgres server");

		sql_query(format!("CREATE DATABASE {name};"))
			.execute(&mut admin)
			.expect("could not create the test database");

		let mut conn = PgConnection::establish(&url)
			.expect("could not reach the test database");

		conn.run_pending_migrations(MIGRATIONS)
			.expect("could not migrate the test database");

		Self { admin_url, name, url }
	}

	/// Build an app-shaped pool onto this database
	#[must_use]
	pub fn pool(&self) -> DbPool {
		let manager =
			Manager::new(self.url.clone(), deadpool_diesel::Runtime::Tokio1);

		Pool::builder(manager)
			.build()
			.expect("could not build the test pool")
	}
}

impl Drop for TempDb {
	fn drop(&mut self) {
		// Cleanup is best effort, a leaked test database is only noise
		if let Ok(mut admin) = PgConnection::establish(&self.admin_url) {
			let _ = sql_query(format!(
				"DROP DATABASE {} WITH (FORCE);",
				self.name
			))
			.execute(&mut admin);
		}
	}
}
