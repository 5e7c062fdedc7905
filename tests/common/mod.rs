use axum::http::{HeaderName, HeaderValue};
use axum_test::TestServer;
use common::DbPool;
use fieldbook::{AppState, Config, routes, session::PROFILE_ID_HEADER};
use models::{
	Field,
	NewField,
	NewProfile,
	NewVenue,
	Profile,
	Venue,
};

mod db;

use db::TempDb;

#[allow(dead_code)]
pub struct TestEnv {
	pub app:  TestServer,
	pub db:   TempDb,
	pub pool: DbPool,

	pub owner:  Profile,
	pub player: Profile,
	pub venue:  Venue,
	pub field:  Field,
}

impl TestEnv {
	/// Get a test environment with a seeded temporary database
	///
	/// # Panics
	/// Panics if building the test server or seeding fails
	pub async fn new() -> Self {
		let config = Config::from_env();

		let db = TempDb::create();
		let pool = db.pool();

		let conn = pool.get().await.unwrap();

		let owner = NewProfile { username: "owner".to_string() }
			.insert(&conn)
			.await
			.unwrap();
		let player = NewProfile { username: "player".to_string() }
			.insert(&conn)
			.await
			.unwrap();

		let venue =
			NewVenue { name: "city sports".to_string(), owner_id: owner.id }
				.insert(&conn)
				.await
				.unwrap();

		let field = NewField {
			venue_id:       venue.id,
			name:           "pitch one".to_string(),
			price_per_hour: 200,
		}
		.insert(&conn)
		.await
		.unwrap();

		let state = AppState { config, database_pool: pool.clone() };
		let app = routes::get_app_router(state);

		let test_server = TestServer::builder().build(app).unwrap();

		TestEnv { app: test_server, db, pool, owner, player, venue, field }
	}

	/// Add another field to the seeded venue
	#[allow(dead_code)]
	pub async fn create_field(&self, price_per_hour: i32) -> Field {
		let conn = self.pool.get().await.unwrap();

		NewField {
			venue_id: self.venue.id,
			name: "pitch two".to_string(),
			price_per_hour,
		}
		.insert(&conn)
		.await
		.unwrap()
	}
}

/// The identity header the authenticating gateway would set
#[allow(dead_code)]
pub fn auth_header(profile_id: i32) -> (HeaderName, HeaderValue) {
	(
		HeaderName::from_static(PROFILE_ID_HEADER),
		HeaderValue::from_str(&profile_id.to_string()).unwrap(),
	)
}
