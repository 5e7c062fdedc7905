use chrono::NaiveDateTime;
use common::{DbConn, Error};
use diesel::pg::Pg;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::profile;

/// An authenticated account
///
/// Owners and players are both profiles; registration and login live in the
/// surrounding auth layer, this core only reads them
#[derive(
	Clone, Debug, Deserialize, Identifiable, Queryable, Selectable, Serialize,
)]
#[diesel(table_name = profile)]
#[diesel(check_for_backend(Pg))]
#[serde(rename_all = "camelCase")]
pub struct Profile {
	pub id:         i32,
	pub username:   String,
	pub created_at: NaiveDateTime,
}

impl Profile {
	/// Get a [`Profile`] by its id
	#[instrument(skip(conn))]
	pub async fn get_by_id(p_id: i32, conn: &DbConn) -> Result<Self, Error> {
		let profile = conn
			.interact(move |conn| {
				use crate::schema::profile::dsl::*;

				profile
					.find(p_id)
					.select(Self::as_select())
					.first(conn)
					.optional()
			})
			.await??
			.ok_or_else(|| Error::NotFound(format!("profile {p_id}")))?;

		Ok(profile)
	}

	/// Delete a [`Profile`] given its id
	///
	/// Reservations made by this profile are removed in the same statement
	/// through the `ON DELETE CASCADE` foreign key, so no phantom bookings
	/// keep blocking freed slots
	#[instrument(skip(conn))]
	pub async fn delete_by_id(p_id: i32, conn: &DbConn) -> Result<(), Error> {
		conn.interact(move |conn| {
			use crate::schema::profile::dsl::*;

			diesel::delete(profile.find(p_id)).execute(conn)
		})
		.await??;

		info!("deleted profile with id {p_id}");

		Ok(())
	}
}

#[derive(Clone, Debug, Deserialize, Insertable, Serialize)]
#[diesel(table_name = profile)]
#[diesel(check_for_backend(Pg))]
pub struct NewProfile {
	pub username: String,
}

impl NewProfile {
	/// Insert this [`NewProfile`]
	#[instrument(skip(conn))]
	pub async fn insert(self, conn: &DbConn) -> Result<Profile, Error> {
		let profile = conn
			.interact(|conn| {
				use self::profile::dsl::*;

				diesel::insert_into(profile)
					.values(self)
					.returning(Profile::as_returning())
					.get_result(conn)
			})
			.await??;

		Ok(profile)
	}
}
