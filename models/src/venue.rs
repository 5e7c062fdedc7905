use chrono::NaiveDateTime;
use common::{DbConn, Error};
use diesel::pg::Pg;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::venue;

/// A venue groups one or more bookable [`Field`](crate::Field)s under a
/// single owning profile
#[derive(
	Clone, Debug, Deserialize, Identifiable, Queryable, Selectable, Serialize,
)]
#[diesel(table_name = venue)]
#[diesel(check_for_backend(Pg))]
#[serde(rename_all = "camelCase")]
pub struct Venue {
	pub id:         i32,
	pub name:       String,
	pub owner_id:   i32,
	pub created_at: NaiveDateTime,
}

impl Venue {
	/// Get a [`Venue`] by its id
	#[instrument(skip(conn))]
	pub async fn get_by_id(v_id: i32, conn: &DbConn) -> Result<Self, Error> {
		let venue = conn
			.interact(move |conn| {
				use crate::schema::venue::dsl::*;

				venue
					.find(v_id)
					.select(Self::as_select())
					.first(conn)
					.optional()
			})
			.await??
			.ok_or_else(|| Error::NotFound(format!("venue {v_id}")))?;

		Ok(venue)
	}

	/// Delete a [`Venue`] given its id
	///
	/// Its fields and their reservations cascade in the same statement
	#[instrument(skip(conn))]
	pub async fn delete_by_id(v_id: i32, conn: &DbConn) -> Result<(), Error> {
		conn.interact(move |conn| {
			use crate::schema::venue::dsl::*;

			diesel::delete(venue.find(v_id)).execute(conn)
		})
		.await??;

		info!("deleted venue with id {v_id}");

		Ok(())
	}
}

#[derive(Clone, Debug, Deserialize, Insertable, Serialize)]
#[diesel(table_name = venue)]
#[diesel(check_for_backend(Pg))]
pub struct NewVenue {
	pub name:     String,
	pub owner_id: i32,
}

impl NewVenue {
	/// Insert this [`NewVenue`]
	#[instrument(skip(conn))]
	pub async fn insert(self, conn: &DbConn) -> Result<Venue, Error> {
		let venue = conn
			.interact(|conn| {
				use self::venue::dsl::*;

				diesel::insert_into(venue)
					.values(self)
					.returning(Venue::as_returning())
					.get_result(conn)
			})
			.await??;

		Ok(venue)
	}
}
