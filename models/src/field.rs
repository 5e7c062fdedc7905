use chrono::NaiveDateTime;
use common::{DbConn, Error};
use diesel::pg::Pg;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::{field, venue};

/// A single bookable unit within a venue
///
/// Immutable as far as the scheduling core is concerned; price changes are
/// an admin concern
#[derive(
	Clone, Debug, Deserialize, Identifiable, Queryable, Selectable, Serialize,
)]
#[diesel(table_name = field)]
#[diesel(check_for_backend(Pg))]
#[serde(rename_all = "camelCase")]
pub struct Field {
	pub id:             i32,
	pub venue_id:       i32,
	pub name:           String,
	pub price_per_hour: i32,
	pub created_at:     NaiveDateTime,
}

impl Field {
	/// Get a [`Field`] by its id
	#[instrument(skip(conn))]
	pub async fn get_by_id(f_id: i32, conn: &DbConn) -> Result<Self, Error> {
		let field = conn
			.interact(move |conn| {
				use crate::schema::field::dsl::*;

				field
					.find(f_id)
					.select(Self::as_select())
					.first(conn)
					.optional()
			})
			.await??
			.ok_or_else(|| Error::NotFound(format!("field {f_id}")))?;

		Ok(field)
	}

	/// Get a [`Field`] along with the profile id of its venue's owner
	#[instrument(skip(conn))]
	pub async fn get_with_owner(
		f_id: i32,
		conn: &DbConn,
	) -> Result<(Self, i32), Error> {
		let result = conn
			.interact(move |conn| {
				field::table
					.inner_join(venue::table)
					.filter(field::id.eq(f_id))
					.select((Self::as_select(), venue::owner_id))
					.first(conn)
					.optional()
			})
			.await??
			.ok_or_else(|| Error::NotFound(format!("field {f_id}")))?;

		Ok(result)
	}

	/// Delete a [`Field`] given its id
	///
	/// Reservations on this field cascade in the same statement
	#[instrument(skip(conn))]
	pub async fn delete_by_id(f_id: i32, conn: &DbConn) -> Result<(), Error> {
		conn.interact(move |conn| {
			use crate::schema::field::dsl::*;

			diesel::delete(field.find(f_id)).execute(conn)
		})
		.await??;

		info!("deleted field with id {f_id}");

		Ok(())
	}
}

#[derive(Clone, Debug, Deserialize, Insertable, Serialize)]
#[diesel(table_name = field)]
#[diesel(check_for_backend(Pg))]
pub struct NewField {
	pub venue_id:       i32,
	pub name:           String,
	pub price_per_hour: i32,
}

impl NewField {
	/// Insert this [`NewField`]
	#[instrument(skip(conn))]
	pub async fn insert(self, conn: &DbConn) -> Result<Field, Error> {
		let field = conn
			.interact(|conn| {
				use self::field::dsl::*;

				diesel::insert_into(field)
					.values(self)
					.returning(Field::as_returning())
					.get_result(conn)
			})
			.await??;

		Ok(field)
	}
}
