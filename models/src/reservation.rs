use std::fmt;

use chrono::NaiveDateTime;
use common::{BookingError, DbConn, Error};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};

use crate::schema::{field, reservation, venue};
use crate::slot::{TimeSlot, find_conflict};
use crate::{Field, pricing};

/// Name of the exclusion constraint backing the non-overlap invariant
const NO_OVERLAP_CONSTRAINT: &str = "reservation_no_overlap";

/// The lifecycle status of a reservation
///
/// `Pending` is the initial state of self-service bookings; manual bookings
/// by the owner are `Confirmed` immediately. `Cancelled` is terminal and
/// frees the interval for new bookings at once.
#[derive(
	Clone, Copy, DbEnum, Debug, Default, Deserialize, PartialEq, Eq, Serialize,
)]
#[ExistingTypePath = "crate::schema::sql_types::ReservationStatus"]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
	#[default]
	Pending,
	Confirmed,
	Cancelled,
}

impl ReservationStatus {
	/// Only pending reservations can be confirmed
	#[must_use]
	pub fn can_confirm(self) -> bool { matches!(self, Self::Pending) }

	/// Pending and confirmed reservations can be cancelled
	#[must_use]
	pub fn can_cancel(self) -> bool { !matches!(self, Self::Cancelled) }
}

impl fmt::Display for ReservationStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let repr = match self {
			Self::Pending => "pending",
			Self::Confirmed => "confirmed",
			Self::Cancelled => "cancelled",
		};

		write!(f, "{repr}")
	}
}

/// Who a reservation is for: exactly one of an authenticated account or a
/// named visitor
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub enum Requester {
	Account(i32),
	Visitor { name: String, phone: Option<String> },
}

impl Requester {
	/// Resolve the requester of a self-service booking
	///
	/// A session wins over any visitor fields; without a session both a
	/// name and a phone number are required
	pub fn resolve(
		account: Option<i32>,
		name: Option<String>,
		phone: Option<String>,
	) -> Result<Self, BookingError> {
		if let Some(id) = account {
			return Ok(Self::Account(id));
		}

		match (name, phone) {
			(Some(name), Some(phone))
				if !name.trim().is_empty() && !phone.trim().is_empty() =>
			{
				Ok(Self::Visitor { name, phone: Some(phone) })
			},
			_ => Err(BookingError::MissingVisitorInfo),
		}
	}
}

/// How often the booking transaction may be re-run after losing a
/// serialization race
///
/// A detected overlap is never retried; only aborts where no conflicting
/// row was observed are, since no partial state was committed
#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
	pub max_retries: u32,
}

impl Default for RetryPolicy {
	fn default() -> Self { Self { max_retries: 3 } }
}

#[derive(
	Clone, Debug, Deserialize, Identifiable, Queryable, Selectable, Serialize,
)]
#[diesel(table_name = reservation)]
#[diesel(check_for_backend(Pg))]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
	pub id:            i32,
	pub field_id:      i32,
	pub profile_id:    Option<i32>,
	pub visitor_name:  Option<String>,
	pub visitor_phone: Option<String>,
	pub start_time:    NaiveDateTime,
	pub end_time:      NaiveDateTime,
	pub status:        ReservationStatus,
	pub total_price:   i32,
	pub service_fee:   i32,
	pub payment_proof: Option<String>,
	pub created_at:    NaiveDateTime,
	pub updated_at:    NaiveDateTime,
	pub confirmed_at:  Option<NaiveDateTime>,
}

impl Reservation {
	/// Get a [`Reservation`] by its id
	#[instrument(skip(conn))]
	pub async fn get_by_id(r_id: i32, conn: &DbConn) -> Result<Self, Error> {
		let reservation = conn
			.interact(move |conn| {
				use crate::schema::reservation::dsl::*;

				reservation
					.find(r_id)
					.select(Self::as_select())
					.first(conn)
					.optional()
			})
			.await??
			.ok_or_else(|| Error::NotFound(format!("reservation {r_id}")))?;

		Ok(reservation)
	}

	/// Get the booked intervals on a field that intersect the given range,
	/// ordered by start time
	///
	/// This is the read behind the slot grid; it exposes no prices and no
	/// requester identity. It is advisory only, admission happens inside
	/// [`NewReservation::insert_if_available`].
	#[instrument(skip(conn))]
	pub async fn booked_slots(
		f_id: i32,
		range: TimeSlot,
		conn: &DbConn,
	) -> Result<Vec<TimeSlot>, Error> {
		let slots: Vec<(NaiveDateTime, NaiveDateTime)> = conn
			.interact(move |conn| {
				reservation::table
					.filter(reservation::field_id.eq(f_id))
					.filter(
						reservation::status.ne(ReservationStatus::Cancelled),
					)
					.filter(reservation::start_time.lt(range.end))
					.filter(reservation::end_time.gt(range.start))
					.order(reservation::start_time.asc())
					.select((reservation::start_time, reservation::end_time))
					.load(conn)
			})
			.await??;

		Ok(slots
			.into_iter()
			.map(|(start, end)| TimeSlot { start, end })
			.collect())
	}

	/// Get all the reservations made by a profile, most recent start first
	#[instrument(skip(conn))]
	pub async fn for_profile(
		p_id: i32,
		conn: &DbConn,
	) -> Result<Vec<Self>, Error> {
		let reservations = conn
			.interact(move |conn| {
				use crate::schema::reservation::dsl::*;

				reservation
					.filter(profile_id.eq(p_id))
					.order(start_time.desc())
					.select(Self::as_select())
					.load(conn)
			})
			.await??;

		Ok(reservations)
	}

	/// Confirm a pending reservation on behalf of the venue owner
	#[instrument(skip(conn))]
	pub async fn confirm(
		r_id: i32,
		owner_id: i32,
		conn: &DbConn,
	) -> Result<Self, Error> {
		let reservation = conn
			.interact(move |conn| {
				conn.transaction::<_, Error, _>(|conn| {
					let (current, venue_owner) =
						Self::get_with_owner(r_id, conn)?;

					if venue_owner != owner_id {
						return Err(Error::Forbidden);
					}

					if !current.status.can_confirm() {
						return Err(BookingError::InvalidTransition {
							action: "confirm",
							status: current.status.to_string(),
						}
						.into());
					}

					let updated = diesel::update(
						reservation::table.find(r_id),
					)
					.set((
						reservation::status
							.eq(ReservationStatus::Confirmed),
						reservation::confirmed_at
							.eq(diesel::dsl::now.nullable()),
					))
					.returning(Self::as_returning())
					.get_result(conn)?;

					Ok(updated)
				})
			})
			.await??;

		info!("confirmed reservation {r_id}");

		Ok(reservation)
	}

	/// Cancel a reservation on behalf of the venue owner
	///
	/// Allowed from both `Pending` and `Confirmed`; the interval is freed
	/// for new bookings immediately, there is no grace window
	#[instrument(skip(conn))]
	pub async fn cancel(
		r_id: i32,
		owner_id: i32,
		conn: &DbConn,
	) -> Result<Self, Error> {
		let reservation = conn
			.interact(move |conn| {
				conn.transaction::<_, Error, _>(|conn| {
					let (current, venue_owner) =
						Self::get_with_owner(r_id, conn)?;

					if venue_owner != owner_id {
						return Err(Error::Forbidden);
					}

					if !current.status.can_cancel() {
						return Err(BookingError::InvalidTransition {
							action: "cancel",
							status: current.status.to_string(),
						}
						.into());
					}

					let updated = diesel::update(
						reservation::table.find(r_id),
					)
					.set(
						reservation::status
							.eq(ReservationStatus::Cancelled),
					)
					.returning(Self::as_returning())
					.get_result(conn)?;

					Ok(updated)
				})
			})
			.await??;

		info!("cancelled reservation {r_id}");

		Ok(reservation)
	}

	/// Fetch a reservation and its venue owner inside a transaction
	fn get_with_owner(
		r_id: i32,
		conn: &mut PgConnection,
	) -> Result<(Self, i32), Error> {
		reservation::table
			.inner_join(field::table.inner_join(venue::table))
			.filter(reservation::id.eq(r_id))
			.select((Self::as_select(), venue::owner_id))
			.first(conn)
			.optional()?
			.ok_or_else(|| Error::NotFound(format!("reservation {r_id}")))
	}
}

/// What the retry loop should do after one transaction attempt
enum Attempt {
	Done(Reservation),
	Retry,
	Fail(Error),
}

/// Outcome of a single booking transaction attempt
enum TxError {
	/// The candidate interval overlaps a committed reservation
	Conflict,
	/// The transaction failed for storage reasons
	Db(diesel::result::Error),
}

impl From<diesel::result::Error> for TxError {
	fn from(err: diesel::result::Error) -> Self {
		match &err {
			// The exclusion constraint is the storage-level backstop for
			// the overlap check
			diesel::result::Error::DatabaseError(_, info)
				if info.constraint_name() == Some(NO_OVERLAP_CONSTRAINT) =>
			{
				Self::Conflict
			},
			_ => Self::Db(err),
		}
	}
}

fn is_serialization_failure(err: &diesel::result::Error) -> bool {
	matches!(
		err,
		diesel::result::Error::DatabaseError(
			DatabaseErrorKind::SerializationFailure,
			_,
		)
	)
}

#[derive(Clone, Debug, Deserialize, Insertable, Serialize)]
#[diesel(table_name = reservation)]
#[diesel(check_for_backend(Pg))]
pub struct NewReservation {
	pub field_id:      i32,
	pub profile_id:    Option<i32>,
	pub visitor_name:  Option<String>,
	pub visitor_phone: Option<String>,
	pub start_time:    NaiveDateTime,
	pub end_time:      NaiveDateTime,
	pub status:        ReservationStatus,
	pub total_price:   i32,
	pub service_fee:   i32,
	pub payment_proof: Option<String>,
}

impl NewReservation {
	/// Build a self-service booking: pending until the owner confirms,
	/// priced with the service fee, payment proof required
	pub fn self_service(
		field: &Field,
		slot: TimeSlot,
		requester: Requester,
		payment_proof: Option<String>,
		service_fee: i32,
	) -> Result<Self, BookingError> {
		let payment_proof = match payment_proof {
			Some(p) if !p.trim().is_empty() => p,
			_ => return Err(BookingError::MissingPaymentProof),
		};

		let (profile_id, visitor_name, visitor_phone) = match requester {
			Requester::Account(id) => (Some(id), None, None),
			Requester::Visitor { name, phone } => (None, Some(name), phone),
		};

		Ok(Self {
			field_id: field.id,
			profile_id,
			visitor_name,
			visitor_phone,
			start_time: slot.start,
			end_time: slot.end,
			status: ReservationStatus::Pending,
			total_price: pricing::total_price(
				slot.slot_count(),
				field.price_per_hour,
				service_fee,
			)?,
			service_fee,
			payment_proof: Some(payment_proof),
		})
	}

	/// Build a manual booking entered by the venue owner: confirmed
	/// immediately, no service fee, no payment proof
	pub fn manual(
		field: &Field,
		slot: TimeSlot,
		customer_name: Option<String>,
		customer_phone: Option<String>,
	) -> Result<Self, BookingError> {
		let name = customer_name
			.filter(|n| !n.trim().is_empty())
			.unwrap_or_else(|| "walk-in".to_string());

		Ok(Self {
			field_id: field.id,
			profile_id: None,
			visitor_name: Some(name),
			visitor_phone: customer_phone.filter(|p| !p.trim().is_empty()),
			start_time: slot.start,
			end_time: slot.end,
			status: ReservationStatus::Confirmed,
			total_price: pricing::total_price(
				slot.slot_count(),
				field.price_per_hour,
				0,
			)?,
			service_fee: 0,
			payment_proof: None,
		})
	}

	/// Insert this [`NewReservation`] if its interval is still free
	///
	/// The check-then-insert sequence runs as one serializable transaction:
	/// re-read the committed reservations overlapping the candidate
	/// interval, decide admission, insert. Two racing requests for
	/// overlapping intervals can therefore never both commit; the loser
	/// sees [`BookingError::SlotConflict`]. Serialization aborts where no
	/// conflicting row was observed are retried up to the policy limit.
	#[instrument(skip(conn))]
	pub async fn insert_if_available(
		self,
		policy: RetryPolicy,
		conn: &DbConn,
	) -> Result<Reservation, Error> {
		let mut attempt = 0;

		loop {
			let candidate = self.clone();
			let result = conn
				.interact(move |conn| candidate.try_insert(conn))
				.await?;

			match self.classify(result, attempt, policy) {
				Attempt::Done(created) => {
					info!(
						"created reservation {} on field {} [{} - {}]",
						created.id,
						created.field_id,
						created.start_time,
						created.end_time,
					);

					return Ok(created);
				},
				Attempt::Retry => {
					attempt += 1;

					debug!(
						"booking on field {} lost a serialization race, \
						 retrying ({attempt}/{})",
						self.field_id, policy.max_retries,
					);
				},
				Attempt::Fail(err) => return Err(err),
			}
		}
	}

	/// Decide what the retry loop does with the outcome of one attempt
	///
	/// A detected overlap is final. A serialization abort is retried while
	/// the budget allows and reported as [`BookingError::Contention`] once
	/// it is spent, so callers can tell "back off and retry" apart from
	/// "pick another slot".
	fn classify(
		&self,
		result: Result<Reservation, TxError>,
		attempt: u32,
		policy: RetryPolicy,
	) -> Attempt {
		match result {
			Ok(created) => Attempt::Done(created),
			Err(TxError::Conflict) => {
				Attempt::Fail(BookingError::SlotConflict.into())
			},
			Err(TxError::Db(err)) if is_serialization_failure(&err) => {
				if attempt < policy.max_retries {
					Attempt::Retry
				} else {
					warn!(
						"booking on field {} gave up after {} serialization \
						 aborts",
						self.field_id,
						attempt + 1,
					);

					Attempt::Fail(BookingError::Contention.into())
				}
			},
			Err(TxError::Db(err)) => Attempt::Fail(err.into()),
		}
	}

	/// A single serializable check-then-insert attempt
	fn try_insert(
		self,
		conn: &mut PgConnection,
	) -> Result<Reservation, TxError> {
		conn.build_transaction().serializable().run(|conn| {
			let existing: Vec<(NaiveDateTime, NaiveDateTime)> =
				reservation::table
					.filter(reservation::field_id.eq(self.field_id))
					.filter(
						reservation::status
							.ne(ReservationStatus::Cancelled),
					)
					.filter(reservation::start_time.lt(self.end_time))
					.filter(reservation::end_time.gt(self.start_time))
					.select((
						reservation::start_time,
						reservation::end_time,
					))
					.load(conn)
					.map_err(TxError::from)?;

			let existing: Vec<TimeSlot> = existing
				.into_iter()
				.map(|(start, end)| TimeSlot { start, end })
				.collect();

			let candidate =
				TimeSlot { start: self.start_time, end: self.end_time };

			if find_conflict(&candidate, &existing).is_some() {
				return Err(TxError::Conflict);
			}

			diesel::insert_into(reservation::table)
				.values(self)
				.returning(Reservation::as_returning())
				.get_result(conn)
				.map_err(TxError::from)
		})
	}
}
