use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::{DbPool, Error};
use models::{Field, NewReservation, Requester, TimeSlot};
use validator::Validate;

use crate::schemas::booking::{
	CreateBookingRequest,
	CreateManualBookingRequest,
};
use crate::schemas::reservation::ReservationResponse;
use crate::{Config, MaybeSession, Session};

/// Create a self-service booking for a player or visitor
///
/// The created reservation is pending until the venue owner verifies the
/// payment proof and confirms it
#[instrument(skip(pool))]
pub async fn create_booking(
	State(config): State<Config>,
	State(pool): State<DbPool>,
	MaybeSession(session): MaybeSession,
	Path(f_id): Path<i32>,
	Json(request): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, Error> {
	request.validate()?;

	let slot = TimeSlot::from_hours(
		request.date,
		&request.hours,
		config.operating_hours,
	)?;

	let requester = Requester::resolve(
		session.map(|s| s.profile_id),
		request.visitor_name,
		request.visitor_phone,
	)?;

	let conn = pool.get().await?;

	let field = Field::get_by_id(f_id, &conn).await?;

	let new_reservation = NewReservation::self_service(
		&field,
		slot,
		requester,
		request.payment_proof,
		config.service_fee,
	)?;

	let reservation = new_reservation
		.insert_if_available(config.retry_policy, &conn)
		.await?;

	Ok((StatusCode::CREATED, Json(ReservationResponse::from(reservation))))
}

/// Create a manual booking on behalf of the venue owner
///
/// The owner's presence substitutes for payment verification, so the
/// reservation is confirmed immediately and carries no service fee
#[instrument(skip(pool))]
pub async fn create_manual_booking(
	State(config): State<Config>,
	State(pool): State<DbPool>,
	session: Session,
	Path(f_id): Path<i32>,
	Json(request): Json<CreateManualBookingRequest>,
) -> Result<impl IntoResponse, Error> {
	request.validate()?;

	let slot = TimeSlot::from_hours(
		request.date,
		&request.hours,
		config.operating_hours,
	)?;

	let conn = pool.get().await?;

	let (field, owner_id) = Field::get_with_owner(f_id, &conn).await?;

	if owner_id != session.profile_id {
		return Err(Error::Forbidden);
	}

	let new_reservation = NewReservation::manual(
		&field,
		slot,
		request.customer_name,
		request.customer_phone,
	)?;

	let reservation = new_reservation
		.insert_if_available(config.retry_policy, &conn)
		.await?;

	Ok((StatusCode::CREATED, Json(ReservationResponse::from(reservation))))
}
