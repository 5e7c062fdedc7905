use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::{DbPool, Error};
use models::Reservation;

use crate::Session;
use crate::schemas::reservation::ReservationResponse;

/// Get the caller's own reservations, most recent start first
#[instrument(skip(pool))]
pub async fn get_own_reservations(
	State(pool): State<DbPool>,
	session: Session,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	let reservations =
		Reservation::for_profile(session.profile_id, &conn).await?;

	let response: Vec<ReservationResponse> =
		reservations.into_iter().map(Into::into).collect();

	Ok((StatusCode::OK, Json(response)))
}

/// Confirm a pending reservation after verifying its payment proof
///
/// Only the owner of the field's venue may confirm
#[instrument(skip(pool))]
pub async fn confirm_reservation(
	State(pool): State<DbPool>,
	session: Session,
	Path(r_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	let reservation =
		Reservation::confirm(r_id, session.profile_id, &conn).await?;

	Ok((StatusCode::OK, Json(ReservationResponse::from(reservation))))
}

/// Cancel a pending or confirmed reservation, freeing its slots
///
/// Only the owner of the field's venue may cancel
#[instrument(skip(pool))]
pub async fn cancel_reservation(
	State(pool): State<DbPool>,
	session: Session,
	Path(r_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	let reservation =
		Reservation::cancel(r_id, session.profile_id, &conn).await?;

	Ok((StatusCode::OK, Json(ReservationResponse::from(reservation))))
}
