use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::{DbPool, Error};
use models::{Field, Reservation, TimeSlot};

use crate::schemas::availability::{AvailabilityFilter, BookedSlotResponse};

/// Render the booked intervals on a field for one civil day
///
/// Open to unauthenticated callers; the response carries nothing beyond
/// what is needed to mark a slot as taken. This read is advisory, the
/// booking transaction re-checks against committed state on its own.
#[instrument(skip(pool))]
pub async fn get_field_availability(
	State(pool): State<DbPool>,
	Path(f_id): Path<i32>,
	Query(filter): Query<AvailabilityFilter>,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	// Unknown fields are a 404, not an empty grid
	Field::get_by_id(f_id, &conn).await?;

	let range = TimeSlot::whole_day(filter.date);
	let slots = Reservation::booked_slots(f_id, range, &conn).await?;

	let response: Vec<BookedSlotResponse> =
		slots.into_iter().map(Into::into).collect();

	Ok((StatusCode::OK, Json(response)))
}
