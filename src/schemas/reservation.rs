use chrono::NaiveDateTime;
use models::{Reservation, ReservationStatus};
use serde::{Deserialize, Serialize};

/// A reservation as returned to its requester or the venue owner
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResponse {
	pub id:            i32,
	pub field_id:      i32,
	pub status:        ReservationStatus,
	pub start_time:    NaiveDateTime,
	pub end_time:      NaiveDateTime,
	pub total_price:   i32,
	pub service_fee:   i32,
	pub created_at:    NaiveDateTime,
	pub confirmed_at:  Option<NaiveDateTime>,
}

impl From<Reservation> for ReservationResponse {
	fn from(value: Reservation) -> Self {
		Self {
			id:           value.id,
			field_id:     value.field_id,
			status:       value.status,
			start_time:   value.start_time,
			end_time:     value.end_time,
			total_price:  value.total_price,
			service_fee:  value.service_fee,
			created_at:   value.created_at,
			confirmed_at: value.confirmed_at,
		}
	}
}
