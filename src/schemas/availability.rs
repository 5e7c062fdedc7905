use chrono::{NaiveDate, NaiveDateTime};
use models::TimeSlot;
use serde::{Deserialize, Serialize};

/// Which civil day to render the slot grid for
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityFilter {
	pub date: NaiveDate,
}

/// A booked interval, stripped of price and requester identity
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookedSlotResponse {
	pub start: NaiveDateTime,
	pub end:   NaiveDateTime,
}

impl From<TimeSlot> for BookedSlotResponse {
	fn from(value: TimeSlot) -> Self {
		Self { start: value.start, end: value.end }
	}
}
