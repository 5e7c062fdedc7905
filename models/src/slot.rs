//! The hourly slot grid and the overlap oracle
//!
//! A booking request arrives as a civil date plus a list of hour-of-day
//! values; this module validates the selection against the operating window
//! and resolves it into a single half-open `[start, end)` interval. The
//! civil date is always supplied by the caller, slot arithmetic never looks
//! at the ambient clock or the server timezone.

use chrono::{Days, NaiveDate, NaiveDateTime};
use common::BookingError;
use serde::{Deserialize, Serialize};

/// The daily window of bookable hours, as `[open, close)`
///
/// One window is shared by every field in a deployment
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct OperatingHours {
	pub open:  u32,
	pub close: u32,
}

impl Default for OperatingHours {
	fn default() -> Self { Self { open: 14, close: 24 } }
}

impl OperatingHours {
	#[must_use]
	pub fn contains(&self, hour: u32) -> bool {
		self.open <= hour && hour < self.close
	}
}

/// A half-open `[start, end)` interval of whole hours on a single day
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct TimeSlot {
	pub start: NaiveDateTime,
	pub end:   NaiveDateTime,
}

impl TimeSlot {
	/// Resolve a requested slot selection into a single interval
	///
	/// The hours must be non-empty, each within the operating window, and
	/// consecutive once sorted; anything else is rejected before a
	/// transaction is ever opened
	pub fn from_hours(
		date: NaiveDate,
		hours: &[u32],
		window: OperatingHours,
	) -> Result<Self, BookingError> {
		if hours.is_empty() {
			return Err(BookingError::EmptySlotSelection);
		}

		let mut sorted = hours.to_vec();
		sorted.sort_unstable();

		for &hour in &sorted {
			if !window.contains(hour) {
				return Err(BookingError::SlotOutOfHours {
					hour,
					open: window.open,
					close: window.close,
				});
			}
		}

		// Consecutive hours only, a gap would let a requester game the
		// price formula
		for pair in sorted.windows(2) {
			if pair[1] - pair[0] != 1 {
				return Err(BookingError::NonContiguousSlots);
			}
		}

		let first = sorted[0];
		let last = sorted[sorted.len() - 1];

		let start = date
			.and_hms_opt(first, 0, 0)
			.ok_or(BookingError::SlotOutOfHours {
				hour: first,
				open: window.open,
				close: window.close,
			})?;

		// A window closing at 24:00 rolls the end over into the next day
		let end = if last + 1 == 24 {
			date.checked_add_days(Days::new(1))
				.and_then(|d| d.and_hms_opt(0, 0, 0))
				.ok_or(BookingError::SlotOutOfHours {
					hour: last,
					open: window.open,
					close: window.close,
				})?
		} else {
			date.and_hms_opt(last + 1, 0, 0).ok_or(
				BookingError::SlotOutOfHours {
					hour: last + 1,
					open: window.open,
					close: window.close,
				},
			)?
		};

		Ok(Self { start, end })
	}

	/// The full civil day containing the given date, as an interval
	#[must_use]
	pub fn whole_day(date: NaiveDate) -> Self {
		let start = date.and_hms_opt(0, 0, 0).unwrap_or_default();
		let end = date
			.checked_add_days(Days::new(1))
			.and_then(|d| d.and_hms_opt(0, 0, 0))
			.unwrap_or(start);

		Self { start, end }
	}

	/// The number of whole-hour slots this interval spans
	#[must_use]
	pub fn slot_count(&self) -> i64 { (self.end - self.start).num_hours() }

	/// Standard half-open interval intersection test
	#[must_use]
	pub fn overlaps(&self, other: &Self) -> bool {
		self.start < other.end && self.end > other.start
	}
}

/// Decide admission for a candidate interval against the existing
/// non-cancelled intervals on the same field
///
/// Returns the first conflicting interval, if any; partial overlap,
/// containment in either direction and exact match all conflict. There is
/// no partial admission and no slot-level splitting of a rejected request.
#[must_use]
pub fn find_conflict(
	candidate: &TimeSlot,
	existing: &[TimeSlot],
) -> Option<TimeSlot> {
	existing.iter().find(|slot| candidate.overlaps(slot)).copied()
}
