//! Price derivation for a booking
//!
//! Deliberately the simplest possible policy: a flat per-hour rate times
//! the number of slots, plus a fixed service fee on the self-service path.
//! No discounts, no proration, no currency conversion.

use common::BookingError;

/// Compute the total price for a reservation
///
/// The intermediate product is taken in `i64`; a total that does not fit
/// the stored price type is rejected instead of wrapping
pub fn total_price(
	slot_count: i64,
	price_per_hour: i32,
	service_fee: i32,
) -> Result<i32, BookingError> {
	slot_count
		.checked_mul(i64::from(price_per_hour))
		.and_then(|base| base.checked_add(i64::from(service_fee)))
		.and_then(|total| i32::try_from(total).ok())
		.ok_or(BookingError::PriceOverflow)
}
