use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator_derive::Validate;

/// A self-service booking request from a player or visitor
#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
	pub date:  NaiveDate,
	/// Hour-of-day values, validated by the slot model
	pub hours: Vec<u32>,

	/// Visitor identity, only used when no session is present
	#[validate(length(max = 100))]
	pub visitor_name:  Option<String>,
	#[validate(length(max = 20))]
	pub visitor_phone: Option<String>,

	/// Opaque reference to payment-proof evidence
	#[validate(length(max = 2048))]
	pub payment_proof: Option<String>,
}

/// A manual booking entered by the venue owner
#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateManualBookingRequest {
	pub date:  NaiveDate,
	pub hours: Vec<u32>,

	#[validate(length(max = 100))]
	pub customer_name:  Option<String>,
	#[validate(length(max = 20))]
	pub customer_phone: Option<String>,
}
