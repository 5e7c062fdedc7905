//! Library-wide error types and [`From`] impls

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use diesel::result::DatabaseErrorKind;
use thiserror::Error;

/// Top level application error, can be converted into a [`Response`]
#[derive(Debug, Error)]
pub enum Error {
	/// Any error related to creating or transitioning a reservation
	#[error(transparent)]
	BookingError(#[from] BookingError),
	/// Request/operation forbidden
	#[error("forbidden")]
	Forbidden,
	/// Opaque internal server error
	#[error("internal server error")]
	InternalServerError,
	/// Resource not found
	#[error("not found - {0}")]
	NotFound(String),
	/// Missing or invalid session
	#[error("unauthorized")]
	Unauthorized,
	/// Resource could not be validated
	#[error("{0}")]
	ValidationError(String),
}

/// Any error related to creating or transitioning a reservation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BookingError {
	/// No slots were selected at all
	#[error("no slots selected")]
	EmptySlotSelection,
	/// A selected hour falls outside the operating window
	#[error("hour {hour} is outside the operating window [{open}, {close})")]
	SlotOutOfHours { hour: u32, open: u32, close: u32 },
	/// The selected hours are not consecutive
	#[error("selected hours must be consecutive")]
	NonContiguousSlots,
	/// A self-service booking was made without a payment proof reference
	#[error("a payment proof reference is required")]
	MissingPaymentProof,
	/// An anonymous booking was made without both a name and a phone number
	#[error("visitor bookings require both a name and a phone number")]
	MissingVisitorInfo,
	/// The computed total does not fit the stored price type
	#[error("the computed price is out of range")]
	PriceOverflow,
	/// The requested interval overlaps an existing reservation
	#[error("the requested slots are already booked")]
	SlotConflict,
	/// The requested status change is not allowed from the current status
	#[error("cannot {action} a {status} reservation")]
	InvalidTransition { action: &'static str, status: String },
	/// The booking transaction kept losing serialization races
	#[error("the booking could not be completed, try again")]
	Contention,
}

/// Convert an error into a [`Response`]
impl IntoResponse for Error {
	fn into_response(self) -> Response {
		error!("{self:?}");

		let status = match self {
			Self::BookingError(BookingError::SlotConflict) => {
				StatusCode::CONFLICT
			},
			Self::BookingError(BookingError::Contention) => {
				StatusCode::SERVICE_UNAVAILABLE
			},
			Self::BookingError(_) => StatusCode::BAD_REQUEST,
			Self::Forbidden => StatusCode::FORBIDDEN,
			Self::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
			Self::NotFound(_) => StatusCode::NOT_FOUND,
			Self::Unauthorized => StatusCode::UNAUTHORIZED,
			Self::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
		};

		let data = serde_json::json!({ "message": self.to_string() });

		(status, axum::Json(data)).into_response()
	}
}

/// A list of possible internal errors
///
/// API end users should never see these details
#[derive(Debug, Error)]
pub enum InternalServerError {
	/// Error executing some database operation
	#[error("database error -- {0:?}")]
	DatabaseError(diesel::result::Error),
	/// Error interacting with a database connection
	#[error("database interaction error -- {0:?}")]
	DatabaseInteractionError(deadpool_diesel::InteractError),
	/// Error acquiring database pool connection
	#[error("database pool error -- {0:?}")]
	PoolError(deadpool_diesel::PoolError),
}

// Map internal server errors to application errors
impl From<InternalServerError> for Error {
	fn from(value: InternalServerError) -> Self {
		error!("internal server error -- {value}");

		Self::InternalServerError
	}
}

/// Map validation errors to application errors
impl From<validator::ValidationErrors> for Error {
	fn from(err: validator::ValidationErrors) -> Self {
		let errs = err.field_errors();
		let repr = errs
			.values()
			.map(|v| {
				v.iter()
					.map(ToString::to_string)
					.collect::<Vec<String>>()
					.join("\n")
			})
			.collect::<Vec<String>>()
			.join("\n");

		Self::ValidationError(repr)
	}
}

/// Map database interaction errors to application errors
impl From<deadpool_diesel::InteractError> for Error {
	fn from(value: deadpool_diesel::InteractError) -> Self {
		InternalServerError::DatabaseInteractionError(value).into()
	}
}

/// Map database result errors to application errors
impl From<diesel::result::Error> for Error {
	fn from(err: diesel::result::Error) -> Self {
		match &err {
			// No rows returned by a query that expected at least one
			diesel::result::Error::NotFound => {
				Self::NotFound("no context provided".to_string())
			},
			// Check constraint violations carry a usable message
			diesel::result::Error::DatabaseError(
				DatabaseErrorKind::CheckViolation,
				info,
			) => Self::ValidationError(info.message().to_string()),
			_ => InternalServerError::DatabaseError(err).into(),
		}
	}
}

impl From<deadpool_diesel::PoolError> for Error {
	fn from(value: deadpool_diesel::PoolError) -> Self {
		InternalServerError::PoolError(value).into()
	}
}
