//! Caller identity extraction
//!
//! Authentication itself is a collaborator concern: an upstream gateway
//! authenticates the caller and forwards the profile id in the
//! `x-profile-id` header. This module only lifts that header into typed
//! extractors; everything beyond it (login, tokens, roles) lives outside
//! this service.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use common::Error;

use crate::AppState;

/// Header set by the authenticating gateway
pub const PROFILE_ID_HEADER: &str = "x-profile-id";

/// The authenticated caller of a request
///
/// Rejects with [`Error::Unauthorized`] if the gateway forwarded no
/// identity
#[derive(Clone, Copy, Debug)]
pub struct Session {
	pub profile_id: i32,
}

/// An optionally authenticated caller
///
/// Self-service booking is open to visitors, so its controller asks for
/// this instead of a [`Session`]
#[derive(Clone, Copy, Debug)]
pub struct MaybeSession(pub Option<Session>);

fn profile_id_from_parts(parts: &Parts) -> Result<Option<i32>, Error> {
	let Some(value) = parts.headers.get(PROFILE_ID_HEADER) else {
		return Ok(None);
	};

	let id = value
		.to_str()
		.ok()
		.and_then(|v| v.parse::<i32>().ok())
		.ok_or(Error::Unauthorized)?;

	Ok(Some(id))
}

impl FromRequestParts<AppState> for Session {
	type Rejection = Error;

	async fn from_request_parts(
		parts: &mut Parts,
		_state: &AppState,
	) -> Result<Self, Self::Rejection> {
		match profile_id_from_parts(parts)? {
			Some(profile_id) => Ok(Self { profile_id }),
			None => Err(Error::Unauthorized),
		}
	}
}

impl FromRequestParts<AppState> for MaybeSession {
	type Rejection = Error;

	async fn from_request_parts(
		parts: &mut Parts,
		_state: &AppState,
	) -> Result<Self, Self::Rejection> {
		let session = profile_id_from_parts(parts)?
			.map(|profile_id| Session { profile_id });

		Ok(Self(session))
	}
}
