use std::time::Duration;

use axum::Router;
use axum::routing::{get, post};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::AppState;
use crate::controllers::availability::get_field_availability;
use crate::controllers::booking::{create_booking, create_manual_booking};
use crate::controllers::healthcheck;
use crate::controllers::reservation::{
	cancel_reservation,
	confirm_reservation,
	get_own_reservations,
};

/// Get the app router
pub fn get_app_router(state: AppState) -> Router {
	Router::new()
		.route("/healthcheck", get(healthcheck))
		.nest("/fields", field_routes())
		.nest("/reservations", reservation_routes())
		.layer(TraceLayer::new_for_http())
		.layer(TimeoutLayer::new(Duration::from_secs(10)))
		.with_state(state)
}

/// Availability and booking routes, scoped to a field
fn field_routes() -> Router<AppState> {
	Router::new()
		.route("/{id}/availability", get(get_field_availability))
		.route("/{id}/bookings", post(create_booking))
		.route("/{id}/bookings/manual", post(create_manual_booking))
}

/// Reservation dashboard and lifecycle routes
fn reservation_routes() -> Router<AppState> {
	Router::new()
		.route("/", get(get_own_reservations))
		.route("/{id}/confirm", post(confirm_reservation))
		.route("/{id}/cancel", post(cancel_reservation))
}
