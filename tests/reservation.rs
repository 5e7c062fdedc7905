use axum::http::StatusCode;

mod common;

use common::{TestEnv, auth_header};
use fieldbook::schemas::reservation::ReservationResponse;
use models::{Profile, Reservation, ReservationStatus, Venue};

async fn book_slots(env: &TestEnv, field_id: i32, hours: &[u32]) -> ReservationResponse {
	let response = env
		.app
		.post(&format!("/fields/{field_id}/bookings"))
		.json(&serde_json::json!({
			"date": "2024-06-01",
			"hours": hours,
			"visitorName": "Sara",
			"visitorPhone": "0100000000",
			"paymentProof": "receipts/1.png",
		}))
		.await;

	assert_eq!(response.status_code(), StatusCode::CREATED);

	response.json::<ReservationResponse>()
}

#[tokio::test(flavor = "multi_thread")]
async fn owner_confirms_a_pending_reservation() {
	let env = TestEnv::new().await;
	let created = book_slots(&env, env.field.id, &[19, 20]).await;
	let (name, value) = auth_header(env.owner.id);

	let response = env
		.app
		.post(&format!("/reservations/{}/confirm", created.id))
		.add_header(name, value)
		.await;

	assert_eq!(response.status_code(), StatusCode::OK);

	let body = response.json::<ReservationResponse>();

	assert_eq!(body.status, ReservationStatus::Confirmed);
	assert!(body.confirmed_at.is_some());
}

#[tokio::test(flavor = "multi_thread")]
async fn confirming_twice_is_an_invalid_transition() {
	let env = TestEnv::new().await;
	let created = book_slots(&env, env.field.id, &[19]).await;
	let (name, value) = auth_header(env.owner.id);

	let first = env
		.app
		.post(&format!("/reservations/{}/confirm", created.id))
		.add_header(name.clone(), value.clone())
		.await;

	assert_eq!(first.status_code(), StatusCode::OK);

	let second = env
		.app
		.post(&format!("/reservations/{}/confirm", created.id))
		.add_header(name, value)
		.await;

	assert_eq!(second.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test(flavor = "multi_thread")]
async fn non_owner_cannot_confirm() {
	let env = TestEnv::new().await;
	let created = book_slots(&env, env.field.id, &[19]).await;
	let (name, value) = auth_header(env.player.id);

	let response = env
		.app
		.post(&format!("/reservations/{}/confirm", created.id))
		.add_header(name, value)
		.await;

	assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test(flavor = "multi_thread")]
async fn confirming_an_unknown_reservation_is_not_found() {
	let env = TestEnv::new().await;
	let (name, value) = auth_header(env.owner.id);

	let response = env
		.app
		.post("/reservations/9999/confirm")
		.add_header(name, value)
		.await;

	assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test(flavor = "multi_thread")]
async fn cancelling_frees_the_slot_for_rebooking() {
	let env = TestEnv::new().await;
	let created = book_slots(&env, env.field.id, &[14]).await;
	let (name, value) = auth_header(env.owner.id);

	let cancel = env
		.app
		.post(&format!("/reservations/{}/cancel", created.id))
		.add_header(name, value)
		.await;

	assert_eq!(cancel.status_code(), StatusCode::OK);
	assert_eq!(
		cancel.json::<ReservationResponse>().status,
		ReservationStatus::Cancelled,
	);

	// The identical interval books again now that the original is cancelled
	let rebooked = book_slots(&env, env.field.id, &[14]).await;

	assert_eq!(rebooked.status, ReservationStatus::Pending);
}

#[tokio::test(flavor = "multi_thread")]
async fn cancelling_a_confirmed_reservation_is_allowed() {
	let env = TestEnv::new().await;
	let created = book_slots(&env, env.field.id, &[15]).await;
	let (name, value) = auth_header(env.owner.id);

	let confirm = env
		.app
		.post(&format!("/reservations/{}/confirm", created.id))
		.add_header(name.clone(), value.clone())
		.await;

	assert_eq!(confirm.status_code(), StatusCode::OK);

	let cancel = env
		.app
		.post(&format!("/reservations/{}/cancel", created.id))
		.add_header(name, value)
		.await;

	assert_eq!(cancel.status_code(), StatusCode::OK);
}

#[tokio::test(flavor = "multi_thread")]
async fn cancelled_is_terminal() {
	let env = TestEnv::new().await;
	let created = book_slots(&env, env.field.id, &[16]).await;
	let (name, value) = auth_header(env.owner.id);

	let cancel = env
		.app
		.post(&format!("/reservations/{}/cancel", created.id))
		.add_header(name.clone(), value.clone())
		.await;

	assert_eq!(cancel.status_code(), StatusCode::OK);

	let again = env
		.app
		.post(&format!("/reservations/{}/cancel", created.id))
		.add_header(name, value)
		.await;

	assert_eq!(again.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test(flavor = "multi_thread")]
async fn account_sees_its_own_reservations() {
	let env = TestEnv::new().await;
	let (name, value) = auth_header(env.player.id);

	let created = env
		.app
		.post(&format!("/fields/{}/bookings", env.field.id))
		.add_header(name.clone(), value.clone())
		.json(&serde_json::json!({
			"date": "2024-06-01",
			"hours": [17, 18],
			"paymentProof": "receipts/3.png",
		}))
		.await;

	assert_eq!(created.status_code(), StatusCode::CREATED);

	let response = env
		.app
		.get("/reservations")
		.add_header(name, value)
		.await;

	assert_eq!(response.status_code(), StatusCode::OK);

	let body = response.json::<Vec<ReservationResponse>>();

	assert_eq!(body.len(), 1);
	assert_eq!(body[0].field_id, env.field.id);
}

#[tokio::test(flavor = "multi_thread")]
async fn listing_reservations_without_session_is_unauthorized() {
	let env = TestEnv::new().await;

	let response = env.app.get("/reservations").await;

	assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_venue_cascades_to_its_reservations() {
	let env = TestEnv::new().await;
	let created = book_slots(&env, env.field.id, &[14]).await;
	let conn = env.pool.get().await.unwrap();

	Venue::delete_by_id(env.venue.id, &conn).await.unwrap();

	let err = Reservation::get_by_id(created.id, &conn).await.unwrap_err();

	assert!(matches!(err, ::common::Error::NotFound(_)));
}

#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_profile_removes_its_bookings() {
	let env = TestEnv::new().await;
	let (name, value) = auth_header(env.player.id);

	let created = env
		.app
		.post(&format!("/fields/{}/bookings", env.field.id))
		.add_header(name, value)
		.json(&serde_json::json!({
			"date": "2024-06-01",
			"hours": [15],
			"paymentProof": "receipts/4.png",
		}))
		.await;

	assert_eq!(created.status_code(), StatusCode::CREATED);

	let r_id = created.json::<ReservationResponse>().id;
	let conn = env.pool.get().await.unwrap();

	Profile::delete_by_id(env.player.id, &conn).await.unwrap();

	let err = Reservation::get_by_id(r_id, &conn).await.unwrap_err();

	assert!(matches!(err, ::common::Error::NotFound(_)));
}

// The end-to-end flow from the product side: a visitor books the 19:00
// hour, the owner confirms, and the slot stays taken for everyone else
#[tokio::test(flavor = "multi_thread")]
async fn visitor_booking_scenario() {
	let env = TestEnv::new().await;
	let field = env.create_field(250).await;

	let created = env
		.app
		.post(&format!("/fields/{}/bookings", field.id))
		.json(&serde_json::json!({
			"date": "2024-06-01",
			"hours": [19],
			"visitorName": "Sara",
			"visitorPhone": "0100000000",
			"paymentProof": "receipts/sara.png",
		}))
		.await;

	assert_eq!(created.status_code(), StatusCode::CREATED);

	let body = created.json::<ReservationResponse>();

	assert_eq!(body.status, ReservationStatus::Pending);
	// 1 slot x 250 + 10 service fee
	assert_eq!(body.total_price, 260);

	let (name, value) = auth_header(env.owner.id);
	let confirm = env
		.app
		.post(&format!("/reservations/{}/confirm", body.id))
		.add_header(name, value)
		.await;

	assert_eq!(confirm.status_code(), StatusCode::OK);
	assert_eq!(
		confirm.json::<ReservationResponse>().status,
		ReservationStatus::Confirmed,
	);

	let overlapping = env
		.app
		.post(&format!("/fields/{}/bookings", field.id))
		.json(&serde_json::json!({
			"date": "2024-06-01",
			"hours": [19],
			"visitorName": "Nour",
			"visitorPhone": "0100000001",
			"paymentProof": "receipts/nour.png",
		}))
		.await;

	assert_eq!(overlapping.status_code(), StatusCode::CONFLICT);

	let adjacent = env
		.app
		.post(&format!("/fields/{}/bookings", field.id))
		.json(&serde_json::json!({
			"date": "2024-06-01",
			"hours": [20],
			"visitorName": "Nour",
			"visitorPhone": "0100000001",
			"paymentProof": "receipts/nour.png",
		}))
		.await;

	assert_eq!(adjacent.status_code(), StatusCode::CREATED);
}
