#[macro_use]
extern crate tracing;

use fieldbook::{AppState, Config, routes};
use tokio::net::TcpListener;
use tokio::signal;
use tokio::signal::unix::SignalKind;
use tracing::Level;

#[tokio::main]
async fn main() {
	tracing_subscriber::fmt()
		.compact()
		.with_max_level(Level::DEBUG)
		.init();

	let config = Config::from_env();
	let database_pool = config.create_database_pool();

	let state = AppState { config, database_pool };
	let app = routes::get_app_router(state);

	let listener = TcpListener::bind("0.0.0.0:80").await.unwrap();
	info!("listening on {}", listener.local_addr().unwrap());
	axum::serve(listener, app)
		.with_graceful_shutdown(shutdown_signal())
		.await
		.unwrap();
}

/// Resolves on ctrl-c or SIGTERM so in-flight bookings can finish
async fn shutdown_signal() {
	let mut sigterm = signal::unix::signal(SignalKind::terminate())
		.expect("could not install the SIGTERM handler");

	tokio::select! {
		result = signal::ctrl_c() => {
			result.expect("could not install the ctrl-c handler");
		},
		_ = sigterm.recv() => {},
	}

	info!("shutting down");
}
