use deadpool_diesel::postgres::{Manager, Pool};
use models::{OperatingHours, RetryPolicy};

/// Deployment configuration, read from the environment once at startup
#[derive(Clone, Debug)]
pub struct Config {
	pub database_url: String,

	/// Daily window of bookable hours shared by every field
	pub operating_hours: OperatingHours,
	/// Fixed service fee added to self-service bookings
	pub service_fee:     i32,
	/// Retry budget for the booking transaction
	pub retry_policy:    RetryPolicy,
}

impl Config {
	fn get_env_var(var: &str) -> String {
		std::env::var(var).unwrap_or_else(|_| panic!("{var} must be set"))
	}

	fn get_env_var_or(var: &str, default: u32) -> u32 {
		std::env::var(var).map_or(default, |v| {
			v.parse::<u32>()
				.unwrap_or_else(|_| panic!("{var} must be an integer"))
		})
	}

	/// Create a new [`Config`] from environment variables
	///
	/// # Panics
	/// Panics if `DATABASE_URL` is missing or an override is malformed
	#[must_use]
	pub fn from_env() -> Self {
		let database_url = Self::get_env_var("DATABASE_URL");

		let operating_hours = OperatingHours {
			open:  Self::get_env_var_or("BOOKING_OPEN_HOUR", 14),
			close: Self::get_env_var_or("BOOKING_CLOSE_HOUR", 24),
		};

		#[allow(clippy::cast_possible_wrap)]
		let service_fee = Self::get_env_var_or("BOOKING_SERVICE_FEE", 10) as i32;

		let retry_policy = RetryPolicy {
			max_retries: Self::get_env_var_or("BOOKING_RETRIES", 3),
		};

		Self { database_url, operating_hours, service_fee, retry_policy }
	}

	/// Create a database pool for the given config
	///
	/// # Panics
	/// Panics if creating the pool fails
	#[must_use]
	pub fn create_database_pool(&self) -> Pool {
		let manager = Manager::new(
			self.database_url.to_string(),
			deadpool_diesel::Runtime::Tokio1,
		);

		Pool::builder(manager).build().unwrap()
	}
}
