//! Database model definitions and the scheduling core

#[macro_use]
extern crate tracing;

mod field;
mod pricing;
mod profile;
mod reservation;
mod slot;
mod venue;

pub mod schema;

pub use field::*;
pub use pricing::*;
pub use profile::*;
pub use reservation::*;
pub use slot::*;
pub use venue::*;
