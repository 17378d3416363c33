//! Parking domain operations on top of the SeaORM entities.
//!
//! The interesting part is [`guard`]: claiming a slot is a single
//! conditional update and the database decides who wins a race. The other
//! modules are thin queries around pricing, payments, bills and listings.

pub mod bill;
pub mod dashboard;
pub mod error;
pub mod guard;
pub mod payments;
pub mod pricing;
pub mod slots;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{BookingError, Result};
pub use guard::{BookingOutcome, BookingRequest, RenumberPolicy, SlotBookingGuard};
