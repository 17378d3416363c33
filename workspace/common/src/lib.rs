//! Transport types shared between the domain crate and the HTTP layer.
//!
//! These are the shapes the API serializes. Keeping them here lets the
//! `booking` crate return API-ready values without depending on axum.

mod billing;
mod slots;
mod usage;

pub use billing::{Bill, PriceQuote, Tariff};
pub use slots::{SlotListing, SlotView};
pub use usage::UsageSummary;
