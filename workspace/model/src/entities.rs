//! Root of all SeaORM entity modules for the parking application.
//!
//! Table names and enum string values match what the migrations in the
//! `migration` crate create.

pub mod admin;
pub mod feature;
pub mod guideline;
pub mod notification;
pub mod parking_slot;
pub mod payment;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::admin::Entity as Admin;
    pub use super::feature::Entity as Feature;
    pub use super::guideline::Entity as Guideline;
    pub use super::notification::Entity as Notification;
    pub use super::parking_slot::Entity as ParkingSlot;
    pub use super::payment::Entity as Payment;
    pub use super::user::Entity as User;
}
