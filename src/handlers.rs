pub mod admins;
pub mod content;
pub mod health;
pub mod payments;
pub mod pricing;
pub mod slots;
pub mod users;
