pub mod initdb;
pub mod migrate_and_serve;
pub mod seed_slots;
pub mod serve;

pub use initdb::init_database;
pub use migrate_and_serve::migrate_and_serve;
pub use seed_slots::seed_slots;
pub use serve::serve;
