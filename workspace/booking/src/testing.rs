use chrono::Utc;
use migration::{Migrator, MigratorTrait};
use model::entities::{parking_slot, user};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectOptions, Database, DatabaseConnection, EntityTrait,
    QueryFilter, Set,
};
use std::path::PathBuf;

/// In-memory SQLite with all migrations applied, including the seeded
/// `mall`, `office` and `hospital` slots 1..=10.
pub async fn setup_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");
    Migrator::up(&db, None).await.expect("Failed to run migrations");
    db
}

/// File-backed SQLite with a pool of 8 connections, so statements from
/// concurrent tasks run on separate connections. Remove the file when done.
pub async fn setup_file_db(name: &str) -> (DatabaseConnection, PathBuf) {
    let path = std::env::temp_dir().join(format!("{}-{}.db", name, std::process::id()));
    let _ = std::fs::remove_file(&path);

    let mut options = ConnectOptions::new(format!("sqlite://{}?mode=rwc", path.display()));
    options.max_connections(8).min_connections(8).sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("Failed to open file database");
    Migrator::up(&db, None).await.expect("Failed to run migrations");
    (db, path)
}

pub async fn new_user(db: &DatabaseConnection, id: i32, username: &str) -> user::Model {
    user::ActiveModel {
        id: Set(id),
        username: Set(username.to_string()),
        email: Set(format!("{}@example.com", username)),
        password_hash: Set("not-a-real-hash".to_string()),
        phone: Set(None),
        profile_picture: Set(None),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("Failed to create test user")
}

pub async fn slot(db: &DatabaseConnection, location: &str, slot_number: i32) -> parking_slot::Model {
    parking_slot::Entity::find()
        .filter(parking_slot::Column::Location.eq(location))
        .filter(parking_slot::Column::SlotNumber.eq(slot_number))
        .one(db)
        .await
        .expect("Failed to query slot")
        .expect("Slot should exist")
}

pub async fn reload(db: &DatabaseConnection, slot_id: i32) -> parking_slot::Model {
    parking_slot::Entity::find_by_id(slot_id)
        .one(db)
        .await
        .expect("Failed to query slot")
        .expect("Slot should exist")
}
