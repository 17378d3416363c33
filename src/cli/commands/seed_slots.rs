use anyhow::{Context, Result};
use sea_orm::Database;
use tracing::{debug, info};

pub async fn seed_slots(database_url: &str, location: &str, count: i32) -> Result<()> {
    debug!("Database URL: {}", database_url);
    let db = Database::connect(database_url)
        .await
        .with_context(|| format!("Failed to connect to database '{}'", database_url))?;

    let inserted = booking::slots::seed_slots(&db, location, count)
        .await
        .with_context(|| format!("Failed to seed slots for '{}'", location))?;

    info!(
        "Location {} now has slots 1..={} ({} newly created)",
        location, count, inserted
    );
    Ok(())
}
