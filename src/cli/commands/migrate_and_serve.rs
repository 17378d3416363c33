use anyhow::Result;
use tracing::info;

use super::initdb::connect_and_migrate;
use super::serve::serve_state;
use crate::config::{app_state_with_connection, AppConfig};

pub async fn migrate_and_serve(config: AppConfig) -> Result<()> {
    info!("Applying database migrations and starting server");

    let db = connect_and_migrate(&config.database_url).await?;
    serve_state(app_state_with_connection(db, config)).await
}
