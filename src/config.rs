use anyhow::Result;
use booking::{RenumberPolicy, SlotBookingGuard};
use config::{Config, Environment, File};
use sea_orm::{Database, DatabaseConnection};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::schemas::AppState;
use crate::session::SessionStore;

/// Runtime settings.
///
/// Layered from built-in defaults, an optional `parkslot.toml` in the working
/// directory and `PARKSLOT_*` environment variables, in that order.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_address: String,
    /// Idle sessions expire after this many seconds
    pub session_ttl_secs: u64,
    pub session_capacity: u64,
    /// Slot listings are padded with virtual entries up to this size
    pub min_listed_slots: usize,
    /// Write the requested slot number onto a slot when it is booked
    pub renumber_on_book: bool,
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://parkslot.db?mode=rwc".to_string(),
            bind_address: "0.0.0.0:3000".to_string(),
            session_ttl_secs: 60 * 60 * 8,
            session_capacity: 10_000,
            min_listed_slots: booking::slots::DEFAULT_MIN_LISTED,
            renumber_on_book: false,
            request_timeout_secs: 30,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = AppConfig::default();

        let settings = Config::builder()
            .set_default("database_url", defaults.database_url)?
            .set_default("bind_address", defaults.bind_address)?
            .set_default("session_ttl_secs", defaults.session_ttl_secs as i64)?
            .set_default("session_capacity", defaults.session_capacity as i64)?
            .set_default("min_listed_slots", defaults.min_listed_slots as i64)?
            .set_default("renumber_on_book", defaults.renumber_on_book)?
            .set_default("request_timeout_secs", defaults.request_timeout_secs as i64)?
            .add_source(File::with_name("parkslot").required(false))
            .add_source(Environment::with_prefix("PARKSLOT").try_parsing(true))
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    /// Applies values given on the command line.
    pub fn with_overrides(mut self, database_url: Option<String>, bind_address: Option<String>) -> Self {
        if let Some(database_url) = database_url {
            self.database_url = database_url;
        }
        if let Some(bind_address) = bind_address {
            self.bind_address = bind_address;
        }
        self
    }

    pub fn renumber_policy(&self) -> RenumberPolicy {
        RenumberPolicy::from_flag(self.renumber_on_book)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Initialize application state for the given configuration
pub async fn initialize_app_state(config: AppConfig) -> Result<AppState> {
    info!("Connecting to database: {}", config.database_url);
    let db = Database::connect(&config.database_url).await?;
    Ok(app_state_with_connection(db, config))
}

/// Builds the state around an already opened connection.
pub fn app_state_with_connection(db: DatabaseConnection, config: AppConfig) -> AppState {
    let sessions = SessionStore::new(config.session_capacity, config.session_ttl());
    let guard = SlotBookingGuard::new(config.renumber_policy());
    debug!("Slot booking guard uses {:?}", guard.policy());

    AppState {
        db,
        sessions,
        guard,
        config: Arc::new(config),
    }
}
