// Application state (AppState)

use crate::core::config::Config;
use crate::core::db::Database;
use crate::device::client::DeviceClient;
use crate::stores::{session_store::SessionStore, spot_board::SpotBoard, user_store::UserStore};
use crate::utils::cookie::CookieConfig;
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;

/// Shared application state
///
/// Owned by the router and handed to every handler; there is no
/// process-global state besides this.
pub struct AppState {
    /// Account table
    pub users: UserStore,

    /// Login sessions
    pub sessions: SessionStore,

    /// Live status of the parking spots
    pub spots: SpotBoard,

    /// Client for the parking controller
    pub device: DeviceClient,

    pub cookie_config: CookieConfig,

    /// Configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config, db: Database) -> Result<Self> {
        let config = Arc::new(config);

        let device = DeviceClient::new(
            &config.device.base_url,
            Duration::from_secs(config.device.timeout_secs),
        )
        .context("Failed to create device client")?;

        let cookie_config = CookieConfig {
            name: config.session.cookie_name.clone(),
            secure: config.session.secure_cookie,
            max_age_secs: config.session.ttl_secs,
        };

        Ok(Self {
            users: UserStore::new(db.clone()),
            sessions: SessionStore::new(db, config.session.ttl_secs),
            spots: SpotBoard::new(),
            device,
            cookie_config,
            config,
        })
    }
}

#[cfg(test)]
pub mod test_support {
    use super::*;
    use crate::core::config::{
        DatabaseConfig, DeviceConfig, LoggingConfig, ServerConfig, SessionConfig,
    };
    use crate::device::client::fake::{unreachable_client, FakeDevice};

    pub fn create_test_config(base_url: &str) -> Config {
        Config {
            server: ServerConfig {
                port: Some(5000),
                unix_socket: None,
                num_threads: 2,
            },
            device: DeviceConfig {
                base_url: base_url.to_string(),
                timeout_secs: 5,
            },
            database: DatabaseConfig::default(),
            session: SessionConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "json".to_string(),
                console: false,
            },
        }
    }

    /// State whose controller cannot be reached
    pub async fn create_test_state() -> Arc<AppState> {
        let client = unreachable_client().await;
        let config = create_test_config(client.base_url());
        let db = Database::open_in_memory().unwrap();

        Arc::new(AppState::new(config, db).unwrap())
    }

    /// State wired to a fake controller
    pub async fn create_test_state_with_device() -> (Arc<AppState>, FakeDevice) {
        let device = FakeDevice::start().await;
        let config = create_test_config(&device.base_url);
        let db = Database::open_in_memory().unwrap();

        (Arc::new(AppState::new(config, db).unwrap()), device)
    }
}
