use config::{Config, ConfigError, Environment};
use serde::Deserialize;

use crate::pkg::internal::jobs::ListingConfig;

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Postgres,
    Memory,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    pub service_name: String,
    pub listen_port: u16,
    pub store: StoreKind,
    pub database_url: Option<String>,
    pub database_pool_max_connections: u32,
    pub default_page_size: u32,
    pub max_page_size: u32,
    pub rate_limit_max_requests: u32,
    pub rate_limit_window_secs: u64,
    pub cors_origin: String,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let conf = Config::builder()
            .set_default("service_name", "jobboard")?
            .set_default("listen_port", 5000)?
            .set_default("store", "postgres")?
            .set_default("database_pool_max_connections", 5)?
            .set_default("default_page_size", 12)?
            .set_default("max_page_size", 100)?
            .set_default("rate_limit_max_requests", 100)?
            .set_default("rate_limit_window_secs", 15 * 60)?
            .set_default("cors_origin", "http://localhost:5173")?
            .add_source(Environment::default().try_parsing(true))
            .build()?;
        let mut s: Settings = conf.try_deserialize()?;
        if s.max_page_size == 0 {
            s.max_page_size = 100;
        }
        s.default_page_size = s.default_page_size.clamp(1, s.max_page_size);
        Ok(s)
    }

    pub fn listing(&self) -> ListingConfig {
        ListingConfig {
            default_limit: self.default_page_size,
            max_limit: self.max_page_size,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            service_name: "jobboard".into(),
            listen_port: 5000,
            store: StoreKind::Memory,
            database_url: None,
            database_pool_max_connections: 5,
            default_page_size: 12,
            max_page_size: 100,
            rate_limit_max_requests: 100,
            rate_limit_window_secs: 15 * 60,
            cors_origin: "http://localhost:5173".into(),
        }
    }
}
