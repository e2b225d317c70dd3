use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    pub bot: BotConfig,
    pub session: SessionConfig,
    pub storage: StorageConfig,
}

/// Transport-facing values. Only consumed by the embedding bot binary;
/// nothing in this crate reads them.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BotConfig {
    pub token: Option<String>,
    pub port: u16,
    pub webhook_url: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SessionConfig {
    /// Durable session backend. When unset or unreachable the service
    /// falls back to the in-memory store.
    pub redis_url: Option<String>,
    pub ttl_seconds: u64,
    pub sweep_interval_seconds: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StorageConfig {
    /// Working area for per-session temporary documents.
    pub workdir: PathBuf,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = Config::builder()
            .set_default("bot.port", 8443)?
            .set_default("session.ttl_seconds", 3600)?
            .set_default("session.sweep_interval_seconds", 300)?
            .set_default("storage.workdir", "temp")?
            .add_source(File::with_name("config/settings").required(false))
            .add_source(
                Environment::with_prefix("PDFBOT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                token: None,
                port: 8443,
                webhook_url: None,
            },
            session: SessionConfig {
                redis_url: None,
                ttl_seconds: 3600,
                sweep_interval_seconds: 300,
            },
            storage: StorageConfig {
                workdir: PathBuf::from("temp"),
            },
        }
    }
}
