mod settings;

pub use settings::{BotConfig, SessionConfig, Settings, StorageConfig};
