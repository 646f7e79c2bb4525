use super::{
    cors_config,
    database_config::{self, StorageBackend},
    server_config::ServerConfig,
};
use poem::middleware::Cors;

pub struct AppConfig {
    pub server: ServerConfig,
    pub cors: Cors,
    pub storage: StorageBackend,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            server: ServerConfig::from_env(),
            cors: cors_config::init_cors(),
            storage: database_config::storage_backend()?,
        })
    }
}
