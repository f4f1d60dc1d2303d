/// Application context and dependency injection
use crate::{config::ServerConfig, error::PrResult, registry::PersonRepository};
use std::sync::Arc;

/// Application context holding all shared services
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ServerConfig>,
    pub repository: Arc<PersonRepository>,
}

impl AppContext {
    /// Create a new application context with an empty repository
    pub fn new(config: ServerConfig) -> PrResult<Self> {
        config.validate()?;

        Ok(Self {
            config: Arc::new(config),
            repository: Arc::new(PersonRepository::new()),
        })
    }

    /// Get service address
    pub fn service_addr(&self) -> String {
        format!("{}:{}", self.config.service.ip, self.config.service.port)
    }

    /// Get monitoring address, when monitoring runs on its own port
    pub fn monitoring_addr(&self) -> Option<String> {
        self.config
            .separate_monitoring()
            .then(|| format!("{}:{}", self.config.service.ip, self.config.monitoring.port))
    }
}
