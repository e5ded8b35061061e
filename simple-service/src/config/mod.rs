use service_core::config as core_config;
use service_core::error::AppError;

#[derive(Debug, Clone)]
pub struct SimpleConfig {
    pub common: core_config::Config,
}

impl SimpleConfig {
    pub fn load() -> Result<Self, AppError> {
        Ok(SimpleConfig {
            common: core_config::Config::load()?,
        })
    }
}
