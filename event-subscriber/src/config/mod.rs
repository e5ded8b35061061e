use service_core::config as core_config;
use service_core::error::AppError;

/// The subscriber only needs the common settings.
#[derive(Debug, Clone)]
pub struct SubscriberConfig {
    pub common: core_config::Config,
}

impl SubscriberConfig {
    pub fn load() -> Result<Self, AppError> {
        Ok(SubscriberConfig {
            common: core_config::Config::load()?,
        })
    }
}
