use service_core::config::{self as core_config, get_env};
use service_core::error::AppError;

#[derive(Debug, Clone)]
pub struct EventHandlerConfig {
    pub common: core_config::Config,
    /// Knative broker ingress that receives the wrapped events.
    pub broker_url: String,
}

impl EventHandlerConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;

        Ok(EventHandlerConfig {
            common,
            broker_url: get_env("BROKER_URL", None)?,
        })
    }
}
