use service_core::config::{self as core_config, get_env};
use service_core::error::AppError;

/// Attributes stamped on every event forwarded to the sink.
pub const SINK_EVENT_TYPE: &str = "dev.kafka.type";
pub const SINK_EVENT_SOURCE: &str = "dev.kafka.source";

#[derive(Debug, Clone)]
pub struct SinkConfig {
    pub common: core_config::Config,
    /// KafkaSink ingress address.
    pub kafka_sink_url: String,
}

impl SinkConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;

        Ok(SinkConfig {
            common,
            kafka_sink_url: get_env("KAFKA_SINK_URL", None)?,
        })
    }
}
