use event_subscriber_with_sink::config::SinkConfig;
use event_subscriber_with_sink::Application;
use service_core::config::Config;

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn(sink_url: &str) -> Self {
        let config = SinkConfig {
            common: Config {
                port: 0,
                log_level: "error".to_string(),
                otlp_endpoint: None,
                downstream_timeout_secs: 2,
            },
            kafka_sink_url: sink_url.to_string(),
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");
        let address = format!("http://127.0.0.1:{}", app.port());

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp { address, client }
    }
}
