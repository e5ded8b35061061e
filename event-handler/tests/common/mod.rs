use event_handler::config::EventHandlerConfig;
use event_handler::Application;
use service_core::config::Config;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Start the service on a random port, forwarding to `broker_url`.
    pub async fn spawn(broker_url: &str) -> Self {
        let config = EventHandlerConfig {
            common: Config {
                port: 0, // Random port
                log_level: "error".to_string(),
                otlp_endpoint: None,
                downstream_timeout_secs: 2,
            },
            broker_url: broker_url.to_string(),
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            client,
        }
    }

    /// POST an event with the given `ce_*` headers.
    pub async fn post_event(
        &self,
        headers: &[(&str, &str)],
        body: &serde_json::Value,
    ) -> reqwest::Response {
        let mut request = self.client.post(&self.address).json(body);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        request.send().await.expect("Failed to execute request")
    }
}
