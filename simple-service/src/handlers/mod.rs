pub const COMPLETED_MESSAGE: &str = "Your knative service completed successfully!";

pub async fn complete() -> &'static str {
    tracing::debug!("Simple service invoked");
    COMPLETED_MESSAGE
}
