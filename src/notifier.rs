//! Status notification to an operator-facing channel
//!
//! The service reports upload activity and request failures out-of-band, the
//! same way the surrounding messaging application surfaces them in chat.
//! Delivery is fire-and-forget: a lost notification never fails the HTTP
//! response that triggered it.

use async_trait::async_trait;
use tracing::{info, warn};

/// Capability for delivering human-readable status lines
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one status line. Implementations must not propagate failures.
    async fn notify(&self, message: &str);
}

/// Notifier that writes status lines to the service log
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, message: &str) {
        info!("{}", message);
    }
}

/// Notifier that posts status lines to a chat webhook
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    /// Create a notifier targeting the given webhook URL
    pub fn new(url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, message: &str) {
        let payload = serde_json::json!({ "text": message });
        match self.client.post(&self.url).json(&payload).send().await {
            Ok(response) if !response.status().is_success() => {
                warn!(
                    status = %response.status(),
                    "notification webhook rejected status line"
                );
            }
            Ok(_) => {}
            Err(e) => warn!("failed to deliver notification: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_webhook_notifier_posts_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/hook")
            .match_header("content-type", "application/json")
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "text": "file stored"
            })))
            .with_status(200)
            .create_async()
            .await;

        let notifier = WebhookNotifier::new(format!("{}/hook", server.url()));
        notifier.notify("file stored").await;

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_webhook_notifier_swallows_failures() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/hook")
            .with_status(503)
            .create_async()
            .await;

        // A rejected delivery must not panic or error.
        let notifier = WebhookNotifier::new(format!("{}/hook", server.url()));
        notifier.notify("anything").await;

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_log_notifier_is_infallible() {
        LogNotifier.notify("startup complete").await;
    }
}
