use async_trait::async_trait;
use serde_json::json;

use crate::app::ports::NotifierPort;
use crate::error::{PipelineError, Result};

/// Publishes alerts by POSTing JSON to a webhook endpoint; the topic is
/// the endpoint URL.
pub struct WebhookNotifier {
    client: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for WebhookNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotifierPort for WebhookNotifier {
    async fn publish(&self, topic: &str, subject: &str, message: &str) -> Result<()> {
        let resp = self
            .client
            .post(topic)
            .json(&json!({ "subject": subject, "message": message }))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(PipelineError::Notify(format!(
                "webhook returned {}",
                resp.status()
            )));
        }
        Ok(())
    }
}
