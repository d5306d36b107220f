//! Best-effort chat notifications for new inquiries.

use crate::{
    config::NotifierConfig,
    errors::{ServiceError, ServiceResult},
    models::inquiry::Inquiry,
};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str) -> ServiceResult<()>;
}

/// Text relayed to the site owner when an inquiry arrives.
pub fn inquiry_message(inquiry: &Inquiry) -> String {
    let mut text = format!(
        "New Inquiry:\nName: {}\nMobile: {}\nMessage: {}",
        inquiry.name, inquiry.mobile, inquiry.message
    );
    if let Some(title) = &inquiry.artwork_title {
        text.push_str(&format!("\nArtwork: {}", title));
    }
    text
}

/// Posts chat messages through the UltraMsg WhatsApp gateway.
#[derive(Clone, Debug)]
pub struct UltraMsgNotifier {
    client: reqwest::Client,
    endpoint: String,
    token: String,
    to: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatMessage<'a> {
    token: &'a str,
    to: &'a str,
    body: &'a str,
    priority: u8,
    reference_id: &'a str,
}

impl UltraMsgNotifier {
    /// Build a notifier when instance id, token and recipient are all set.
    pub fn from_config(cfg: &NotifierConfig) -> ServiceResult<Option<Self>> {
        let (Some(instance_id), Some(token), Some(to)) =
            (&cfg.instance_id, &cfg.token, &cfg.to)
        else {
            return Ok(None);
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ServiceError::Upstream(e.to_string()))?;

        Ok(Some(Self {
            client,
            endpoint: format!(
                "{}/{}/messages/chat",
                cfg.base_url.trim_end_matches('/'),
                instance_id
            ),
            token: token.clone(),
            to: to.clone(),
        }))
    }
}

#[async_trait]
impl Notifier for UltraMsgNotifier {
    async fn send(&self, text: &str) -> ServiceResult<()> {
        self.client
            .post(&self.endpoint)
            .json(&ChatMessage {
                token: &self.token,
                to: &self.to,
                body: text,
                priority: 10,
                reference_id: "inquiry",
            })
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| ServiceError::Upstream(e.to_string()))?;
        Ok(())
    }
}
