// src/gateway/chatbot.rs
//! Client for the external chatbot service. Unlike the parser gateway this
//! one never surfaces a failure: chat stays responsive with a fixed fallback
//! text when the service is down or replies with nothing.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

const FALLBACK_NO_REPLY: &str = "Sorry, I didn't understand that.";
const FALLBACK_FAILURE: &str = "Sorry, I couldn't process that request.";

#[derive(Debug, Deserialize)]
pub struct ChatReply {
    pub text: Option<String>,
}

pub struct ChatbotClient {
    client: reqwest::Client,
    url: String,
}

impl ChatbotClient {
    pub fn new(url: String, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, url })
    }

    /// Forward a free-text message and return the first reply text
    pub async fn send_message(&self, message: &str) -> String {
        match self.try_send(message).await {
            Ok(replies) => extract_reply(replies),
            Err(e) => {
                error!("Error connecting to chatbot service: {}", e);
                FALLBACK_FAILURE.to_string()
            }
        }
    }

    async fn try_send(&self, message: &str) -> Result<Vec<ChatReply>> {
        info!("Forwarding chat message to {}", self.url);

        let response = self
            .client
            .post(&self.url)
            .json(&json!({ "message": message }))
            .send()
            .await
            .context("Chatbot request failed")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Chatbot service returned error status {}", status);
        }

        response
            .json::<Vec<ChatReply>>()
            .await
            .context("Failed to parse chatbot response")
    }
}

fn extract_reply(replies: Vec<ChatReply>) -> String {
    replies
        .into_iter()
        .next()
        .and_then(|reply| reply.text)
        .unwrap_or_else(|| FALLBACK_NO_REPLY.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_reply_takes_first_text() {
        let replies: Vec<ChatReply> =
            serde_json::from_str(r#"[{"text": "Hello!"}, {"text": "Second"}]"#).unwrap();
        assert_eq!(extract_reply(replies), "Hello!");
    }

    #[test]
    fn test_extract_reply_empty_array_falls_back() {
        assert_eq!(extract_reply(vec![]), FALLBACK_NO_REPLY);
    }

    #[test]
    fn test_extract_reply_missing_text_falls_back() {
        let replies: Vec<ChatReply> =
            serde_json::from_str(r#"[{"recipient_id": "user"}]"#).unwrap();
        assert_eq!(extract_reply(replies), FALLBACK_NO_REPLY);
    }
}
