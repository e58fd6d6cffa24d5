//! Discord REST client for interaction webhooks.
//!
//! Follows Discord's rate limit guidance: no hardcoded limits, 429
//! responses are retried after the `Retry-After` delay.

use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::{multipart, Client, RequestBuilder, Response};
use serde_json::json;
use tracing::{debug, warn};

use crate::chat::ChatError;
use crate::config::DiscordConfig;

/// Maximum number of attempts for rate-limited requests.
const MAX_RATE_LIMIT_ATTEMPTS: u32 = 3;

/// Longest rate limit wait honored before retrying.
const MAX_RETRY_AFTER: Duration = Duration::from_secs(60);

/// Thin client over the Discord endpoints the bot uses.
#[derive(Debug, Clone)]
pub struct DiscordClient {
    client: Client,
    api_base: String,
    application_id: String,
    token: String,
}

impl DiscordClient {
    /// Creates a client from configuration.
    pub fn new(config: &DiscordConfig) -> Result<Self, ChatError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("orbify/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            application_id: config.application_id.clone(),
            token: config.token.clone(),
        })
    }

    pub fn application_id(&self) -> &str {
        &self.application_id
    }

    fn webhook_url(&self, interaction_token: &str) -> String {
        format!(
            "{}/webhooks/{}/{}",
            self.api_base, self.application_id, interaction_token
        )
    }

    fn original_url(&self, interaction_token: &str) -> String {
        format!("{}/messages/@original", self.webhook_url(interaction_token))
    }

    /// Edits the content of the original interaction response.
    pub async fn edit_original(
        &self,
        interaction_token: &str,
        content: &str,
    ) -> Result<(), ChatError> {
        let url = self.original_url(interaction_token);
        let payload = json!({ "content": content });
        self.send_with_retry("edit original response", || {
            Ok(self.client.patch(&url).json(&payload))
        })
        .await?;
        Ok(())
    }

    /// Posts a follow-up message with one attached file.
    pub async fn create_followup(
        &self,
        interaction_token: &str,
        content: &str,
        file: &[u8],
        file_name: &str,
    ) -> Result<(), ChatError> {
        let url = self.webhook_url(interaction_token);
        let payload = json!({
            "content": content,
            "attachments": [{ "id": 0, "filename": file_name }],
        })
        .to_string();

        self.send_with_retry("create follow-up", || {
            let part = multipart::Part::bytes(file.to_vec())
                .file_name(file_name.to_string())
                .mime_str(mime_for(file_name))?;
            let form = multipart::Form::new()
                .text("payload_json", payload.clone())
                .part("files[0]", part);
            Ok(self.client.post(&url).multipart(form))
        })
        .await?;
        Ok(())
    }

    /// Deletes the original interaction response.
    pub async fn delete_original(&self, interaction_token: &str) -> Result<(), ChatError> {
        let url = self.original_url(interaction_token);
        self.send_with_retry("delete original response", || {
            Ok(self.client.delete(&url))
        })
        .await?;
        Ok(())
    }

    /// Replaces the application's global commands.
    pub async fn register_commands(
        &self,
        commands: &serde_json::Value,
    ) -> Result<(), ChatError> {
        let url = format!(
            "{}/applications/{}/commands",
            self.api_base, self.application_id
        );
        let auth = format!("Bot {}", self.token);
        self.send_with_retry("register commands", || {
            Ok(self
                .client
                .put(&url)
                .header(reqwest::header::AUTHORIZATION, &auth)
                .json(commands))
        })
        .await?;
        Ok(())
    }

    /// Sends a request, retrying on 429 responses.
    async fn send_with_retry<F>(
        &self,
        operation: &'static str,
        build: F,
    ) -> Result<Response, ChatError>
    where
        F: Fn() -> Result<RequestBuilder, ChatError>,
    {
        let mut attempts = 0;

        loop {
            attempts += 1;

            let response = build()?.send().await?;
            let status = response.status();

            if status.is_success() {
                return Ok(response);
            }

            if status.as_u16() == 429 {
                if attempts >= MAX_RATE_LIMIT_ATTEMPTS {
                    warn!(
                        "Discord rate limit: {} gave up after {} attempts",
                        operation, attempts
                    );
                    return Err(ChatError::RateLimited {
                        operation,
                        attempts,
                    });
                }

                let wait =
                    parse_retry_after(response.headers()).unwrap_or(Duration::from_secs(1));
                debug!(
                    "Discord rate limited {} (429), waiting {:?} (attempt {}/{})",
                    operation, wait, attempts, MAX_RATE_LIMIT_ATTEMPTS
                );
                tokio::time::sleep(wait).await;
                continue;
            }

            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Status {
                operation,
                status: status.as_u16(),
                body,
            });
        }
    }
}

/// Parses the Retry-After delay of a 429 response, capped at `MAX_RETRY_AFTER`.
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    ["Retry-After", "X-RateLimit-Reset-After"]
        .iter()
        .filter_map(|name| headers.get(*name))
        .filter_map(|value| value.to_str().ok()?.parse::<f64>().ok())
        .filter(|secs| secs.is_finite())
        .find_map(|secs| Duration::try_from_secs_f64(secs.min(MAX_RETRY_AFTER.as_secs_f64())).ok())
}

fn mime_for(file_name: &str) -> &'static str {
    match file_name.rsplit('.').next().map(|e| e.to_ascii_lowercase()) {
        Some(ext) if ext == "gif" => "image/gif",
        Some(ext) if ext == "png" => "image/png",
        Some(ext) if ext == "mp4" => "video/mp4",
        _ => "application/octet-stream",
    }
}
