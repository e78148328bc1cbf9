//! Discord REST API client

#[cfg(test)]
use mockall::automock;

use serde::Serialize;
use tracing::debug;

use crate::clients::USER_AGENT;
use crate::clients::error::ApiError;

/// Default base URL for the Discord REST API
pub const DEFAULT_BASE_URL: &str = "https://discord.com/api/v10";

/// Prefix added to every notification so readers know where it came from
const NOTIFICATION_PREFIX: &str = "[Status checker] ";

/// Rich embed shown on the status board
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: u32,
    pub fields: Vec<EmbedField>,
    pub footer: EmbedFooter,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedFooter {
    pub text: String,
}

#[derive(Serialize)]
struct MessageContent<'a> {
    content: &'a str,
}

#[derive(Serialize)]
struct MessageEmbeds<'a> {
    embeds: [&'a Embed; 1],
}

/// Trait for the chat operations the monitor needs
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ChatApi: Send + Sync {
    /// Posts a plain-text notification to a channel
    async fn send_notification(&self, channel_id: &str, text: &str) -> Result<(), ApiError>;

    /// Replaces the embed of an existing message
    async fn edit_embed(
        &self,
        channel_id: &str,
        message_id: &str,
        embed: &Embed,
    ) -> Result<(), ApiError>;
}

/// Discord bot client
pub struct DiscordClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl DiscordClient {
    pub fn new(base_url: &str, token: &str) -> Result<Self, ApiError> {
        Ok(Self {
            client: reqwest::Client::builder().user_agent(USER_AGENT).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    async fn send<T: Serialize + Sync>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &T,
    ) -> Result<(), ApiError> {
        let url = format!("{}/{}", self.base_url, path);

        let response = self
            .client
            .request(method.clone(), &url)
            .header("Authorization", format!("Bot {}", self.token))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::UnexpectedStatus {
                endpoint: format!("{} {}", method, path),
                status,
            });
        }

        debug!("Discord {} {} -> {}", method, path, status);
        Ok(())
    }
}

#[async_trait::async_trait]
impl ChatApi for DiscordClient {
    async fn send_notification(&self, channel_id: &str, text: &str) -> Result<(), ApiError> {
        let content = format!("{NOTIFICATION_PREFIX}{text}");
        self.send(
            reqwest::Method::POST,
            &format!("channels/{channel_id}/messages"),
            &MessageContent { content: &content },
        )
        .await
    }

    async fn edit_embed(
        &self,
        channel_id: &str,
        message_id: &str,
        embed: &Embed,
    ) -> Result<(), ApiError> {
        self.send(
            reqwest::Method::PATCH,
            &format!("channels/{channel_id}/messages/{message_id}"),
            &MessageEmbeds { embeds: [embed] },
        )
        .await
    }
}
