use async_trait::async_trait;
use pm_core::{ChatMessage, ChatService, NewChatMessage, Result};
use reqwest::Client;
use url::Url;

use crate::response::{decode, ensure_ok};

#[derive(Debug)]
pub struct HttpChatService {
    client: Client,
    url: Url,
}

impl HttpChatService {
    pub fn new(client: Client, url: Url) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl ChatService for HttpChatService {
    async fn list(&self) -> Result<Vec<ChatMessage>> {
        let response = self.client.get(self.url.clone()).send().await?;
        decode(ensure_ok(response, "load chat").await?, "load chat").await
    }

    async fn post(&self, message: &NewChatMessage) -> Result<()> {
        let response = self.client.post(self.url.clone()).json(message).send().await?;
        ensure_ok(response, "send chat message").await?;
        Ok(())
    }
}
