use async_trait::async_trait;
use pm_core::services::BookmarkRequest;
use pm_core::{ArticleId, BookmarkService, Result, UserId};
use reqwest::Client;
use url::Url;

use crate::response::{decode, ensure_ok};

#[derive(Debug)]
pub struct HttpBookmarkService {
    client: Client,
    url: Url,
}

impl HttpBookmarkService {
    pub fn new(client: Client, url: Url) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl BookmarkService for HttpBookmarkService {
    async fn list(&self, user_id: UserId) -> Result<Vec<ArticleId>> {
        let response = self
            .client
            .get(self.url.clone())
            .query(&[("user_id", user_id.0)])
            .send()
            .await?;
        decode(ensure_ok(response, "load bookmarks").await?, "load bookmarks").await
    }

    async fn add(&self, user_id: UserId, article_id: ArticleId) -> Result<()> {
        let response = self
            .client
            .post(self.url.clone())
            .json(&BookmarkRequest { user_id, article_id })
            .send()
            .await?;
        ensure_ok(response, "add bookmark").await?;
        Ok(())
    }

    async fn remove(&self, user_id: UserId, article_id: ArticleId) -> Result<()> {
        let response = self
            .client
            .delete(self.url.clone())
            .query(&[("user_id", user_id.0), ("article_id", article_id.0)])
            .send()
            .await?;
        ensure_ok(response, "remove bookmark").await?;
        Ok(())
    }
}
