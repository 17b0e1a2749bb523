use std::fmt;

use async_trait::async_trait;
use pm_core::{Article, ArticleDraft, ArticleId, ArticleService, Result};
use reqwest::Client;
use serde::Serialize;
use url::Url;

use crate::response::{decode, ensure_ok};

/// PUT body: the draft plus the id of the row to change.
#[derive(Serialize)]
struct ArticleUpdate<'a> {
    id: ArticleId,
    #[serde(flatten)]
    draft: &'a ArticleDraft,
}

pub struct HttpArticleService {
    client: Client,
    url: Url,
}

impl HttpArticleService {
    pub fn new(client: Client, url: Url) -> Self {
        Self { client, url }
    }
}

impl fmt::Debug for HttpArticleService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpArticleService")
            .field("url", &self.url.as_str())
            .finish()
    }
}

#[async_trait]
impl ArticleService for HttpArticleService {
    async fn list(&self) -> Result<Vec<Article>> {
        let response = self.client.get(self.url.clone()).send().await?;
        let articles: Vec<Article> = decode(ensure_ok(response, "load articles").await?, "load articles").await?;
        tracing::debug!("Loaded {} articles", articles.len());
        Ok(articles)
    }

    async fn get(&self, id: ArticleId) -> Result<Article> {
        let response = self
            .client
            .get(self.url.clone())
            .query(&[("id", id.0)])
            .send()
            .await?;
        decode(ensure_ok(response, "load article").await?, "load article").await
    }

    async fn create(&self, draft: &ArticleDraft) -> Result<()> {
        let response = self.client.post(self.url.clone()).json(draft).send().await?;
        ensure_ok(response, "create article").await?;
        tracing::info!("Created article {:?}", draft.title);
        Ok(())
    }

    async fn update(&self, id: ArticleId, draft: &ArticleDraft) -> Result<()> {
        let body = ArticleUpdate { id, draft };
        let response = self.client.put(self.url.clone()).json(&body).send().await?;
        ensure_ok(response, "update article").await?;
        tracing::info!("Updated article {}", id);
        Ok(())
    }

    async fn delete(&self, id: ArticleId) -> Result<()> {
        let response = self
            .client
            .delete(self.url.clone())
            .query(&[("id", id.0)])
            .send()
            .await?;
        ensure_ok(response, "delete article").await?;
        tracing::info!("Deleted article {}", id);
        Ok(())
    }
}
