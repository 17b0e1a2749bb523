use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::{Article, ArticleId, Category, ChatMessage, User, UserId};
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthAction {
    Register,
    Login,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthRequest {
    pub action: AuthAction,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

/// Error body every service answers with on a non-2xx status.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceError {
    #[serde(default)]
    pub error: Option<String>,
}

/// Article fields sent on create and update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleDraft {
    pub title: String,
    pub content: String,
    pub category: Category,
    pub tags: Vec<String>,
    /// Base64 image payload, uploaded by the service and replaced by `image_url`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookmarkRequest {
    pub user_id: UserId,
    pub article_id: ArticleId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewChatMessage {
    pub user_id: UserId,
    pub username: String,
    pub message: String,
}

#[async_trait]
pub trait AuthService: Send + Sync {
    async fn register(&self, username: &str, email: &str, password: &str) -> Result<AuthResponse>;

    async fn login(&self, username: &str, password: &str) -> Result<AuthResponse>;
}

#[async_trait]
pub trait ArticleService: Send + Sync {
    /// Fetch the whole catalog
    async fn list(&self) -> Result<Vec<Article>>;

    /// Fetch a single article by id
    async fn get(&self, id: ArticleId) -> Result<Article>;

    async fn create(&self, draft: &ArticleDraft) -> Result<()>;

    async fn update(&self, id: ArticleId, draft: &ArticleDraft) -> Result<()>;

    async fn delete(&self, id: ArticleId) -> Result<()>;
}

#[async_trait]
pub trait BookmarkService: Send + Sync {
    /// Ids of every article the user bookmarked
    async fn list(&self, user_id: UserId) -> Result<Vec<ArticleId>>;

    async fn add(&self, user_id: UserId, article_id: ArticleId) -> Result<()>;

    async fn remove(&self, user_id: UserId, article_id: ArticleId) -> Result<()>;
}

#[async_trait]
pub trait ChatService: Send + Sync {
    /// Full message history in the order the service returns it
    async fn list(&self) -> Result<Vec<ChatMessage>>;

    async fn post(&self, message: &NewChatMessage) -> Result<()>;
}
