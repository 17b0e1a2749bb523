use std::sync::Arc;

use pm_core::{ArticleService, AuthService, BookmarkService, ChatService, Result};
use reqwest::Client;

pub mod articles;
pub mod auth;
pub mod bookmarks;
pub mod chat;
pub mod endpoints;
mod response;

pub use articles::HttpArticleService;
pub use auth::HttpAuthService;
pub use bookmarks::HttpBookmarkService;
pub use chat::HttpChatService;
pub use endpoints::Endpoints;

/// One shared `reqwest::Client` handing out a client per service.
#[derive(Debug, Clone)]
pub struct ServiceClients {
    client: Client,
    endpoints: Endpoints,
}

impl ServiceClients {
    pub fn new(endpoints: Endpoints) -> Self {
        Self {
            client: Client::new(),
            endpoints,
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn auth(&self) -> Arc<dyn AuthService> {
        Arc::new(HttpAuthService::new(self.client.clone(), self.endpoints.auth.clone()))
    }

    pub fn articles(&self) -> Arc<dyn ArticleService> {
        Arc::new(HttpArticleService::new(self.client.clone(), self.endpoints.articles.clone()))
    }

    pub fn bookmarks(&self) -> Result<Arc<dyn BookmarkService>> {
        let url = self.endpoints.bookmarks()?.clone();
        Ok(Arc::new(HttpBookmarkService::new(self.client.clone(), url)))
    }

    pub fn chat(&self) -> Result<Arc<dyn ChatService>> {
        let url = self.endpoints.chat()?.clone();
        Ok(Arc::new(HttpChatService::new(self.client.clone(), url)))
    }
}

pub mod prelude {
    pub use super::{Endpoints, ServiceClients};
    pub use pm_core::{Error, Result};
}
