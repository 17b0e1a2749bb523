use std::fmt;

use async_trait::async_trait;
use pm_core::{AuthAction, AuthRequest, AuthResponse, AuthService, Error, Result};
use reqwest::Client;
use url::Url;

use crate::response::{decode, error_message};

pub struct HttpAuthService {
    client: Client,
    url: Url,
}

impl HttpAuthService {
    pub fn new(client: Client, url: Url) -> Self {
        Self { client, url }
    }

    async fn authenticate(&self, request: AuthRequest, fallback: &str) -> Result<AuthResponse> {
        let response = self.client.post(self.url.clone()).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = error_message(response).await.unwrap_or_else(|| fallback.to_string());
            tracing::debug!("{:?} rejected with {}: {}", request.action, status, message);
            return Err(Error::Auth(message));
        }

        decode(response, "auth").await
    }
}

impl fmt::Debug for HttpAuthService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpAuthService")
            .field("client", &"<reqwest::Client>")
            .field("url", &self.url.as_str())
            .finish()
    }
}

#[async_trait]
impl AuthService for HttpAuthService {
    async fn register(&self, username: &str, email: &str, password: &str) -> Result<AuthResponse> {
        let request = AuthRequest {
            action: AuthAction::Register,
            username: username.to_string(),
            email: Some(email.to_string()),
            password: password.to_string(),
        };
        self.authenticate(request, "Ошибка регистрации").await
    }

    async fn login(&self, username: &str, password: &str) -> Result<AuthResponse> {
        let request = AuthRequest {
            action: AuthAction::Login,
            username: username.to_string(),
            email: None,
            password: password.to_string(),
        };
        self.authenticate(request, "Ошибка входа").await
    }
}
