use pm_core::{Error, Result, Session};

use crate::session::SessionStore;

pub const FIELDS_REQUIRED: &str = "Заполните все поля";
pub const PASSWORD_MISMATCH: &str = "Пароли не совпадают";
pub const PASSWORD_TOO_SHORT: &str = "Пароль должен содержать минимум 6 символов";
pub const USERNAME_TOO_SHORT: &str = "Имя пользователя должно содержать минимум 3 символа";
pub const EMAIL_INVALID: &str = "Введите корректный email";

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MIN_USERNAME_LEN: usize = 3;

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty() || self.password.is_empty() {
            return Err(Error::validation(FIELDS_REQUIRED));
        }
        Ok(())
    }

    pub async fn submit(&self, session: &SessionStore) -> Result<Session> {
        self.validate()?;
        session.login(self.username.trim(), &self.password).await
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    /// First failing check wins; mismatch is reported before length.
    pub fn validate(&self) -> Result<()> {
        if self.password != self.confirm_password {
            return Err(Error::validation(PASSWORD_MISMATCH));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(Error::validation(PASSWORD_TOO_SHORT));
        }
        if self.username.trim().chars().count() < MIN_USERNAME_LEN {
            return Err(Error::validation(USERNAME_TOO_SHORT));
        }
        if !self.email.contains('@') {
            return Err(Error::validation(EMAIL_INVALID));
        }
        Ok(())
    }

    pub async fn submit(&self, session: &SessionStore) -> Result<Session> {
        self.validate()?;
        session
            .register(self.username.trim(), self.email.trim(), &self.password)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::fakes::{memory_storage, FakeAuth};
    use std::sync::Arc;

    fn register(username: &str, password: &str, confirm: &str) -> RegisterForm {
        RegisterForm {
            username: username.to_string(),
            email: format!("{}@mvd.ru", username),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    fn message(result: Result<()>) -> String {
        result.unwrap_err().to_string()
    }

    #[test]
    fn test_register_validation_order() {
        assert_eq!(message(register("ab", "123", "456").validate()), PASSWORD_MISMATCH);
        assert_eq!(message(register("ab", "12345", "12345").validate()), PASSWORD_TOO_SHORT);
        assert_eq!(message(register("ab", "123456", "123456").validate()), USERNAME_TOO_SHORT);
        // Cyrillic counts by character.
        assert!(register("иван", "пароль", "пароль").validate().is_ok());

        let mut form = register("officer1", "pw123456", "pw123456");
        form.email = "nobody".to_string();
        assert_eq!(message(form.validate()), EMAIL_INVALID);
    }

    #[test]
    fn test_login_requires_fields() {
        let form = LoginForm {
            username: " ".to_string(),
            password: "pw123456".to_string(),
        };
        assert_eq!(message(form.validate()), FIELDS_REQUIRED);
    }

    #[tokio::test]
    async fn test_mismatched_register_issues_no_request() {
        let auth = Arc::new(FakeAuth::new());
        let store = SessionStore::new(memory_storage(), auth.clone());

        let err = register("officer9", "pw123456", "pw654321").submit(&store).await.unwrap_err();
        assert!(matches!(err, Error::Validation(ref m) if m == PASSWORD_MISMATCH));
        assert_eq!(auth.calls(), 0);
        assert!(!store.is_authenticated().await.unwrap());
    }

    #[tokio::test]
    async fn test_valid_forms_reach_the_service() {
        let auth = Arc::new(FakeAuth::new());
        let store = SessionStore::new(memory_storage(), auth.clone());

        let session = register(" officer9 ", "pw123456", "pw123456").submit(&store).await.unwrap();
        assert_eq!(session.user.username, "officer9");

        let login = LoginForm {
            username: "officer1".to_string(),
            password: "pw123456".to_string(),
        };
        login.submit(&store).await.unwrap();
        assert_eq!(auth.calls(), 2);
    }
}
