use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Rejected credentials or registration; carries the message the auth
    /// service sent back so it can be shown next to the form.
    #[error("{0}")]
    Auth(String),

    #[error("Network error: {0}")]
    Network(String),

    /// Client-side form check failed, nothing was sent.
    #[error("{0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// The three ways a failure reaches the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Inline text under the login/register form.
    Auth,
    /// Generic notice, the operation is abandoned.
    Network,
    /// Blocks submission before any request.
    Validation,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Auth(_) => ErrorKind::Auth,
            Error::Validation(_) => ErrorKind::Validation,
            _ => ErrorKind::Network,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    pub fn network(message: impl Into<String>) -> Self {
        Error::Network(message.into())
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Error::InvalidUrl(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert_eq!(Error::Auth("Неверный пароль".into()).kind(), ErrorKind::Auth);
        assert_eq!(Error::validation("Пароли не совпадают").kind(), ErrorKind::Validation);
        assert_eq!(Error::network("503").kind(), ErrorKind::Network);
        assert_eq!(Error::Storage("disk".into()).kind(), ErrorKind::Network);
    }

    #[test]
    fn test_auth_and_validation_display_raw_message() {
        assert_eq!(Error::Auth("Ошибка входа".into()).to_string(), "Ошибка входа");
        assert_eq!(Error::validation("Пароли не совпадают").to_string(), "Пароли не совпадают");
        assert_eq!(Error::network("status 500").to_string(), "Network error: status 500");
    }
}
