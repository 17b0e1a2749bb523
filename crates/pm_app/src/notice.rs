use std::fmt;

use pm_core::{Error, ErrorKind};

use crate::admin::Mutation;

/// What the user was doing when a notice was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Login,
    Register,
    Logout,
    LoadArticles,
    SaveArticle,
    DeleteArticle,
    LoadBookmarks,
    ToggleBookmark,
    LoadChat,
    SendMessage,
}

impl Action {
    fn failure_text(&self) -> &'static str {
        match self {
            Action::Login => "Ошибка входа",
            Action::Register => "Ошибка регистрации",
            Action::Logout => "Не удалось завершить сеанс",
            Action::LoadArticles => "Не удалось загрузить статьи",
            Action::SaveArticle => "Не удалось сохранить статью",
            Action::DeleteArticle => "Не удалось удалить статью",
            Action::LoadBookmarks => "Не удалось загрузить закладки",
            Action::ToggleBookmark => "Не удалось обновить закладку",
            Action::LoadChat => "Не удалось загрузить сообщения",
            Action::SendMessage => "Не удалось отправить сообщение",
        }
    }
}

/// Toast-style message shown after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: &'static str,
    pub description: String,
    pub destructive: bool,
}

impl Notice {
    pub fn success(description: impl Into<String>) -> Self {
        Self {
            title: "Успешно",
            description: description.into(),
            destructive: false,
        }
    }

    pub fn error(description: impl Into<String>) -> Self {
        Self {
            title: "Ошибка",
            description: description.into(),
            destructive: true,
        }
    }

    /// Auth and validation errors keep their own text, everything else
    /// collapses to the generic line for `action`.
    pub fn failure(action: Action, error: &Error) -> Self {
        tracing::error!("{:?} failed: {}", action, error);
        let description = match error.kind() {
            ErrorKind::Auth | ErrorKind::Validation => error.to_string(),
            ErrorKind::Network => action.failure_text().to_string(),
        };
        Self::error(description)
    }

    pub fn for_mutation(mutation: Mutation) -> Option<Self> {
        match mutation {
            Mutation::Created => Some(Self::success("Статья создана")),
            Mutation::Updated => Some(Self::success("Статья обновлена")),
            Mutation::Deleted(_) => Some(Self::success("Статья удалена")),
            Mutation::Cancelled => None,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pm_core::ArticleId;

    #[test]
    fn test_network_failures_are_generic() {
        let notice = Notice::failure(Action::LoadArticles, &Error::network("load articles: 502 Bad Gateway"));
        assert_eq!(notice.description, "Не удалось загрузить статьи");
        assert!(notice.destructive);
        assert_eq!(notice.to_string(), "Ошибка: Не удалось загрузить статьи");
    }

    #[test]
    fn test_validation_keeps_message() {
        let notice = Notice::failure(Action::SaveArticle, &Error::validation("Заполните все обязательные поля"));
        assert_eq!(notice.description, "Заполните все обязательные поля");
    }

    #[test]
    fn test_mutation_notices() {
        assert_eq!(Notice::for_mutation(Mutation::Created).unwrap().description, "Статья создана");
        assert_eq!(Notice::for_mutation(Mutation::Updated).unwrap().description, "Статья обновлена");
        assert_eq!(
            Notice::for_mutation(Mutation::Deleted(ArticleId(1))).unwrap().to_string(),
            "Успешно: Статья удалена"
        );
        assert!(Notice::for_mutation(Mutation::Cancelled).is_none());
    }
}
