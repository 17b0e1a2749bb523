//! Create, edit and delete articles from the admin screen.
//!
//! The editor dialog moves `Closed -> Open(create) / Open(edit) -> Closed`.
//! Successful submits and cancels close it and drop the form; a failed
//! submit keeps it open so nothing typed is lost. After every successful
//! mutation the article list is fetched again instead of patched locally.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use pm_core::{join_tags, parse_tags, Article, ArticleDraft, ArticleId, ArticleService, Category, Error, Result};

pub const DELETE_PROMPT: &str = "Удалить статью?";
pub const MISSING_FIELDS: &str = "Заполните все обязательные поля";
pub const DEFAULT_IMAGE_NAME: &str = "image.jpg";
pub const CATEGORY_REQUIRED: &str = "Выберите категорию статьи";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Editor form fields as typed; tags stay a comma-separated string until submit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArticleForm {
    pub title: String,
    pub content: String,
    pub category: Category,
    pub tags: String,
    pub image: Option<ImageAttachment>,
}

impl ArticleForm {
    pub fn from_article(article: &Article) -> Self {
        Self {
            title: article.title.clone(),
            content: article.content.clone(),
            category: article.category,
            tags: join_tags(&article.tags),
            image: None,
        }
    }

    pub fn to_draft(&self) -> Result<ArticleDraft> {
        if self.title.trim().is_empty() || self.content.trim().is_empty() {
            return Err(Error::validation(MISSING_FIELDS));
        }
        // An unrecognised wire value cannot be written back as-is.
        if self.category == Category::Unknown {
            return Err(Error::validation(CATEGORY_REQUIRED));
        }
        let (image, filename) = match &self.image {
            Some(attachment) => {
                let filename = if attachment.filename.trim().is_empty() {
                    DEFAULT_IMAGE_NAME.to_string()
                } else {
                    attachment.filename.clone()
                };
                (Some(BASE64.encode(&attachment.bytes)), Some(filename))
            }
            None => (None, None),
        };
        Ok(ArticleDraft {
            title: self.title.clone(),
            content: self.content.clone(),
            category: self.category,
            tags: parse_tags(&self.tags),
            image,
            filename,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit(ArticleId),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Dialog {
    #[default]
    Closed,
    Open { mode: EditorMode, form: ArticleForm },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Created,
    Updated,
    Deleted(ArticleId),
    /// Delete declined at the confirmation prompt.
    Cancelled,
}

/// Asks the operator a yes/no question before a destructive action.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

pub struct AdminEditor {
    service: Arc<dyn ArticleService>,
    articles: Vec<Article>,
    dialog: Dialog,
}

impl AdminEditor {
    pub fn new(service: Arc<dyn ArticleService>) -> Self {
        Self {
            service,
            articles: Vec::new(),
            dialog: Dialog::Closed,
        }
    }

    pub async fn reload(&mut self) -> Result<usize> {
        self.articles = self.service.list().await?;
        Ok(self.articles.len())
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn dialog(&self) -> &Dialog {
        &self.dialog
    }

    pub fn is_open(&self) -> bool {
        matches!(self.dialog, Dialog::Open { .. })
    }

    pub fn open_create(&mut self) {
        self.dialog = Dialog::Open {
            mode: EditorMode::Create,
            form: ArticleForm::default(),
        };
    }

    /// Opens the dialog prefilled from a loaded article.
    pub fn edit(&mut self, id: ArticleId) -> Result<()> {
        let article = self
            .articles
            .iter()
            .find(|a| a.id == id)
            .ok_or_else(|| Error::validation(format!("Статья {} не найдена", id)))?;
        self.dialog = Dialog::Open {
            mode: EditorMode::Edit(id),
            form: ArticleForm::from_article(article),
        };
        Ok(())
    }

    pub fn form_mut(&mut self) -> Option<&mut ArticleForm> {
        match &mut self.dialog {
            Dialog::Open { form, .. } => Some(form),
            Dialog::Closed => None,
        }
    }

    pub fn close(&mut self) {
        self.dialog = Dialog::Closed;
    }

    pub async fn submit(&mut self) -> Result<Mutation> {
        let Dialog::Open { mode, form } = &self.dialog else {
            return Err(Error::validation("Форма редактирования не открыта"));
        };
        let mode = *mode;
        let draft = form.to_draft()?;

        let mutation = match mode {
            EditorMode::Create => {
                self.service.create(&draft).await?;
                Mutation::Created
            }
            EditorMode::Edit(id) => {
                self.service.update(id, &draft).await?;
                Mutation::Updated
            }
        };
        self.dialog = Dialog::Closed;
        self.reload_after(mutation).await;
        Ok(mutation)
    }

    /// Deletes after `confirm` agrees; a refusal sends nothing.
    pub async fn delete(&mut self, id: ArticleId, confirm: &dyn Confirm) -> Result<Mutation> {
        if !confirm.confirm(DELETE_PROMPT) {
            return Ok(Mutation::Cancelled);
        }
        self.service.delete(id).await?;
        let mutation = Mutation::Deleted(id);
        self.reload_after(mutation).await;
        Ok(mutation)
    }

    async fn reload_after(&mut self, mutation: Mutation) {
        if let Err(e) = self.reload().await {
            tracing::warn!("Article list reload after {:?} failed: {}", mutation, e);
        }
    }
}
