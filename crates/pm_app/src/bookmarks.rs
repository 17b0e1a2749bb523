use std::collections::BTreeSet;
use std::sync::Arc;

use pm_core::{Article, ArticleId, BookmarkService, Result};

use crate::session::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Added,
    Removed,
    /// Nobody is logged in, nothing was sent.
    Skipped,
}

/// Local mirror of the current user's bookmark set.
///
/// Updates are confirm-after: the set only changes once the service has
/// accepted the add or remove. Two overlapping toggles on the same article
/// race, and whichever response lands last decides the local state.
pub struct BookmarkSync {
    service: Arc<dyn BookmarkService>,
    session: Arc<SessionStore>,
    ids: BTreeSet<ArticleId>,
}

impl BookmarkSync {
    pub fn new(service: Arc<dyn BookmarkService>, session: Arc<SessionStore>) -> Self {
        Self {
            service,
            session,
            ids: BTreeSet::new(),
        }
    }

    /// Replaces the local set with the service's. Without a user the set is
    /// simply emptied.
    pub async fn load(&mut self) -> Result<usize> {
        let Some(user) = self.session.current_user().await? else {
            self.ids.clear();
            return Ok(0);
        };
        self.ids = self.service.list(user.id).await?.into_iter().collect();
        tracing::debug!("Loaded {} bookmarks for {}", self.ids.len(), user.username);
        Ok(self.ids.len())
    }

    pub async fn toggle(&mut self, article_id: ArticleId) -> Result<Toggle> {
        if !self.session.is_authenticated().await? {
            return Ok(Toggle::Skipped);
        }
        let Some(user) = self.session.current_user().await? else {
            return Ok(Toggle::Skipped);
        };

        if self.ids.contains(&article_id) {
            self.service.remove(user.id, article_id).await?;
            self.ids.remove(&article_id);
            tracing::debug!("Bookmark {} removed", article_id);
            Ok(Toggle::Removed)
        } else {
            self.service.add(user.id, article_id).await?;
            self.ids.insert(article_id);
            tracing::debug!("Bookmark {} added", article_id);
            Ok(Toggle::Added)
        }
    }

    pub fn is_bookmarked(&self, article_id: ArticleId) -> bool {
        self.ids.contains(&article_id)
    }

    pub fn ids(&self) -> impl Iterator<Item = ArticleId> + '_ {
        self.ids.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Bookmarked articles in catalog order.
    pub fn bookmarked<'a>(&self, articles: &'a [Article]) -> Vec<&'a Article> {
        articles.iter().filter(|a| self.ids.contains(&a.id)).collect()
    }

    /// Drops ids that no longer exist in the catalog, returning how many went.
    pub fn retain_known(&mut self, articles: &[Article]) -> usize {
        let before = self.ids.len();
        self.ids.retain(|id| articles.iter().any(|a| a.id == *id));
        before - self.ids.len()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}
