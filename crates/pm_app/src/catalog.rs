use std::sync::Arc;

use pm_core::{filter, Article, ArticleId, ArticleService, CategoryFilter, Result};

/// Client-side copy of the article list plus the search state of the
/// catalog screen.
pub struct Catalog {
    service: Arc<dyn ArticleService>,
    articles: Vec<Article>,
    query: String,
    category: CategoryFilter,
}

impl Catalog {
    pub fn new(service: Arc<dyn ArticleService>) -> Self {
        Self {
            service,
            articles: Vec::new(),
            query: String::new(),
            category: CategoryFilter::All,
        }
    }

    /// Replaces the cache with the service's list. On failure the previous
    /// cache is kept.
    pub async fn reload(&mut self) -> Result<usize> {
        self.articles = self.service.list().await?;
        tracing::debug!("Catalog holds {} articles", self.articles.len());
        Ok(self.articles.len())
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn get(&self, id: ArticleId) -> Option<&Article> {
        self.articles.iter().find(|article| article.id == id)
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn category(&self) -> CategoryFilter {
        self.category
    }

    pub fn set_category(&mut self, category: CategoryFilter) {
        self.category = category;
    }

    /// Articles passing the current query and category, in service order.
    pub fn visible(&self) -> Vec<&Article> {
        filter(&self.articles, &self.query, self.category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::fakes::{sample_articles, FakeArticles};
    use pm_core::Category;

    #[tokio::test]
    async fn test_reload_and_filter() {
        let service = Arc::new(FakeArticles::with(sample_articles()));
        let mut catalog = Catalog::new(service.clone());
        assert!(catalog.visible().is_empty());

        assert_eq!(catalog.reload().await.unwrap(), 4);
        assert_eq!(catalog.visible().len(), 4);

        catalog.set_category(Category::Administrative.into());
        catalog.set_query("ХУЛИГАН");
        let visible: Vec<ArticleId> = catalog.visible().iter().map(|a| a.id).collect();
        assert_eq!(visible, vec![ArticleId(1)]);

        assert_eq!(catalog.get(ArticleId(3)).unwrap().category, Category::Laws);
        assert!(catalog.get(ArticleId(42)).is_none());
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_cache() {
        let service = Arc::new(FakeArticles::with(sample_articles()));
        let mut catalog = Catalog::new(service.clone());
        catalog.reload().await.unwrap();

        service.fail(true);
        assert!(catalog.reload().await.is_err());
        assert_eq!(catalog.articles().len(), 4);
    }
}
