use std::fmt;
use std::str::FromStr;

use crate::types::{Article, Category};
use crate::Error;

/// Category selector of the catalog screen: `all` or a single category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => *c == category,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CategoryFilter::All => "Все",
            CategoryFilter::Only(c) => c.label(),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("all"),
            CategoryFilter::Only(c) => c.fmt(f),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(CategoryFilter::All)
        } else {
            s.parse().map(CategoryFilter::Only)
        }
    }
}

impl From<Category> for CategoryFilter {
    fn from(category: Category) -> Self {
        CategoryFilter::Only(category)
    }
}

/// Case-insensitive substring match over title, content and tags.
pub fn matches_query(article: &Article, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    article.title.to_lowercase().contains(&needle)
        || article.content.to_lowercase().contains(&needle)
        || article.tags.iter().any(|tag| tag.to_lowercase().contains(&needle))
}

/// Articles matching both the category and the query, in input order.
pub fn filter<'a>(articles: &'a [Article], query: &str, category: CategoryFilter) -> Vec<&'a Article> {
    articles
        .iter()
        .filter(|article| category.matches(article.category) && matches_query(article, query))
        .collect()
}
