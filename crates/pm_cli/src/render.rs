//! Plain-text screens.

use chrono::Local;
use pm_core::{Article, ChatMessage, User};

const PREVIEW_CHARS: usize = 120;

fn preview(content: &str) -> String {
    let mut chars = content.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{}…", head)
    } else {
        head
    }
}

fn tag_line(tags: &[String]) -> String {
    tags.iter().map(|t| format!("#{}", t)).collect::<Vec<_>>().join(" ")
}

pub fn article_row(article: &Article, bookmarked: bool) -> String {
    let mark = if bookmarked { "★" } else { " " };
    let mut row = format!("{} [{}] {} — {}", mark, article.id, article.title, article.category.label());
    if !article.tags.is_empty() {
        row.push_str(&format!("\n      {}", tag_line(&article.tags)));
    }
    row.push_str(&format!("\n      {}", preview(&article.content)));
    row
}

pub fn article_list(articles: &[&Article], is_bookmarked: impl Fn(&Article) -> bool, empty: &str) -> String {
    if articles.is_empty() {
        return empty.to_string();
    }
    articles
        .iter()
        .map(|&a| article_row(a, is_bookmarked(a)))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn article_full(article: &Article) -> String {
    let mut out = format!("{}\n{}\n", article.title, article.category.label());
    if !article.tags.is_empty() {
        out.push_str(&tag_line(&article.tags));
        out.push('\n');
    }
    if let Some(url) = &article.image_url {
        out.push_str(&format!("Изображение: {}\n", url));
    }
    out.push('\n');
    out.push_str(&article.content);
    out
}

pub fn user(user: &User) -> String {
    let role = if user.is_admin { "администратор" } else { "сотрудник" };
    format!("{} <{}> ({}, id {})", user.username, user.email, role, user.id)
}

pub fn chat_line(message: &ChatMessage) -> String {
    format!(
        "{} {}: {}",
        message.created_at.with_timezone(&Local).format("%H:%M"),
        message.username,
        message.message
    )
}
