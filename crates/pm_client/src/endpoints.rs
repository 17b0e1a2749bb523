use std::fmt;

use pm_core::{Error, Result};
use url::Url;

pub const DEFAULT_AUTH_URL: &str = "https://functions.poehali.dev/3c01585e-14a4-42b7-b0e5-9e80dee21074";
pub const DEFAULT_ARTICLES_URL: &str = "https://functions.poehali.dev/ae53e1c2-96ac-4a9e-924e-9692a718ddf1";

/// Base URLs of the four remote services.
///
/// Auth and articles have known production deployments; bookmarks and chat
/// must be supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub auth: Url,
    pub articles: Url,
    pub bookmarks: Option<Url>,
    pub chat: Option<Url>,
}

impl Endpoints {
    pub fn new(
        auth: Option<&str>,
        articles: Option<&str>,
        bookmarks: Option<&str>,
        chat: Option<&str>,
    ) -> Result<Self> {
        Ok(Self {
            auth: parse_url("auth", auth.unwrap_or(DEFAULT_AUTH_URL))?,
            articles: parse_url("articles", articles.unwrap_or(DEFAULT_ARTICLES_URL))?,
            bookmarks: bookmarks.map(|u| parse_url("bookmarks", u)).transpose()?,
            chat: chat.map(|u| parse_url("chat", u)).transpose()?,
        })
    }

    pub fn bookmarks(&self) -> Result<&Url> {
        self.bookmarks
            .as_ref()
            .ok_or_else(|| Error::InvalidUrl("bookmarks service URL is not configured".to_string()))
    }

    pub fn chat(&self) -> Result<&Url> {
        self.chat
            .as_ref()
            .ok_or_else(|| Error::InvalidUrl("chat service URL is not configured".to_string()))
    }
}

impl fmt::Display for Endpoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unset = "<unset>".to_string();
        write!(
            f,
            "auth={} articles={} bookmarks={} chat={}",
            self.auth,
            self.articles,
            self.bookmarks.as_ref().map(Url::to_string).unwrap_or_else(|| unset.clone()),
            self.chat.as_ref().map(Url::to_string).unwrap_or(unset),
        )
    }
}

fn parse_url(service: &str, raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|e| Error::InvalidUrl(format!("{} service URL {:?}: {}", service, raw, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(Error::InvalidUrl(format!(
            "{} service URL must be http(s), got {}",
            service, scheme
        ))),
    }
}
