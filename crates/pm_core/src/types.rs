use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::de;
use crate::Error;

macro_rules! numeric_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                de::flexible_i64(deserializer).map($name)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim()
                    .parse()
                    .map($name)
                    .map_err(|_| Error::validation(format!("Некорректный идентификатор: {}", s)))
            }
        }
    };
}

numeric_id!(UserId);
numeric_id!(ArticleId);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub is_admin: bool,
}

/// Proof of authentication held by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Administrative,
    Rights,
    Laws,
    Documents,
    /// Anything the content service sends that this client does not know yet.
    #[serde(other)]
    Unknown,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Administrative,
        Category::Rights,
        Category::Laws,
        Category::Documents,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Administrative => "administrative",
            Category::Rights => "rights",
            Category::Laws => "laws",
            Category::Documents => "documents",
            Category::Unknown => "unknown",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Administrative => "Административная практика",
            Category::Rights => "Права",
            Category::Laws => "Законы",
            Category::Documents => "Документы",
            Category::Unknown => "Прочее",
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Administrative
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::validation(format!("Неизвестная категория: {}", s)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    pub content: String,
    pub category: Category,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "de::opt_timestamp", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de::opt_timestamp", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(deserialize_with = "de::flexible_i64")]
    pub id: i64,
    pub username: String,
    pub message: String,
    #[serde(deserialize_with = "de::timestamp")]
    pub created_at: DateTime<Utc>,
}
