pub mod de;
pub mod error;
pub mod filter;
pub mod services;
pub mod storage;
pub mod tags;
pub mod types;

pub use error::{Error, ErrorKind, Result};
pub use filter::{filter, CategoryFilter};
pub use services::{
    ArticleDraft, ArticleService, AuthAction, AuthRequest, AuthResponse, AuthService, BookmarkService,
    ChatService, NewChatMessage, ServiceError,
};
pub use storage::SessionStorage;
pub use tags::{join_tags, parse_tags};
pub use types::{Article, ArticleId, Category, ChatMessage, Session, User, UserId};

pub mod prelude {
    pub use super::{Article, ArticleId, Category, ChatMessage, Error, Result, Session, User, UserId};
}
