pub mod admin;
pub mod bookmarks;
pub mod catalog;
pub mod chat;
pub mod forms;
pub mod notice;
pub mod session;


pub use admin::{AdminEditor, ArticleForm, Confirm, Dialog, EditorMode, ImageAttachment, Mutation};
pub use bookmarks::{BookmarkSync, Toggle};
pub use catalog::Catalog;
pub use chat::{ChatPoller, ChatRoom, SendOutcome, POLL_INTERVAL};
pub use forms::{LoginForm, RegisterForm};
pub use notice::{Action, Notice};
pub use session::SessionStore;

pub mod prelude {
    pub use super::{AdminEditor, BookmarkSync, Catalog, ChatRoom, Notice, SessionStore};
    pub use pm_core::{Article, ArticleId, Error, Result};
}
