use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use pm_app::{
    Action, AdminEditor, BookmarkSync, Catalog, ChatRoom, Confirm, ImageAttachment, LoginForm, Notice,
    RegisterForm, SendOutcome, SessionStore, Toggle,
};
use pm_client::{Endpoints, ServiceClients};
use pm_core::{Article, ArticleId, Error, Result};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::cli::{AdminCommands, BookmarkCommands, ChatCommands, Cli, Commands};
use crate::render;

const NOT_LOGGED_IN: &str = "Вы не вошли. Выполните: pamyatka login";
const ADMIN_ONLY: &str = "Доступ только для администраторов";

/// Services and session every command runs against.
pub struct Context {
    pub clients: ServiceClients,
    pub session: Arc<SessionStore>,
}

impl Context {
    pub async fn new(cli: &Cli) -> Result<Self> {
        let endpoints = Endpoints::new(
            cli.auth_url.as_deref(),
            cli.articles_url.as_deref(),
            cli.bookmarks_url.as_deref(),
            cli.chat_url.as_deref(),
        )?;
        debug!("Endpoints: {}", endpoints);
        let clients = ServiceClients::new(endpoints);

        let storage = pm_storage::create_storage(cli.storage, cli.session_file.as_deref()).await?;
        info!("💾 Session storage ready (using {})", cli.storage);
        let session = Arc::new(SessionStore::new(storage, clients.auth()));
        Ok(Self { clients, session })
    }
}

type Outcome = std::result::Result<(), Notice>;

fn fail(action: Action) -> impl FnOnce(Error) -> Notice {
    move |e| Notice::failure(action, &e)
}

fn config(e: Error) -> Notice {
    Notice::error(e.to_string())
}

/// Reads y/n from stdin.
struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        print!("{} [y/N] ", prompt);
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes" | "д" | "да")
    }
}

pub async fn run(command: Commands, ctx: &Context) -> Outcome {
    match command {
        Commands::Login { username, password } => {
            let form = LoginForm { username, password };
            let session = form.submit(&ctx.session).await.map_err(fail(Action::Login))?;
            println!("Вы вошли как {}", render::user(&session.user));
        }
        Commands::Register {
            username,
            email,
            password,
            confirm_password,
        } => {
            let form = RegisterForm {
                username,
                email,
                password,
                confirm_password,
            };
            let session = form.submit(&ctx.session).await.map_err(fail(Action::Register))?;
            println!("Аккаунт создан: {}", render::user(&session.user));
        }
        Commands::Logout => {
            ctx.session.logout().await.map_err(fail(Action::Logout))?;
            println!("Вы вышли из системы");
        }
        Commands::Whoami => match ctx.session.current_user().await.map_err(config)? {
            Some(user) => println!("{}", render::user(&user)),
            None => println!("{}", NOT_LOGGED_IN),
        },
        Commands::Articles { query, category } => {
            let mut catalog = Catalog::new(ctx.clients.articles());
            catalog.reload().await.map_err(fail(Action::LoadArticles))?;
            catalog.set_query(query);
            catalog.set_category(category);

            let marks = optional_bookmarks(ctx).await;
            let visible = catalog.visible();
            println!("{} · найдено {}", catalog.category().label(), visible.len());
            println!(
                "{}",
                render::article_list(
                    &visible,
                    |a| marks.as_ref().map_or(false, |b| b.is_bookmarked(a.id)),
                    "Ничего не найдено",
                )
            );
        }
        Commands::Article { id } => {
            let article = ctx.clients.articles().get(id).await.map_err(fail(Action::LoadArticles))?;
            println!("{}", render::article_full(&article));
        }
        Commands::Bookmarks { command } => bookmarks(command, ctx).await?,
        Commands::Chat { command } => chat(command, ctx).await?,
        Commands::Admin { command } => admin(command, ctx).await?,
    }
    Ok(())
}

/// Bookmark marks for the catalog; missing config or a failed load just
/// means no marks.
async fn optional_bookmarks(ctx: &Context) -> Option<BookmarkSync> {
    let service = ctx.clients.bookmarks().ok()?;
    let mut sync = BookmarkSync::new(service, ctx.session.clone());
    match sync.load().await {
        Ok(_) => Some(sync),
        Err(e) => {
            tracing::warn!("Bookmarks unavailable: {}", e);
            None
        }
    }
}

async fn bookmarks(command: BookmarkCommands, ctx: &Context) -> Outcome {
    if !ctx.session.is_authenticated().await.map_err(config)? {
        return Err(Notice::error(NOT_LOGGED_IN));
    }
    let mut sync = BookmarkSync::new(ctx.clients.bookmarks().map_err(config)?, ctx.session.clone());
    sync.load().await.map_err(fail(Action::LoadBookmarks))?;

    match command {
        BookmarkCommands::List => {
            let mut catalog = Catalog::new(ctx.clients.articles());
            catalog.reload().await.map_err(fail(Action::LoadArticles))?;
            let dropped = sync.retain_known(catalog.articles());
            if dropped > 0 {
                debug!("{} bookmarks point at deleted articles", dropped);
            }
            let saved = sync.bookmarked(catalog.articles());
            println!("Закладки ({})", saved.len());
            println!(
                "{}",
                render::article_list(&saved, |_| true, "Нет сохранённых материалов\nДобавьте закладки для быстрого доступа")
            );
        }
        BookmarkCommands::Toggle { id } => match sync.toggle(id).await.map_err(fail(Action::ToggleBookmark))? {
            Toggle::Added => println!("★ Статья {} добавлена в закладки", id),
            Toggle::Removed => println!("Статья {} удалена из закладок", id),
            Toggle::Skipped => return Err(Notice::error(NOT_LOGGED_IN)),
        },
    }
    Ok(())
}

async fn chat(command: ChatCommands, ctx: &Context) -> Outcome {
    let room = ChatRoom::new(ctx.clients.chat().map_err(config)?, ctx.session.clone());

    match command {
        ChatCommands::Tail { interval } => {
            let mut updates = room.subscribe();
            let poller = room.start(interval.0);
            let mut printed = 0;
            loop {
                tokio::select! {
                    changed = updates.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        printed = print_new_messages(&updates, printed);
                    }
                    _ = tokio::signal::ctrl_c() => break,
                }
            }
            poller.stop();
        }
        ChatCommands::Send { message } => {
            let mut draft = message.join(" ");
            match room.send(&mut draft).await.map_err(fail(Action::SendMessage))? {
                SendOutcome::Sent => {
                    let messages = room.messages();
                    for message in messages.iter().rev().take(5).rev() {
                        println!("{}", render::chat_line(message));
                    }
                }
                SendOutcome::Skipped if draft.trim().is_empty() => {
                    return Err(Notice::error("Пустое сообщение"));
                }
                SendOutcome::Skipped => return Err(Notice::error(NOT_LOGGED_IN)),
            }
        }
    }
    Ok(())
}

/// Prints what arrived since the last update and returns how many messages
/// have been shown. The service only ever appends to the list.
fn print_new_messages(updates: &watch::Receiver<Vec<pm_core::ChatMessage>>, printed: usize) -> usize {
    let messages = updates.borrow();
    for message in unseen(&messages, printed) {
        println!("{}", render::chat_line(message));
    }
    messages.len()
}

fn unseen(messages: &[pm_core::ChatMessage], printed: usize) -> &[pm_core::ChatMessage] {
    messages.get(printed..).unwrap_or_default()
}

async fn admin(command: AdminCommands, ctx: &Context) -> Outcome {
    if !ctx.session.is_admin().await.map_err(config)? {
        return Err(Notice::error(ADMIN_ONLY));
    }
    let mut editor = AdminEditor::new(ctx.clients.articles());

    let mutation = match command {
        AdminCommands::List => {
            editor.reload().await.map_err(fail(Action::LoadArticles))?;
            let articles: Vec<&Article> = editor.articles().iter().collect();
            println!("Статей: {}", articles.len());
            println!("{}", render::article_list(&articles, |_| false, "Статей пока нет"));
            return Ok(());
        }
        AdminCommands::Create {
            title,
            content,
            category,
            tags,
            image,
        } => {
            let attachment = read_image(image.as_deref()).await?;
            editor.open_create();
            if let Some(form) = editor.form_mut() {
                form.title = title;
                form.content = content;
                form.category = category;
                form.tags = tags;
                form.image = attachment;
            }
            editor.submit().await.map_err(fail(Action::SaveArticle))?
        }
        AdminCommands::Update {
            id,
            title,
            content,
            category,
            tags,
            image,
        } => {
            let attachment = read_image(image.as_deref()).await?;
            editor.reload().await.map_err(fail(Action::LoadArticles))?;
            editor.edit(id).map_err(fail(Action::SaveArticle))?;
            if let Some(form) = editor.form_mut() {
                if let Some(title) = title {
                    form.title = title;
                }
                if let Some(content) = content {
                    form.content = content;
                }
                if let Some(category) = category {
                    form.category = category;
                }
                if let Some(tags) = tags {
                    form.tags = tags;
                }
                form.image = attachment;
            }
            editor.submit().await.map_err(fail(Action::SaveArticle))?
        }
        AdminCommands::Delete { id, yes } => delete(&mut editor, id, yes).await?,
    };

    match Notice::for_mutation(mutation) {
        Some(notice) => println!("{}", notice),
        None => println!("Отменено"),
    }
    Ok(())
}

async fn delete(editor: &mut AdminEditor, id: ArticleId, yes: bool) -> std::result::Result<pm_app::Mutation, Notice> {
    let result = if yes {
        editor.delete(id, &|_: &str| true).await
    } else {
        editor.delete(id, &StdinConfirm).await
    };
    result.map_err(fail(Action::DeleteArticle))
}

async fn read_image(path: Option<&Path>) -> std::result::Result<Option<ImageAttachment>, Notice> {
    let Some(path) = path else {
        return Ok(None);
    };
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| Notice::error(format!("Не удалось прочитать {}: {}", path.display(), e)))?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(Some(ImageAttachment { filename, bytes }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pm_core::ChatMessage;

    fn message(id: i64, text: &str) -> ChatMessage {
        ChatMessage {
            id,
            username: "officer1".to_string(),
            message: text.to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_unseen_follows_position_not_id() {
        let mut messages = vec![message(10, "первое"), message(11, "второе")];
        assert_eq!(unseen(&messages, 0).len(), 2);
        assert!(unseen(&messages, 2).is_empty());

        // A later message with a lower id is still shown.
        messages.push(message(3, "позднее"));
        let fresh = unseen(&messages, 2);
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].message, "позднее");

        assert!(unseen(&messages[..1], 2).is_empty());
    }
}
