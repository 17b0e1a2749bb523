use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use clap::{Parser, Subcommand};
use pm_core::{ArticleId, Category, CategoryFilter};
use pm_storage::StorageKind;

/// Interval written like `5s`, `2m`, `1h30m`; a bare number means seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HumanDuration(pub Duration);

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("Duration must include a number".to_string());
        }

        let mut total = 0u64;
        let mut digits = String::new();
        for c in s.chars() {
            if c.is_ascii_digit() {
                digits.push(c);
                continue;
            }
            let unit = match c {
                's' => 1,
                'm' => 60,
                'h' => 3600,
                _ => return Err(format!("Invalid duration unit: {}", c)),
            };
            let amount: u64 = digits
                .parse()
                .map_err(|_| format!("Missing number before '{}'", c))?;
            total = amount
                .checked_mul(unit)
                .and_then(|secs| total.checked_add(secs))
                .ok_or_else(|| format!("Duration too long: {}", s))?;
            digits.clear();
        }
        if !digits.is_empty() {
            let secs = digits.parse::<u64>().map_err(|e| e.to_string())?;
            total = total
                .checked_add(secs)
                .ok_or_else(|| format!("Duration too long: {}", s))?;
        }

        if total == 0 {
            return Err("Duration must be positive".to_string());
        }
        Ok(HumanDuration(Duration::from_secs(total)))
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Памятка полицейского: справочник статей, закладки и общий чат", long_about = None)]
pub struct Cli {
    /// Auth service URL
    #[arg(long, global = true)]
    pub auth_url: Option<String>,
    /// Articles service URL
    #[arg(long, global = true)]
    pub articles_url: Option<String>,
    /// Bookmarks service URL
    #[arg(long, global = true)]
    pub bookmarks_url: Option<String>,
    /// Chat service URL
    #[arg(long, global = true)]
    pub chat_url: Option<String>,
    /// Where the session is kept: memory or file
    #[arg(long, global = true, default_value = "file")]
    pub storage: StorageKind,
    /// Session file, defaults to the platform data dir
    #[arg(long, global = true)]
    pub session_file: Option<PathBuf>,
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and keep the session
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account and log in
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Search the catalog
    Articles {
        #[arg(short, long, default_value = "")]
        query: String,
        /// all, administrative, rights, laws or documents
        #[arg(short, long, default_value = "all")]
        category: CategoryFilter,
    },
    /// Show one article in full
    Article { id: ArticleId },
    Bookmarks {
        #[command(subcommand)]
        command: BookmarkCommands,
    },
    Chat {
        #[command(subcommand)]
        command: ChatCommands,
    },
    /// Manage articles (administrators only)
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum BookmarkCommands {
    List,
    /// Add the article to bookmarks, or remove it if already there
    Toggle { id: ArticleId },
}

#[derive(Subcommand, Debug)]
pub enum ChatCommands {
    /// Follow the chat until interrupted
    Tail {
        #[arg(long, default_value = "5s")]
        interval: HumanDuration,
    },
    Send { message: Vec<String> },
}

#[derive(Subcommand, Debug)]
pub enum AdminCommands {
    List,
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long, default_value = "administrative")]
        category: Category,
        /// Comma-separated
        #[arg(long, default_value = "")]
        tags: String,
        /// Image file to attach
        #[arg(long)]
        image: Option<PathBuf>,
    },
    Update {
        id: ArticleId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        category: Option<Category>,
        #[arg(long)]
        tags: Option<String>,
        #[arg(long)]
        image: Option<PathBuf>,
    },
    Delete {
        id: ArticleId,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_duration() {
        let secs = |s: &str| s.parse::<HumanDuration>().map(|d| d.0.as_secs());
        assert_eq!(secs("5s"), Ok(5));
        assert_eq!(secs("5"), Ok(5));
        assert_eq!(secs("1m30s"), Ok(90));
        assert_eq!(secs("1h15m"), Ok(4500));
        assert!(secs("").is_err());
        assert!(secs("0s").is_err());
        assert!(secs("5d").is_err());
        assert!(secs("m").is_err());
        assert!(secs("99999999999999999h").is_err());
        assert!(secs("18446744073709551615s1s").is_err());
    }

    #[test]
    fn test_parses_commands() {
        let cli = Cli::try_parse_from([
            "pamyatka", "--storage", "memory", "articles", "--query", "кража", "--category", "laws",
        ])
        .unwrap();
        assert_eq!(cli.storage, StorageKind::Memory);
        match cli.command {
            Commands::Articles { query, category } => {
                assert_eq!(query, "кража");
                assert_eq!(category, CategoryFilter::Only(Category::Laws));
            }
            other => panic!("unexpected command {:?}", other),
        }

        let cli = Cli::try_parse_from(["pamyatka", "chat", "send", "на", "месте"]).unwrap();
        assert!(matches!(cli.command, Commands::Chat { command: ChatCommands::Send { ref message } } if message.len() == 2));

        assert!(Cli::try_parse_from(["pamyatka", "articles", "--category", "misc"]).is_err());
        assert!(Cli::try_parse_from(["pamyatka", "bookmarks", "toggle", "abc"]).is_err());
    }
}
