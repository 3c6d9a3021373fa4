use std::io::Write;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::auth::{MemoryTokenStore, Session, guard_feed};
use crate::common::{Password, Post, PostId};
use crate::config::{self, API_URL_ENV, LOGIN_URL_ENV, Overrides, Settings};
use crate::error::{ClientError, ClientResult};
use crate::feed::FeedController;
use crate::network::ApiClient;
use crate::storage::{self, SqliteTokenStore};
use crate::ui::components::post_list::format_timestamp;

#[derive(Parser, Debug)]
#[command(
    name = "rust_feed_client",
    version,
    about = "Desktop and command-line client for the feed API"
)]
pub struct Cli {
    /// Path to JSON config file
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH, value_name = "FILE")]
    pub config: String,
    /// Full URL of the login endpoint
    #[arg(long, env = LOGIN_URL_ENV, value_name = "URL")]
    pub login_url: Option<String>,
    /// Base URL of the posts API
    #[arg(long, env = API_URL_ENV, value_name = "URL")]
    pub api_url: Option<String>,
    /// Where the session token is persisted
    #[arg(long, value_name = "FILE")]
    pub session_db: Option<String>,
    /// Keep the session token in memory only
    #[arg(long)]
    pub ephemeral: bool,
    /// Run a single command instead of opening the window
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Sign in and store the session token
    Login {
        #[arg(long, short)]
        username: String,
        #[arg(long, short, env = "FEED_PASSWORD", hide_env_values = true)]
        password: Password,
    },
    /// Forget the stored session token
    Logout,
    /// Print the feed
    Posts,
    /// Publish a new post
    Post { content: String },
    /// Comment on an existing post
    Comment { post_id: PostId, content: String },
}

impl Cli {
    pub fn settings(&self) -> Settings {
        let file = config::load_config(&self.config);
        Settings::resolve(
            file,
            Overrides {
                login_url: self.login_url.clone(),
                api_url: self.api_url.clone(),
                session_db: self.session_db.clone(),
            },
        )
    }

    pub fn open_session(&self, settings: &Settings) -> ClientResult<Session> {
        if self.ephemeral {
            return Ok(Session::new(Arc::new(MemoryTokenStore::new())));
        }
        storage::ensure_parent_dir(&settings.session_db)?;
        let store = SqliteTokenStore::with_path(&settings.session_db)?;
        log::debug!("Session store at {}", settings.session_db);
        Ok(Session::new(Arc::new(store)))
    }
}

/// Runs one headless command, writing human-readable output to `out`.
pub async fn run_command(
    command: Command,
    client: &ApiClient,
    out: &mut impl Write,
) -> ClientResult<()> {
    let session = client.session();

    match command {
        Command::Login { username, password } => {
            let token = client.login(&username, &password).await?;
            session.store(&token)?;
            writeln!(out, "Signed in as {username}.")?;
        }
        Command::Logout => {
            session.sign_out()?;
            writeln!(out, "Signed out.")?;
        }
        Command::Posts => {
            require_session(session)?;
            let mut feed = FeedController::new();
            feed.load(client).await?;
            if feed.posts().is_empty() {
                writeln!(out, "No posts yet.")?;
            }
            for post in feed.posts() {
                write_post(out, post)?;
            }
        }
        Command::Post { content } => {
            require_session(session)?;
            let mut feed = FeedController::new();
            let post = feed.create_post(client, &content).await?;
            writeln!(out, "Created post #{}.", post.id)?;
        }
        Command::Comment { post_id, content } => {
            require_session(session)?;
            let mut feed = FeedController::new();
            feed.load(client).await?;
            match feed.add_comment(client, post_id, &content).await? {
                Some(post) => writeln!(
                    out,
                    "Comment added to post #{} ({} comments).",
                    post.id,
                    post.comments.len()
                )?,
                None => {
                    return Err(ClientError::Validation(format!(
                        "Post #{post_id} is not in the feed"
                    )));
                }
            }
        }
    }

    Ok(())
}

fn require_session(session: &Session) -> ClientResult<()> {
    match guard_feed(session) {
        Some(_) => Err(ClientError::NotSignedIn),
        None => Ok(()),
    }
}

fn write_post(out: &mut impl Write, post: &Post) -> std::io::Result<()> {
    let stamp = format_timestamp(post.created_at.as_deref());
    if stamp.is_empty() {
        writeln!(out, "#{} {}", post.id, post.content)?;
    } else {
        writeln!(out, "#{} [{stamp}] {}", post.id, post.content)?;
    }
    for comment in &post.comments {
        writeln!(out, "    - {}", comment.content)?;
    }
    Ok(())
}
