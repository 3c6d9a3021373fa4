use super::events::ApiEvent;
use super::types::{Password, Post};

/// Requests the UI hands to the network worker.
#[derive(Debug, Clone)]
pub enum ApiCommand {
    Login { username: String, password: Password },
    LoadPosts,
    CreatePost { content: String },
    /// Sends the whole post, optimistic comment included.
    UpdatePost(Post),
}

impl ApiCommand {
    pub fn label(&self) -> &'static str {
        match self {
            ApiCommand::Login { .. } => "login",
            ApiCommand::LoadPosts => "load-posts",
            ApiCommand::CreatePost { .. } => "create-post",
            ApiCommand::UpdatePost(_) => "update-post",
        }
    }

    /// The failure event the worker would have sent for this command.
    pub fn into_failure(self, message: String) -> ApiEvent {
        match self {
            ApiCommand::Login { .. } => ApiEvent::LoginFailed(message),
            ApiCommand::LoadPosts => ApiEvent::PostsFailed(message),
            ApiCommand::CreatePost { .. } => ApiEvent::PostCreateFailed(message),
            ApiCommand::UpdatePost(post) => ApiEvent::PostUpdateFailed {
                post_id: post.id,
                message,
            },
        }
    }
}
