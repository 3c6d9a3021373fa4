use super::types::{AuthToken, Post, PostId};

/// Completions the network worker reports back to the UI.
#[derive(Debug, Clone)]
pub enum ApiEvent {
    LoggedIn(AuthToken),
    LoginFailed(String),
    PostsLoaded(Vec<Post>),
    PostsFailed(String),
    PostCreated(Post),
    PostCreateFailed(String),
    PostUpdated { post_id: PostId, post: Post },
    PostUpdateFailed { post_id: PostId, message: String },
}
