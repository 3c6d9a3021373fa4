use chrono::Utc;

use crate::common::{Comment, Post, PostId};
use crate::error::{ClientError, ClientResult};
use crate::network::ApiClient;

pub const EMPTY_POST_MESSAGE: &str = "Post content cannot be empty";
pub const EMPTY_COMMENT_MESSAGE: &str = "Comment cannot be empty";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedState {
    Loading,
    Error(String),
    Ready,
}

/// In-memory feed plus its load status.
///
/// Created posts are merged at the head and saved posts replace their local
/// copy; nothing triggers a re-fetch. Comments are echoed locally before the
/// server confirms them and stay visible if the update fails.
#[derive(Debug)]
pub struct FeedController {
    state: FeedState,
    posts: Vec<Post>,
}

impl Default for FeedController {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedController {
    pub fn new() -> Self {
        Self {
            state: FeedState::Loading,
            posts: Vec::new(),
        }
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn post(&self, post_id: PostId) -> Option<&Post> {
        self.posts.iter().find(|post| post.id == post_id)
    }

    pub fn begin_load(&mut self) {
        self.state = FeedState::Loading;
    }

    /// Re-enters `Loading` from `Error`. Returns whether a reload is due.
    pub fn retry(&mut self) -> bool {
        if matches!(self.state, FeedState::Error(_)) {
            self.begin_load();
            true
        } else {
            false
        }
    }

    pub fn finish_load(&mut self, result: Result<Vec<Post>, String>) {
        match result {
            Ok(posts) => {
                log::info!("Feed loaded with {} posts", posts.len());
                self.posts = posts;
                self.state = FeedState::Ready;
            }
            Err(message) => {
                log::warn!("Feed load failed: {message}");
                self.state = FeedState::Error(message);
            }
        }
    }

    /// Puts a freshly created post at the head of the feed.
    pub fn insert_created(&mut self, post: Post) -> &Post {
        self.posts.insert(0, post.normalized(Utc::now()));
        &self.posts[0]
    }

    /// Appends an optimistic comment to `post_id` and returns the full post
    /// to send to the server, or `None` when the post is not in the feed.
    pub fn stage_comment(&mut self, post_id: PostId, content: &str) -> Option<Post> {
        let post = self.posts.iter_mut().find(|post| post.id == post_id)?;
        post.comments.push(Comment::optimistic(content, Utc::now()));
        Some(post.clone())
    }

    /// Replaces the local copy of `post_id` with the server's version.
    pub fn apply_saved(&mut self, post_id: PostId, saved: Post) -> Option<&Post> {
        let index = self.posts.iter().position(|post| post.id == post_id)?;
        self.posts[index] = saved.normalized(Utc::now());
        Some(&self.posts[index])
    }

    pub async fn load(&mut self, client: &ApiClient) -> ClientResult<()> {
        self.begin_load();
        match client.list_posts().await {
            Ok(posts) => {
                self.finish_load(Ok(posts));
                Ok(())
            }
            Err(err) => {
                self.finish_load(Err(err.to_string()));
                Err(err)
            }
        }
    }

    pub async fn create_post(&mut self, client: &ApiClient, content: &str) -> ClientResult<&Post> {
        let content = non_empty(content, EMPTY_POST_MESSAGE)?;
        let post = client.create_post(content).await?;
        Ok(self.insert_created(post))
    }

    /// Echoes the comment locally, then saves the whole post. On failure the
    /// local echo is kept and the error returned.
    pub async fn add_comment(
        &mut self,
        client: &ApiClient,
        post_id: PostId,
        content: &str,
    ) -> ClientResult<Option<&Post>> {
        let content = non_empty(content, EMPTY_COMMENT_MESSAGE)?;
        let Some(updated) = self.stage_comment(post_id, content) else {
            log::debug!("Ignoring comment for unknown post {post_id}");
            return Ok(None);
        };
        let saved = client.update_post(&updated).await?;
        Ok(self.apply_saved(post_id, saved))
    }
}

/// Trims user input, rejecting what is left empty.
pub fn non_empty<'a>(content: &'a str, message: &str) -> ClientResult<&'a str> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        Err(ClientError::Validation(message.to_string()))
    } else {
        Ok(trimmed)
    }
}
