use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::common::{ApiCommand, Password, PostId};
use crate::feed::controller::{EMPTY_COMMENT_MESSAGE, EMPTY_POST_MESSAGE, non_empty};

/// Login form fields and status.
#[derive(Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub submitting: bool,
    pub error: Option<String>,
}

impl LoginForm {
    pub fn submit(&mut self) -> Option<ApiCommand> {
        if self.submitting {
            return None;
        }
        self.error = None;
        if self.username.trim().is_empty() || self.password.is_empty() {
            self.error = Some("Username and password are required".to_string());
            return None;
        }
        self.submitting = true;
        Some(ApiCommand::Login {
            username: self.username.trim().to_string(),
            password: Password::new(self.password.clone()),
        })
    }

    pub fn succeeded(&mut self) {
        self.submitting = false;
        self.password.clear();
    }

    pub fn failed(&mut self, message: String) {
        self.submitting = false;
        self.error = Some(message);
    }
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("username", &self.username)
            .field("password", &"***")
            .field("submitting", &self.submitting)
            .field("error", &self.error)
            .finish()
    }
}

/// New-post composer.
#[derive(Debug, Default)]
pub struct Composer {
    pub content: String,
    pub submitting: bool,
    pub error: Option<String>,
}

impl Composer {
    pub fn can_submit(&self) -> bool {
        !self.submitting && !self.content.trim().is_empty()
    }

    pub fn submit(&mut self) -> Option<ApiCommand> {
        if self.submitting {
            return None;
        }
        self.error = None;
        match non_empty(&self.content, EMPTY_POST_MESSAGE) {
            Ok(content) => {
                let content = content.to_string();
                self.submitting = true;
                Some(ApiCommand::CreatePost { content })
            }
            Err(err) => {
                self.error = Some(err.to_string());
                None
            }
        }
    }

    pub fn succeeded(&mut self) {
        self.submitting = false;
        self.content.clear();
    }

    pub fn failed(&mut self, message: String) {
        self.submitting = false;
        self.error = Some(message);
    }
}

/// Per-post comment inputs.
#[derive(Debug, Default)]
pub struct CommentBoxes {
    pub drafts: HashMap<PostId, String>,
    pub submitting: HashSet<PostId>,
    pub errors: HashMap<PostId, String>,
}

impl CommentBoxes {
    pub fn draft_mut(&mut self, post_id: PostId) -> &mut String {
        self.drafts.entry(post_id).or_default()
    }

    pub fn is_submitting(&self, post_id: PostId) -> bool {
        self.submitting.contains(&post_id)
    }

    pub fn error(&self, post_id: PostId) -> Option<&str> {
        self.errors.get(&post_id).map(String::as_str)
    }

    /// Validated comment text for `post_id`, marking it as in flight.
    pub fn submit(&mut self, post_id: PostId) -> Option<String> {
        if self.is_submitting(post_id) {
            return None;
        }
        let draft = self.drafts.get(&post_id).map(String::as_str).unwrap_or("");
        match non_empty(draft, EMPTY_COMMENT_MESSAGE) {
            Ok(content) => {
                let content = content.to_string();
                self.errors.remove(&post_id);
                self.submitting.insert(post_id);
                Some(content)
            }
            Err(err) => {
                self.errors.insert(post_id, err.to_string());
                None
            }
        }
    }

    pub fn succeeded(&mut self, post_id: PostId) {
        self.submitting.remove(&post_id);
        self.drafts.remove(&post_id);
    }

    pub fn failed(&mut self, post_id: PostId, message: String) {
        self.submitting.remove(&post_id);
        self.errors.insert(post_id, message);
    }
}

/// Local UI state that is not part of the feed itself.
#[derive(Debug, Default)]
pub struct AppState {
    pub login: LoginForm,
    pub composer: Composer,
    pub comments: CommentBoxes,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything typed into the feed view.
    pub fn reset_feed_inputs(&mut self) {
        self.composer = Composer::default();
        self.comments = CommentBoxes::default();
    }
}
