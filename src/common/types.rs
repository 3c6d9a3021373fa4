use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub type PostId = i64;

/// A post as held by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub content: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub comments: Vec<Comment>,
}

impl Post {
    /// Fills a missing creation timestamp with `now`.
    pub fn normalized(mut self, now: DateTime<Utc>) -> Self {
        let missing = self
            .created_at
            .as_deref()
            .is_none_or(|value| value.trim().is_empty());
        if missing {
            self.created_at = Some(now.to_rfc3339_opts(SecondsFormat::Millis, true));
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub content: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_id: i64,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Comment {
    /// Local echo of a comment that has not reached the server yet.
    pub fn optimistic(content: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: now.timestamp_millis(),
            content: content.into(),
            user_id: 0,
            created_at: Some(now.to_rfc3339_opts(SecondsFormat::Millis, true)),
        }
    }
}

/// Request body for `POST /posts`.
#[derive(Debug, Clone, Serialize)]
pub struct NewPost<'a> {
    pub content: &'a str,
}

/// Request body for the login endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Raw login response. Backends answer with either `access_token` or
/// `token`; `access_token` wins unless it is missing or empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

impl LoginResponse {
    pub fn grant(self) -> Option<TokenGrant> {
        let non_empty = |value: Option<String>| value.filter(|raw| !raw.is_empty());
        non_empty(self.access_token)
            .map(TokenGrant::AccessToken)
            .or_else(|| non_empty(self.token).map(TokenGrant::Token))
    }
}

/// Which response field the token came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenGrant {
    AccessToken(String),
    Token(String),
}

impl TokenGrant {
    pub fn into_token(self) -> AuthToken {
        match self {
            TokenGrant::AccessToken(raw) | TokenGrant::Token(raw) => AuthToken(raw),
        }
    }
}

/// Login password; never shows up in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

impl FromStr for Password {
    type Err = Infallible;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(raw))
    }
}

/// Opaque bearer credential.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn null_comments_and_timestamp_are_normalized() {
        let post: Post = serde_json::from_str(
            r#"{"id":5,"content":"hello","created_at":null,"comments":null}"#,
        )
        .unwrap();
        assert!(post.comments.is_empty());
        assert_eq!(post.user_id, 0);

        let post = post.normalized(fixed_now());
        assert_eq!(post.created_at.as_deref(), Some("2024-03-01T12:00:00.000Z"));
    }

    #[test]
    fn missing_fields_default() {
        let post: Post = serde_json::from_str(r#"{"id":1,"content":"x"}"#).unwrap();
        assert_eq!(post.comments, Vec::new());
        assert_eq!(post.created_at, None);
    }

    #[test]
    fn existing_timestamp_is_kept() {
        let post = Post {
            id: 1,
            content: "x".into(),
            created_at: Some("2023-01-01T00:00:00".into()),
            user_id: 3,
            comments: Vec::new(),
        };
        let post = post.normalized(fixed_now());
        assert_eq!(post.created_at.as_deref(), Some("2023-01-01T00:00:00"));
    }

    #[test]
    fn optimistic_comment_uses_placeholder_user() {
        let comment = Comment::optimistic("nice", fixed_now());
        assert_eq!(comment.user_id, 0);
        assert_eq!(comment.id, fixed_now().timestamp_millis());
        assert_eq!(comment.content, "nice");
    }

    fn grant(json: &str) -> Option<TokenGrant> {
        serde_json::from_str::<LoginResponse>(json).unwrap().grant()
    }

    #[test]
    fn login_response_accepts_both_shapes() {
        assert_eq!(
            grant(r#"{"access_token":"abc"}"#),
            Some(TokenGrant::AccessToken("abc".into()))
        );
        assert_eq!(grant(r#"{"token":"xyz"}"#), Some(TokenGrant::Token("xyz".into())));
        assert_eq!(
            grant(r#"{"access_token":"first","token":"second"}"#),
            Some(TokenGrant::AccessToken("first".into()))
        );
    }

    #[test]
    fn empty_access_token_falls_back_to_token() {
        assert_eq!(
            grant(r#"{"access_token":"","token":"x"}"#),
            Some(TokenGrant::Token("x".into()))
        );
        assert_eq!(
            grant(r#"{"access_token":null,"token":"y"}"#),
            Some(TokenGrant::Token("y".into()))
        );
    }

    #[test]
    fn login_response_without_usable_token() {
        assert_eq!(grant(r#"{"user":"bob"}"#), None);
        assert_eq!(grant(r#"{"access_token":"","token":""}"#), None);
    }

    #[test]
    fn token_debug_is_redacted() {
        let token = AuthToken::new("secret");
        assert_eq!(format!("{token:?}"), "AuthToken(***)");
        assert_eq!(token.as_str(), "secret");
        assert_eq!(
            TokenGrant::Token("secret".into()).into_token(),
            AuthToken::new("secret")
        );
    }

    #[test]
    fn password_debug_is_redacted() {
        let password: Password = "hunter2".parse().unwrap();
        assert_eq!(format!("{password:?}"), "Password(***)");
        assert_eq!(password.expose(), "hunter2");
    }
}
