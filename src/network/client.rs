use std::fmt;

use reqwest::header::CONTENT_TYPE;
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::auth::Session;
use crate::common::types::{Credentials, NewPost};
use crate::common::{AuthToken, LoginResponse, Password, Post, TokenGrant};
use crate::config::{ApiEndpoints, LOGIN_URL_ENV};
use crate::error::{ClientError, ClientResult};

/// The four REST calls, used to label synthesized error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Login,
    FetchPosts,
    CreatePost,
    UpdatePost,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Login => "Login",
            Operation::FetchPosts => "Fetch posts",
            Operation::CreatePost => "Create post",
            Operation::UpdatePost => "Update post",
        })
    }
}

/// Thin client over the feed REST API. Cheap to clone.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    endpoints: ApiEndpoints,
    session: Session,
}

impl ApiClient {
    pub fn new(endpoints: ApiEndpoints, session: Session) -> Self {
        Self::with_http(reqwest::Client::new(), endpoints, session)
    }

    pub fn with_http(http: reqwest::Client, endpoints: ApiEndpoints, session: Session) -> Self {
        Self {
            http,
            endpoints,
            session,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn endpoints(&self) -> &ApiEndpoints {
        &self.endpoints
    }

    /// Exchanges credentials for a token. Does not store it.
    pub async fn login(&self, username: &str, password: &Password) -> ClientResult<AuthToken> {
        let url = self.endpoints.login_url.as_deref().ok_or_else(|| {
            ClientError::Config(format!("{LOGIN_URL_ENV} is not configured"))
        })?;

        log::debug!("POST {url} (login as {username})");
        let response = self
            .http
            .post(url)
            .json(&Credentials {
                username,
                password: password.expose(),
            })
            .send()
            .await?;
        let response = ensure_success(response, Operation::Login).await?;

        let body: serde_json::Value = decode(response).await?;
        serde_json::from_value::<LoginResponse>(body)
            .ok()
            .and_then(LoginResponse::grant)
            .map(TokenGrant::into_token)
            .ok_or_else(|| {
                ClientError::ResponseShape("Login response did not include a token".to_string())
            })
    }

    pub async fn list_posts(&self) -> ClientResult<Vec<Post>> {
        let url = self.endpoints.posts_url();
        log::debug!("GET {url}");
        let response = self.authorized(self.http.get(&url)).send().await?;
        let response = ensure_success(response, Operation::FetchPosts).await?;
        decode(response).await
    }

    pub async fn create_post(&self, content: &str) -> ClientResult<Post> {
        let url = self.endpoints.posts_url();
        log::debug!("POST {url}");
        let response = self
            .authorized(self.http.post(&url))
            .json(&NewPost { content })
            .send()
            .await?;
        let response = ensure_success(response, Operation::CreatePost).await?;
        decode(response).await
    }

    /// Sends the full post, comments included, and returns the server's copy.
    pub async fn update_post(&self, post: &Post) -> ClientResult<Post> {
        let url = self.endpoints.post_url(post.id);
        log::debug!("PUT {url} ({} comments)", post.comments.len());
        let response = self
            .authorized(self.http.put(&url))
            .json(post)
            .send()
            .await?;
        let response = ensure_success(response, Operation::UpdatePost).await?;
        decode(response).await
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder.header(CONTENT_TYPE, "application/json");
        match self.session.token() {
            Some(token) => builder.bearer_auth(token.as_str()),
            None => builder,
        }
    }
}

async fn ensure_success(response: Response, operation: Operation) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.bytes().await.unwrap_or_default();
    let message = server_message(&body)
        .unwrap_or_else(|| format!("{operation} failed with status {}", status.as_u16()));
    log::warn!("{operation} returned {status}: {message}");

    Err(ClientError::Http {
        status: status.as_u16(),
        message,
    })
}

/// The `message` field of a JSON error body, when there is a usable one.
fn server_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value
        .get("message")?
        .as_str()
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}

async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|err| ClientError::Decode(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_needs_a_non_empty_string() {
        assert_eq!(
            server_message(br#"{"message":"unauthorized"}"#).as_deref(),
            Some("unauthorized")
        );
        assert_eq!(server_message(br#"{"message":""}"#), None);
        assert_eq!(server_message(br#"{"message":42}"#), None);
        assert_eq!(server_message(br#"{"detail":"nope"}"#), None);
        assert_eq!(server_message(b"<html>502</html>"), None);
        assert_eq!(server_message(b""), None);
    }

    #[test]
    fn operation_labels() {
        assert_eq!(Operation::Login.to_string(), "Login");
        assert_eq!(Operation::FetchPosts.to_string(), "Fetch posts");
        assert_eq!(Operation::CreatePost.to_string(), "Create post");
        assert_eq!(Operation::UpdatePost.to_string(), "Update post");
    }
}
