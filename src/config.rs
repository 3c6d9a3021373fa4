use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_PATH: &str = "config/feed.json";
pub const DEFAULT_SESSION_DB: &str = "data/session.db";
pub const DEFAULT_API_URL: &str = "http://192.168.131.42:8000";

pub const LOGIN_URL_ENV: &str = "FEED_LOGIN_URL";
pub const API_URL_ENV: &str = "FEED_API_URL";

/// Values read from the JSON config file. Everything is optional so a
/// partial file only overrides what it names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub login_url: Option<String>,
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub session_db: Option<String>,
}

/// Values that win over the file (environment and command line, already
/// merged by clap).
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub login_url: Option<String>,
    pub api_url: Option<String>,
    pub session_db: Option<String>,
}

/// Where the REST API lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiEndpoints {
    /// Full URL of the login endpoint. Required only for `login`.
    pub login_url: Option<String>,
    /// Base URL for `/posts`, without trailing slash.
    pub api_url: String,
}

impl ApiEndpoints {
    pub fn new(login_url: Option<String>, api_url: impl Into<String>) -> Self {
        let api_url = api_url.into();
        let api_url = api_url.strip_suffix('/').unwrap_or(&api_url).to_string();
        Self {
            login_url: login_url.filter(|url| !url.trim().is_empty()),
            api_url,
        }
    }

    pub fn posts_url(&self) -> String {
        format!("{}/posts", self.api_url)
    }

    pub fn post_url(&self, id: i64) -> String {
        format!("{}/posts/{id}", self.api_url)
    }
}

/// Fully resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub endpoints: ApiEndpoints,
    pub session_db: String,
}

impl Settings {
    pub fn resolve(file: AppConfig, overrides: Overrides) -> Self {
        let login_url = overrides.login_url.or(file.login_url);
        let api_url = overrides
            .api_url
            .or(file.api_url)
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let session_db = overrides
            .session_db
            .or(file.session_db)
            .unwrap_or_else(|| DEFAULT_SESSION_DB.to_string());

        Self {
            endpoints: ApiEndpoints::new(login_url, api_url),
            session_db,
        }
    }
}

pub fn load_config(path: &str) -> AppConfig {
    let path = Path::new(path);
    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<AppConfig>(&content) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Failed to parse config file {}: {err}", path.display());
                AppConfig::default()
            }
        },
        Err(err) => {
            log::info!(
                "Config file {} not found ({err}); using defaults",
                path.display()
            );
            AppConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_stripped() {
        let endpoints = ApiEndpoints::new(None, "http://api.local/");
        assert_eq!(endpoints.posts_url(), "http://api.local/posts");
        assert_eq!(endpoints.post_url(7), "http://api.local/posts/7");
    }

    #[test]
    fn blank_login_url_counts_as_missing() {
        let endpoints = ApiEndpoints::new(Some("  ".into()), "http://api.local");
        assert_eq!(endpoints.login_url, None);
    }

    #[test]
    fn overrides_win_over_file() {
        let file = AppConfig {
            login_url: Some("http://file/login".into()),
            api_url: Some("http://file".into()),
            session_db: None,
        };
        let overrides = Overrides {
            api_url: Some("http://flag".into()),
            ..Overrides::default()
        };
        let settings = Settings::resolve(file, overrides);
        assert_eq!(
            settings.endpoints.login_url.as_deref(),
            Some("http://file/login")
        );
        assert_eq!(settings.endpoints.api_url, "http://flag");
        assert_eq!(settings.session_db, DEFAULT_SESSION_DB);
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let settings = Settings::resolve(AppConfig::default(), Overrides::default());
        assert_eq!(settings.endpoints.api_url, DEFAULT_API_URL);
        assert_eq!(settings.endpoints.login_url, None);
    }

    #[test]
    fn unreadable_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feed.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_config(path.to_str().unwrap()), AppConfig::default());
        assert_eq!(load_config("does/not/exist.json"), AppConfig::default());
    }

    #[test]
    fn partial_config_file_parses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feed.json");
        std::fs::write(&path, r#"{"login_url":"http://auth/login"}"#).unwrap();
        let config = load_config(path.to_str().unwrap());
        assert_eq!(config.login_url.as_deref(), Some("http://auth/login"));
        assert_eq!(config.api_url, None);
    }
}
