use super::session::Session;

/// Top-level views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Feed,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Feed => "/feed",
        }
    }
}

/// Entry to the root view always redirects somewhere.
pub fn resolve_root(session: &Session) -> Route {
    if session.is_authenticated() {
        Route::Feed
    } else {
        Route::Login
    }
}

/// Entry to the feed view: `Some(redirect)` when the visitor has no token.
pub fn guard_feed(session: &Session) -> Option<Route> {
    if session.is_authenticated() {
        None
    } else {
        log::debug!("No session token; redirecting to {}", Route::Login.path());
        Some(Route::Login)
    }
}
