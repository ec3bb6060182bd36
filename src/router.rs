//! Route table for the hash-based SPA navigation.
//!
//! Route names live in the URL fragment (`#dashboard`). Unknown names fall
//! back to the home view; protected routes are gated on a stored session
//! before any rendering starts.

use std::cell::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Explore,
    Dashboard,
}

pub const PROTECTED_ROUTES: &[Route] = &[Route::Dashboard];

impl Route {
    /// Route-name lookup with home fallback for unknown names.
    pub fn resolve(name: &str) -> Route {
        match name {
            "" | "/" | "home" => Route::Home,
            "explorar" => Route::Explore,
            "dashboard" => Route::Dashboard,
            _ => Route::Home,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Home => "home",
            Route::Explore => "explorar",
            Route::Dashboard => "dashboard",
        }
    }

    pub fn is_protected(&self) -> bool {
        PROTECTED_ROUTES.contains(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDecision {
    Proceed,
    /// Protected route without a session: redirect home and open the login
    /// dialog, aborting the original navigation.
    RedirectToLogin,
}

pub fn gate(route: Route, logged_in: bool) -> NavDecision {
    if route.is_protected() && !logged_in {
        NavDecision::RedirectToLogin
    } else {
        NavDecision::Proceed
    }
}

/// Monotonic navigation tokens. A renderer's output is only committed to the
/// DOM while its token is still the latest issued, so a slow in-flight render
/// can never overwrite a newer one.
#[derive(Debug, Default)]
pub struct NavTokens {
    current: Cell<u64>,
}

impl NavTokens {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> u64 {
        let token = self.current.get() + 1;
        self.current.set(token);
        token
    }

    pub fn is_current(&self, token: u64) -> bool {
        self.current.get() == token
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unknown_names_fall_back_to_home() {
        assert_eq!(Route::resolve("perfil"), Route::Home);
        assert_eq!(Route::resolve(""), Route::Home);
        assert_eq!(Route::resolve("/"), Route::Home);
        assert_eq!(Route::resolve("DASHBOARD"), Route::Home);
    }

    #[test]
    fn known_names_resolve() {
        assert_eq!(Route::resolve("explorar"), Route::Explore);
        assert_eq!(Route::resolve("dashboard"), Route::Dashboard);
        assert_eq!(Route::resolve("home"), Route::Home);
    }

    #[test]
    fn dashboard_requires_session() {
        assert_eq!(gate(Route::Dashboard, false), NavDecision::RedirectToLogin);
        assert_eq!(gate(Route::Dashboard, true), NavDecision::Proceed);
        assert_eq!(gate(Route::Explore, false), NavDecision::Proceed);
    }

    #[test]
    fn stale_tokens_do_not_commit() {
        let tokens = NavTokens::new();
        let first = tokens.issue();
        let second = tokens.issue();
        assert!(!tokens.is_current(first));
        assert!(tokens.is_current(second));
    }
}
