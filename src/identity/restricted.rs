use super::store::{AuthState, StoreSnapshot};

pub const HOME_PATH: &str = "/";

/// Guard for routes that only care whether a session exists.
///
/// `requires_auth = true` sends anonymous visitors to the login page.
/// `requires_auth = false` is the guest-only form used by the login page
/// itself: a logged-in user standing on the login path is sent home.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestrictedRoute {
    pub requires_auth: bool,
}

impl Default for RestrictedRoute {
    fn default() -> Self { Self { requires_auth: true } }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestrictedDecision {
    Wait,
    RedirectToLogin,
    RedirectToHome,
    Render,
}

impl RestrictedRoute {
    pub fn guest_only() -> Self { Self { requires_auth: false } }

    pub fn decide(&self, snap: &StoreSnapshot, current_path: &str, login_path: &str) -> RestrictedDecision {
        // Wait out both the startup probe and an in-flight login submission
        if snap.loading || !snap.auth.is_resolved() {
            return RestrictedDecision::Wait;
        }
        match (&snap.auth, self.requires_auth) {
            (AuthState::Anonymous, true) => RestrictedDecision::RedirectToLogin,
            (AuthState::Authenticated(_), false) if current_path == login_path => RestrictedDecision::RedirectToHome,
            _ => RestrictedDecision::Render,
        }
    }
}
