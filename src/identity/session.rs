use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use super::principal::Identity;
use super::store::IdentityStore;
use crate::api::{ApiError, AuthApi};
use crate::error::{AppError, AppResult};
use crate::nav::{NavigateOptions, Navigator};

#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into() }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials").field("username", &self.username).field("password", &"***").finish()
    }
}

// Clears the login-in-flight flag on every exit path, including cancellation.
struct LoadingReset<'a>(&'a IdentityStore);

impl Drop for LoadingReset<'_> {
    fn drop(&mut self) {
        self.0.set_loading(false);
    }
}

pub const DEFAULT_LOGIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Submit the login form, giving up after [`DEFAULT_LOGIN_TIMEOUT`].
pub async fn login<A: AuthApi>(api: &A, store: &IdentityStore, creds: &Credentials) -> AppResult<Arc<Identity>> {
    login_within(api, store, creds, DEFAULT_LOGIN_TIMEOUT).await
}

/// Submit the login form.
///
/// Blank fields are rejected before any I/O. Only one submission may be in
/// flight per store. A request still unanswered after `timeout` fails with
/// a `timeout` error and releases the in-flight flag. On failure the store
/// is left as it was and the returned error carries the message to show the
/// user.
pub async fn login_within<A: AuthApi>(
    api: &A,
    store: &IdentityStore,
    creds: &Credentials,
    timeout: Duration,
) -> AppResult<Arc<Identity>> {
    if creds.username.trim().is_empty() || creds.password.is_empty() {
        return Err(AppError::user("missing_credentials", "username and password are required"));
    }
    if !store.try_begin_loading() {
        return Err(AppError::conflict("login_in_progress", "a login is already in progress"));
    }
    let _reset = LoadingReset(store);
    let res = match tokio::time::timeout(timeout, api.login(creds.username.trim(), &creds.password)).await {
        Ok(r) => r,
        Err(_) => Err(ApiError::Timeout),
    };
    match res {
        Ok(identity) => {
            info!(target: "auth", user_id = identity.id, role = %identity.role, "auth.login.ok");
            Ok(store.set_authenticated(identity))
        }
        Err(e) => {
            warn!(target: "auth", username = %creds.username, error = %e, "auth.login.failed");
            Err(e.into())
        }
    }
}

/// Drop the session locally and go to the login page.
pub fn logout<N: Navigator>(store: &IdentityStore, navigator: &N, login_path: &str) {
    store.set_anonymous();
    navigator.navigate(login_path, NavigateOptions::PUSH);
    info!(target: "auth", "auth.logout");
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod session_tests;
