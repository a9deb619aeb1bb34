//! Authentication API boundary.
//! The console only needs two calls: "who am I" and "log me in". Everything the
//! dashboard does with apartments, citizens and services goes through other
//! clients and never touches identity state.

mod client;

use std::future::Future;
use std::sync::Arc;

use crate::identity::Identity;

pub use client::{HttpAuthApi, DEFAULT_LOGIN_ENDPOINT, DEFAULT_ME_ENDPOINT};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(reqwest::Error),
    #[error("request timed out")]
    Timeout,
    #[error("HTTP {status}: {}", .detail.as_deref().unwrap_or("no detail"))]
    Status { status: u16, detail: Option<String> },
    #[error("malformed response: {0}")]
    Decode(String),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Worth one more attempt: the server may answer next time.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Network(_) | ApiError::Timeout => true,
            ApiError::Status { status, .. } => *status >= 500,
            ApiError::Decode(_) | ApiError::InvalidUrl(_) => false,
        }
    }

    /// Server-provided explanation, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { ApiError::Timeout } else { ApiError::Network(err) }
    }
}

pub trait AuthApi: Send + Sync {
    /// `GET current-user`: the identity bound to the current session.
    fn current_user(&self) -> impl Future<Output = Result<Identity, ApiError>> + Send;

    /// `POST login`: opens a session and returns its identity.
    fn login(&self, username: &str, password: &str) -> impl Future<Output = Result<Identity, ApiError>> + Send;
}

impl<A: AuthApi> AuthApi for Arc<A> {
    fn current_user(&self) -> impl Future<Output = Result<Identity, ApiError>> + Send {
        (**self).current_user()
    }

    fn login(&self, username: &str, password: &str) -> impl Future<Output = Result<Identity, ApiError>> + Send {
        (**self).login(username, password)
    }
}
