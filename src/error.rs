//! Unified application error model and mapping helpers.
//! This module provides the error enum surfaced to the console (login form messages,
//! route resolution) along with the mapping from authentication API failures.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::api::ApiError;

/// Message shown when the server rejects a request without saying why.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error occurred";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppError {
    UserInput { code: String, message: String },
    NotFound { code: String, message: String },
    Conflict { code: String, message: String },
    Auth { code: String, message: String },
    Forbidden { code: String, message: String },
    Io { code: String, message: String },
    Internal { code: String, message: String },
}

impl AppError {
    pub fn code_str(&self) -> &str {
        match self {
            AppError::UserInput { code, .. }
            | AppError::NotFound { code, .. }
            | AppError::Conflict { code, .. }
            | AppError::Auth { code, .. }
            | AppError::Forbidden { code, .. }
            | AppError::Io { code, .. }
            | AppError::Internal { code, .. } => code.as_str(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::UserInput { message, .. }
            | AppError::NotFound { message, .. }
            | AppError::Conflict { message, .. }
            | AppError::Auth { message, .. }
            | AppError::Forbidden { message, .. }
            | AppError::Io { message, .. }
            | AppError::Internal { message, .. } => message.as_str(),
        }
    }

    pub fn user<S: Into<String>>(code: S, msg: S) -> Self { AppError::UserInput { code: code.into(), message: msg.into() } }
    pub fn not_found<S: Into<String>>(code: S, msg: S) -> Self { AppError::NotFound { code: code.into(), message: msg.into() } }
    pub fn conflict<S: Into<String>>(code: S, msg: S) -> Self { AppError::Conflict { code: code.into(), message: msg.into() } }
    pub fn auth<S: Into<String>>(code: S, msg: S) -> Self { AppError::Auth { code: code.into(), message: msg.into() } }
    pub fn forbidden<S: Into<String>>(code: S, msg: S) -> Self { AppError::Forbidden { code: code.into(), message: msg.into() } }
    pub fn io<S: Into<String>>(code: S, msg: S) -> Self { AppError::Io { code: code.into(), message: msg.into() } }
    pub fn internal<S: Into<String>>(code: S, msg: S) -> Self { AppError::Internal { code: code.into(), message: msg.into() } }

    /// True for failures the user can fix by editing the form (as opposed to
    /// retrying later).
    pub fn is_user_facing(&self) -> bool {
        matches!(self, AppError::UserInput { .. } | AppError::Auth { .. } | AppError::Forbidden { .. } | AppError::Conflict { .. })
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code_str(), self.message())
    }
}

impl std::error::Error for AppError {}

pub type AppResult<T> = Result<T, AppError>;

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal { code: "internal_error".into(), message: err.to_string() }
    }
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        let detail = err.detail().unwrap_or(UNKNOWN_ERROR_MESSAGE).to_string();
        match &err {
            ApiError::Status { status: 401, .. } => AppError::Auth { code: "unauthorized".into(), message: detail },
            ApiError::Status { status: 403, .. } => AppError::Forbidden { code: "forbidden".into(), message: detail },
            ApiError::Status { status: 404, .. } => AppError::NotFound { code: "not_found".into(), message: detail },
            ApiError::Status { status: 400 | 422, .. } => AppError::UserInput { code: "rejected".into(), message: detail },
            ApiError::Status { status, .. } if *status >= 500 => AppError::Io { code: "server_error".into(), message: detail },
            ApiError::Status { .. } => AppError::Internal { code: "unexpected_status".into(), message: detail },
            // The technical cause is logged where the call failed.
            ApiError::Network(_) => AppError::Io { code: "network".into(), message: detail },
            ApiError::Timeout => AppError::Io { code: "timeout".into(), message: detail },
            ApiError::Decode(m) => AppError::Internal { code: "decode".into(), message: m.clone() },
            ApiError::InvalidUrl(m) => AppError::Internal { code: "invalid_url".into(), message: m.clone() },
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
