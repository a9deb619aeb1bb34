use reqwest::{Client, Response, Url};
use serde::Deserialize;
use tracing::debug;

use super::{ApiError, AuthApi};
use crate::identity::Identity;

pub const DEFAULT_ME_ENDPOINT: &str = "auth/me/";
pub const DEFAULT_LOGIN_ENDPOINT: &str = "auth/login/";

#[derive(Deserialize)]
struct UserEnvelope {
    user: Identity,
}

/// Authentication API over HTTP.
///
/// The client keeps a cookie store, so the session cookie set by `login` is
/// sent with every later `current_user` call made through the same instance.
#[derive(Clone)]
pub struct HttpAuthApi {
    base: Url,
    me_url: Url,
    login_url: Url,
    client: Client,
}

impl HttpAuthApi {
    /// Endpoints are joined onto `base`; keep them relative (no leading '/')
    /// so a base with a path prefix such as `/api/v1/` is honored.
    pub fn new(base: &str, me_endpoint: &str, login_endpoint: &str) -> Result<Self, ApiError> {
        let mut base_url = Url::parse(base).map_err(|e| ApiError::InvalidUrl(format!("{base}: {e}")))?;
        if !base_url.path().ends_with('/') {
            let p = format!("{}/", base_url.path());
            base_url.set_path(&p);
        }
        let me_url = base_url.join(me_endpoint).map_err(|e| ApiError::InvalidUrl(format!("{me_endpoint}: {e}")))?;
        let login_url = base_url.join(login_endpoint).map_err(|e| ApiError::InvalidUrl(format!("{login_endpoint}: {e}")))?;
        let client = Client::builder().cookie_store(true).build()?;
        Ok(Self { base: base_url, me_url, login_url, client })
    }

    pub fn with_defaults(base: &str) -> Result<Self, ApiError> {
        Self::new(base, DEFAULT_ME_ENDPOINT, DEFAULT_LOGIN_ENDPOINT)
    }

    pub fn base(&self) -> &Url { &self.base }

    pub fn me_url(&self) -> &Url { &self.me_url }

    pub fn login_url(&self) -> &Url { &self.login_url }
}

/// Decode `{ "user": ... }` on success, `{ "detail": "..." }` on failure.
async fn read_user(resp: Response) -> Result<Identity, ApiError> {
    let status = resp.status();
    let body = resp.bytes().await?;
    if !status.is_success() {
        let detail = serde_json::from_slice::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(|s| s.to_string()));
        return Err(ApiError::Status { status: status.as_u16(), detail });
    }
    let env: UserEnvelope = serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))?;
    Ok(env.user)
}

impl AuthApi for HttpAuthApi {
    async fn current_user(&self) -> Result<Identity, ApiError> {
        debug!(target: "auth", url = %self.me_url, "auth.current_user");
        let resp = self.client.get(self.me_url.clone()).send().await?;
        read_user(resp).await
    }

    async fn login(&self, username: &str, password: &str) -> Result<Identity, ApiError> {
        debug!(target: "auth", url = %self.login_url, username, "auth.login");
        let resp = self
            .client
            .post(self.login_url.clone())
            .json(&serde_json::json!({"username": username, "password": password}))
            .send()
            .await?;
        read_user(resp).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_endpoints_under_base_path() {
        let api = HttpAuthApi::with_defaults("http://127.0.0.1:8000/api/v1").unwrap();
        assert_eq!(api.base().as_str(), "http://127.0.0.1:8000/api/v1/");
        assert_eq!(api.me_url().as_str(), "http://127.0.0.1:8000/api/v1/auth/me/");
        assert_eq!(api.login_url().as_str(), "http://127.0.0.1:8000/api/v1/auth/login/");
    }

    #[test]
    fn rejects_bad_base() {
        assert!(matches!(HttpAuthApi::with_defaults("not a url"), Err(ApiError::InvalidUrl(_))));
    }
}
