//! Console configuration.
//! Defaults, overridden by environment variables, overridden by command-line flags.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest::Url;

use crate::api::{DEFAULT_LOGIN_ENDPOINT, DEFAULT_ME_ENDPOINT};
use crate::identity::{ProbeSettings, DEFAULT_FORBIDDEN_PATH, DEFAULT_LOGIN_PATH, DEFAULT_LOGIN_TIMEOUT};

pub const ENV_API_BASE: &str = "INSPECTOR_API_BASE";
pub const ENV_ME_ENDPOINT: &str = "INSPECTOR_ME_ENDPOINT";
pub const ENV_LOGIN_ENDPOINT: &str = "INSPECTOR_LOGIN_ENDPOINT";
pub const ENV_PROBE_TIMEOUT_MS: &str = "INSPECTOR_PROBE_TIMEOUT_MS";
pub const ENV_PROBE_RETRIES: &str = "INSPECTOR_PROBE_RETRIES";
pub const ENV_LOGIN_TIMEOUT_MS: &str = "INSPECTOR_LOGIN_TIMEOUT_MS";
pub const ENV_LOG: &str = "INSPECTOR_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Root of the REST API; always ends with '/'.
    pub api_base: String,
    pub me_endpoint: String,
    pub login_endpoint: String,
    pub login_path: String,
    pub forbidden_path: String,
    pub probe_timeout: Duration,
    pub probe_retries: u32,
    /// Upper bound for one login submission.
    pub login_timeout: Duration,
    pub log_level: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_base: "http://127.0.0.1:8000/api/v1/".to_string(),
            me_endpoint: DEFAULT_ME_ENDPOINT.to_string(),
            login_endpoint: DEFAULT_LOGIN_ENDPOINT.to_string(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            forbidden_path: DEFAULT_FORBIDDEN_PATH.to_string(),
            probe_timeout: Duration::from_secs(10),
            probe_retries: 1,
            login_timeout: DEFAULT_LOGIN_TIMEOUT,
            log_level: "info".to_string(),
        }
    }
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    let mut i = 0;
    while i < args.len() {
        if args[i] == flag && i + 1 < args.len() {
            return Some(args[i + 1].as_str());
        }
        i += 1;
    }
    None
}

fn parse_num<T: std::str::FromStr>(raw: &str, source: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| anyhow!("invalid value '{}' for {}: {}", raw, source, e))
}

pub fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

impl ConsoleConfig {
    /// Reads the process environment; `args` are the command-line arguments.
    pub fn load(args: &[String]) -> Result<Self> {
        Self::resolve(|k| std::env::var(k).ok(), args)
    }

    pub fn resolve<E>(env: E, args: &[String]) -> Result<Self>
    where
        E: Fn(&str) -> Option<String>,
    {
        let mut cfg = ConsoleConfig::default();

        if let Some(v) = arg_value(args, "--api").map(str::to_string).or_else(|| env(ENV_API_BASE)) {
            cfg.api_base = v;
        }
        if let Some(v) = env(ENV_ME_ENDPOINT) { cfg.me_endpoint = v; }
        if let Some(v) = env(ENV_LOGIN_ENDPOINT) { cfg.login_endpoint = v; }

        let timeout_ms = match arg_value(args, "--probe-timeout-ms") {
            Some(v) => Some(parse_num::<u64>(v, "--probe-timeout-ms")?),
            None => env(ENV_PROBE_TIMEOUT_MS).map(|v| parse_num::<u64>(&v, ENV_PROBE_TIMEOUT_MS)).transpose()?,
        };
        if let Some(ms) = timeout_ms {
            if ms == 0 { return Err(anyhow!("probe timeout must be greater than zero")); }
            cfg.probe_timeout = Duration::from_millis(ms);
        }

        let retries = match arg_value(args, "--probe-retries") {
            Some(v) => Some(parse_num::<u32>(v, "--probe-retries")?),
            None => env(ENV_PROBE_RETRIES).map(|v| parse_num::<u32>(&v, ENV_PROBE_RETRIES)).transpose()?,
        };
        if let Some(r) = retries { cfg.probe_retries = r; }

        let login_ms = match arg_value(args, "--login-timeout-ms") {
            Some(v) => Some(parse_num::<u64>(v, "--login-timeout-ms")?),
            None => env(ENV_LOGIN_TIMEOUT_MS).map(|v| parse_num::<u64>(&v, ENV_LOGIN_TIMEOUT_MS)).transpose()?,
        };
        if let Some(ms) = login_ms {
            if ms == 0 { return Err(anyhow!("login timeout must be greater than zero")); }
            cfg.login_timeout = Duration::from_millis(ms);
        }

        if let Some(v) = arg_value(args, "--log").map(str::to_string).or_else(|| env(ENV_LOG)) {
            cfg.log_level = v;
        }

        let mut base = Url::parse(cfg.api_base.trim()).with_context(|| format!("invalid API base URL: {}", cfg.api_base))?;
        if !base.path().ends_with('/') {
            let p = format!("{}/", base.path());
            base.set_path(&p);
        }
        cfg.api_base = base.to_string();
        Ok(cfg)
    }

    pub fn probe_settings(&self) -> ProbeSettings {
        ProbeSettings { timeout: self.probe_timeout, retries: self.probe_retries }
    }

    /// Scheme, host and port of the API, used to resolve photo paths.
    pub fn server_origin(&self) -> String {
        Url::parse(&self.api_base)
            .map(|u| u.origin().ascii_serialization())
            .unwrap_or_else(|_| self.api_base.clone())
    }
}
