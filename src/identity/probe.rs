use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::{info, warn};

use super::store::IdentityStore;
use crate::api::{ApiError, AuthApi};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeSettings {
    /// Upper bound for a single attempt.
    pub timeout: Duration,
    /// Extra attempts after a transient failure.
    pub retries: u32,
}

impl Default for ProbeSettings {
    fn default() -> Self { Self { timeout: Duration::from_secs(10), retries: 1 } }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    Authenticated,
    Anonymous,
    /// This probe already ran; nothing was done.
    AlreadyRan,
    /// A login or logout resolved the store first; the result was dropped.
    Superseded,
}

/// Startup "who am I" check. Resolves the store out of `Unknown` exactly once.
#[derive(Debug, Default)]
pub struct IdentityProbe {
    settings: ProbeSettings,
    started: AtomicBool,
}

impl IdentityProbe {
    pub fn new(settings: ProbeSettings) -> Self {
        Self { settings, started: AtomicBool::new(false) }
    }

    pub fn settings(&self) -> ProbeSettings { self.settings }

    pub fn has_run(&self) -> bool { self.started.load(Ordering::Acquire) }

    /// Never fails: any error ends in `Anonymous`. Only moves the store out of
    /// `Unknown`; a store resolved by someone else while the check was in
    /// flight is left untouched.
    pub async fn run<A: AuthApi>(&self, api: &A, store: &IdentityStore) -> ProbeOutcome {
        if self.started.swap(true, Ordering::AcqRel) {
            return ProbeOutcome::AlreadyRan;
        }
        let attempts = self.settings.retries.saturating_add(1);
        let mut last_err: Option<ApiError> = None;
        for attempt in 1..=attempts {
            let res = match tokio::time::timeout(self.settings.timeout, api.current_user()).await {
                Ok(r) => r,
                Err(_) => Err(ApiError::Timeout),
            };
            match res {
                Ok(identity) => {
                    let user_id = identity.id;
                    if !store.resolve_if_unknown(Some(identity)) {
                        info!(target: "probe", user_id, "probe.superseded");
                        return ProbeOutcome::Superseded;
                    }
                    info!(target: "probe", user_id, attempt, "probe.authenticated");
                    return ProbeOutcome::Authenticated;
                }
                Err(e) => {
                    let retry = e.is_transient() && attempt < attempts;
                    warn!(target: "probe", attempt, retry, error = %e, "probe.failed");
                    last_err = Some(e);
                    if !retry { break; }
                }
            }
        }
        if let Some(e) = last_err {
            info!(target: "probe", error = %e, "probe.anonymous");
        }
        if !store.resolve_if_unknown(None) {
            info!(target: "probe", state = store.auth_state().label(), "probe.superseded");
            return ProbeOutcome::Superseded;
        }
        ProbeOutcome::Anonymous
    }
}

#[cfg(test)]
#[path = "probe_tests.rs"]
mod probe_tests;
