//! Role-gated route guard.
//!
//! [`decide`] is the pure decision table. [`RouteGuard`] is the mounted form: it
//! remembers its last decision so that a redirect is issued once per decision
//! change, never on every re-evaluation.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info};

use super::principal::Role;
use super::store::{AuthState, StoreSnapshot};
use crate::nav::{NavigateOptions, Navigator};

pub const DEFAULT_LOGIN_PATH: &str = "/login";
pub const DEFAULT_FORBIDDEN_PATH: &str = "/forbidden";

/// Roles allowed through a guard. Fixed at configuration time.
///
/// An empty set admits nobody.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredRoles(Arc<[Role]>);

impl RequiredRoles {
    pub fn new<I: IntoIterator<Item = Role>>(roles: I) -> Self {
        let mut v: Vec<Role> = Vec::new();
        for r in roles {
            if r != Role::Unrecognized && !v.contains(&r) { v.push(r); }
        }
        Self(v.into())
    }

    pub fn inspector() -> Self { Self::new([Role::Inspector]) }

    pub fn none() -> Self { Self::new([]) }

    pub fn contains(&self, role: Role) -> bool { self.0.contains(&role) }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn roles(&self) -> &[Role] { &self.0 }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Wait,
    RedirectToLogin,
    RedirectToForbidden,
    Render,
}

/// What the guarded slot shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardView {
    Loading,
    Nothing,
    Children,
}

impl GuardDecision {
    pub fn view(self) -> GuardView {
        match self {
            GuardDecision::Wait => GuardView::Loading,
            GuardDecision::RedirectToLogin | GuardDecision::RedirectToForbidden => GuardView::Nothing,
            GuardDecision::Render => GuardView::Children,
        }
    }
}

pub fn decide(state: &AuthState, required: &RequiredRoles) -> GuardDecision {
    match state {
        AuthState::Unknown => GuardDecision::Wait,
        AuthState::Anonymous => GuardDecision::RedirectToLogin,
        AuthState::Authenticated(id) if required.contains(id.role) => GuardDecision::Render,
        AuthState::Authenticated(_) => GuardDecision::RedirectToForbidden,
    }
}

/// A guard mounted in front of one view.
pub struct RouteGuard<N: Navigator> {
    required: RequiredRoles,
    navigator: N,
    login_path: String,
    forbidden_path: String,
    last: Option<GuardDecision>,
    navigations: usize,
}

impl<N: Navigator> RouteGuard<N> {
    pub fn new(required: RequiredRoles, navigator: N) -> Self {
        Self {
            required,
            navigator,
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            forbidden_path: DEFAULT_FORBIDDEN_PATH.to_string(),
            last: None,
            navigations: 0,
        }
    }

    pub fn with_paths(mut self, login: impl Into<String>, forbidden: impl Into<String>) -> Self {
        self.login_path = login.into();
        self.forbidden_path = forbidden.into();
        self
    }

    pub fn required(&self) -> &RequiredRoles { &self.required }

    pub fn last_decision(&self) -> Option<GuardDecision> { self.last }

    pub fn navigations(&self) -> usize { self.navigations }

    pub fn evaluate(&mut self, state: &AuthState) -> GuardView {
        let decision = decide(state, &self.required);
        if self.last != Some(decision) {
            let target = match decision {
                GuardDecision::RedirectToLogin => Some(self.login_path.as_str()),
                GuardDecision::RedirectToForbidden => Some(self.forbidden_path.as_str()),
                GuardDecision::Wait | GuardDecision::Render => None,
            };
            if let Some(path) = target {
                info!(target: "guard", state = state.label(), role = ?state.role(), path, "guard.redirect");
                self.navigator.navigate(path, NavigateOptions::REPLACE);
                self.navigations += 1;
            } else {
                debug!(target: "guard", state = state.label(), ?decision, "guard.decision");
            }
            self.last = Some(decision);
        }
        decision.view()
    }

    /// Evaluate now, then again after every store change, until every store
    /// handle is dropped. Dropping this future is always safe.
    pub async fn follow<F>(&mut self, mut rx: watch::Receiver<StoreSnapshot>, mut on_view: F)
    where
        F: FnMut(GuardView),
    {
        let first = rx.borrow_and_update().auth.clone();
        on_view(self.evaluate(&first));
        while rx.changed().await.is_ok() {
            let auth = rx.borrow_and_update().auth.clone();
            on_view(self.evaluate(&auth));
        }
    }
}

#[cfg(test)]
#[path = "guard_tests.rs"]
mod guard_tests;
