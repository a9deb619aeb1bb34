use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use super::principal::{Identity, Role};

/// Who is logged in, as far as the console knows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthState {
    /// Identity check not finished yet.
    #[default]
    Unknown,
    /// Checked; no session.
    Anonymous,
    /// Checked; session valid.
    Authenticated(Arc<Identity>),
}

impl AuthState {
    pub fn identity(&self) -> Option<&Arc<Identity>> {
        match self {
            AuthState::Authenticated(id) => Some(id),
            _ => None,
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.identity().map(|id| id.role)
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, AuthState::Unknown)
    }

    pub fn label(&self) -> &'static str {
        match self {
            AuthState::Unknown => "unknown",
            AuthState::Anonymous => "anonymous",
            AuthState::Authenticated(_) => "authenticated",
        }
    }
}

/// One consistent read of the store: auth state and the login-in-flight flag
/// always come from the same write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreSnapshot {
    pub auth: AuthState,
    pub loading: bool,
}

/// Single source of truth for the current identity.
///
/// Cloning the handle shares the same store. Writers are serialized by the
/// underlying watch channel and every subscriber sees whole snapshots. Once
/// resolved, the store never returns to [`AuthState::Unknown`].
#[derive(Clone)]
pub struct IdentityStore {
    tx: Arc<watch::Sender<StoreSnapshot>>,
}

impl Default for IdentityStore {
    fn default() -> Self { Self::new() }
}

impl std::fmt::Debug for IdentityStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityStore").field("state", &*self.tx.borrow()).finish()
    }
}

impl IdentityStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(StoreSnapshot::default());
        Self { tx: Arc::new(tx) }
    }

    /// Always notifies subscribers, even when the identity did not change.
    pub fn set_authenticated(&self, identity: Identity) -> Arc<Identity> {
        let identity = Arc::new(identity);
        let held = identity.clone();
        self.tx.send_modify(|s| s.auth = AuthState::Authenticated(held));
        debug!(target: "auth", user_id = identity.id, role = %identity.role, "store.authenticated");
        identity
    }

    /// Drops any held identity. A no-op (no notification) when already anonymous.
    pub fn set_anonymous(&self) {
        let changed = self.tx.send_if_modified(|s| {
            if matches!(s.auth, AuthState::Anonymous) { return false; }
            s.auth = AuthState::Anonymous;
            true
        });
        if changed { debug!(target: "auth", "store.anonymous"); }
    }

    /// Leaves `Unknown` with the given result: `Some` authenticates, `None`
    /// makes the store anonymous. Does nothing and returns false once the
    /// store is resolved, so a late startup check never overrides a login or
    /// a logout that happened meanwhile.
    pub fn resolve_if_unknown(&self, identity: Option<Identity>) -> bool {
        let resolved = self.tx.send_if_modified(|s| {
            if !matches!(s.auth, AuthState::Unknown) { return false; }
            s.auth = match identity {
                Some(id) => AuthState::Authenticated(Arc::new(id)),
                None => AuthState::Anonymous,
            };
            true
        });
        if resolved { debug!(target: "auth", state = self.tx.borrow().auth.label(), "store.resolved"); }
        resolved
    }

    pub fn set_loading(&self, flag: bool) {
        self.tx.send_if_modified(|s| {
            if s.loading == flag { return false; }
            s.loading = flag;
            true
        });
    }

    /// Sets `loading` only if it was clear. Returns false when another login is
    /// already in flight.
    pub fn try_begin_loading(&self) -> bool {
        self.tx.send_if_modified(|s| {
            if s.loading { return false; }
            s.loading = true;
            true
        })
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.tx.borrow().clone()
    }

    pub fn auth_state(&self) -> AuthState {
        self.tx.borrow().auth.clone()
    }

    pub fn current_identity(&self) -> Option<Arc<Identity>> {
        self.tx.borrow().auth.identity().cloned()
    }

    pub fn is_loading(&self) -> bool {
        self.tx.borrow().loading
    }

    /// The returned receiver starts with the current snapshot marked as seen.
    pub fn subscribe(&self) -> watch::Receiver<StoreSnapshot> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod store_tests;
