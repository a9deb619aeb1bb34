//! Console composition: store, history, route table, probe and the mounted guard.
//!
//! Rendering is pull-based: after every user action the caller asks for the
//! current [`Screen`], and that re-evaluation against a fresh store snapshot
//! is how the console reacts to identity changes. It does not subscribe to
//! the store; push-driven callers use [`RouteGuard::follow`] with
//! [`IdentityStore::subscribe`] instead. A guard stays mounted while the
//! current path is unchanged and is replaced when the path changes, so its
//! redirect bookkeeping lives exactly as long as the view it protects.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::api::AuthApi;
use crate::config::ConsoleConfig;
use crate::error::AppResult;
use crate::identity::{
    self, Credentials, GuardView, Identity, IdentityProbe, IdentityStore, ProbeOutcome, ProbeSettings,
    RestrictedDecision, RestrictedRoute, RouteGuard, DEFAULT_LOGIN_TIMEOUT, HOME_PATH,
};
use crate::nav::{History, NavigateOptions, Navigator};
use crate::routes::{default_menu, normalize_path, visible_menu, Access, MenuGroup, Page, RouteTable, VisibleGroup};

// Enough for guarded -> login -> home; anything longer is a misconfigured table.
const MAX_REDIRECTS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Loading,
    Page(Page),
    NotFound(String),
    /// Redirects did not settle.
    Blank,
}

struct Mounted {
    path: String,
    guard: Option<RouteGuard<Arc<History>>>,
}

pub struct Console<A: AuthApi> {
    api: A,
    store: IdentityStore,
    history: Arc<History>,
    routes: RouteTable,
    menu: Vec<MenuGroup>,
    probe: IdentityProbe,
    login_timeout: Duration,
    mounted: Option<Mounted>,
}

impl<A: AuthApi> Console<A> {
    pub fn new(api: A, cfg: &ConsoleConfig) -> Self {
        Self::with_parts(
            api,
            RouteTable::default_routes(&cfg.login_path, &cfg.forbidden_path),
            cfg.probe_settings(),
            HOME_PATH,
        )
        .with_login_timeout(cfg.login_timeout)
    }

    pub fn with_parts(api: A, routes: RouteTable, probe: ProbeSettings, initial_path: &str) -> Self {
        Self {
            api,
            store: IdentityStore::new(),
            history: Arc::new(History::new(&normalize_path(initial_path))),
            routes,
            menu: default_menu(),
            probe: IdentityProbe::new(probe),
            login_timeout: DEFAULT_LOGIN_TIMEOUT,
            mounted: None,
        }
    }

    pub fn with_login_timeout(mut self, timeout: Duration) -> Self {
        self.login_timeout = timeout;
        self
    }

    pub fn store(&self) -> &IdentityStore { &self.store }

    pub fn history(&self) -> &Arc<History> { &self.history }

    pub fn routes(&self) -> &RouteTable { &self.routes }

    pub fn current_path(&self) -> String { self.history.current() }

    /// Run the startup identity probe. Later calls do nothing.
    pub async fn start(&self) -> ProbeOutcome {
        self.probe.run(&self.api, &self.store).await
    }

    pub fn open(&mut self, path: &str) -> Screen {
        self.history.navigate(&normalize_path(path), NavigateOptions::PUSH);
        self.render()
    }

    pub fn back(&mut self) -> Option<Screen> {
        self.history.back()?;
        Some(self.render())
    }

    pub async fn login(&mut self, creds: &Credentials) -> AppResult<Arc<Identity>> {
        let identity = identity::login_within(&self.api, &self.store, creds, self.login_timeout).await?;
        self.history.navigate(HOME_PATH, NavigateOptions::PUSH);
        Ok(identity)
    }

    pub fn logout(&mut self) {
        identity::logout(&self.store, &self.history, self.routes.login_path());
    }

    pub fn menu(&self) -> Vec<VisibleGroup<'_>> {
        visible_menu(&self.menu, &self.store.auth_state())
    }

    pub fn render(&mut self) -> Screen {
        for _ in 0..MAX_REDIRECTS {
            let path = normalize_path(&self.history.current());
            let Some(entry) = self.routes.resolve(&path).cloned() else {
                self.mounted = None;
                return Screen::NotFound(path);
            };
            if self.mounted.as_ref().map(|m| m.path != path).unwrap_or(true) {
                debug!(target: "console", path = %path, page = ?entry.page, "mount");
                let guard = match &entry.access {
                    Access::Roles(required) => Some(
                        RouteGuard::new(required.clone(), self.history.clone())
                            .with_paths(self.routes.login_path(), self.routes.forbidden_path()),
                    ),
                    Access::GuestOnly | Access::Public => None,
                };
                self.mounted = Some(Mounted { path: path.clone(), guard });
            }
            let snap = self.store.snapshot();

            match &entry.access {
                Access::Public => return Screen::Page(entry.page),
                Access::Roles(_) => {
                    let Some(guard) = self.mounted.as_mut().and_then(|m| m.guard.as_mut()) else {
                        return Screen::Blank;
                    };
                    match guard.evaluate(&snap.auth) {
                        GuardView::Loading => return Screen::Loading,
                        GuardView::Children => return Screen::Page(entry.page),
                        GuardView::Nothing => {}
                    }
                }
                Access::GuestOnly => {
                    let gate = RestrictedRoute::guest_only();
                    match gate.decide(&snap, &path, self.routes.login_path()) {
                        RestrictedDecision::Wait => return Screen::Loading,
                        RestrictedDecision::Render => return Screen::Page(entry.page),
                        RestrictedDecision::RedirectToHome => self.history.navigate(HOME_PATH, NavigateOptions::REPLACE),
                        RestrictedDecision::RedirectToLogin => {
                            let login = self.routes.login_path().to_string();
                            self.history.navigate(&login, NavigateOptions::REPLACE);
                        }
                    }
                }
            }

            if normalize_path(&self.history.current()) == path {
                // Nothing to show and nowhere to go.
                return Screen::Blank;
            }
        }
        warn!(target: "console", path = %self.history.current(), "redirects did not settle");
        Screen::Blank
    }
}

#[cfg(test)]
#[path = "console_tests.rs"]
mod console_tests;
