use super::*;
use crate::api::ApiError;
use crate::identity::{AuthState, Role};
use parking_lot::Mutex;
use std::time::Duration;

/// In-memory authentication desk: one account, session flag flipped by login.
struct Desk {
    session: Mutex<Option<Identity>>,
    role: Role,
}

impl Desk {
    fn new(role: Role) -> Self { Self { session: Mutex::new(None), role } }

    fn logged_in(role: Role) -> Self {
        Self { session: Mutex::new(Some(Identity::new(10, "insp", role))), role }
    }
}

impl AuthApi for Desk {
    async fn current_user(&self) -> Result<Identity, ApiError> {
        let current = self.session.lock().clone();
        current.ok_or(ApiError::Status { status: 401, detail: Some("Authentication credentials were not provided.".into()) })
    }

    async fn login(&self, username: &str, password: &str) -> Result<Identity, ApiError> {
        if username == "insp" && password == "secret" {
            let id = Identity::new(10, username, self.role);
            *self.session.lock() = Some(id.clone());
            Ok(id)
        } else {
            Err(ApiError::Status { status: 401, detail: Some("Invalid username or password".into()) })
        }
    }
}

fn console(api: Desk, initial: &str) -> Console<Desk> {
    Console::with_parts(
        api,
        RouteTable::default(),
        ProbeSettings { timeout: Duration::from_millis(200), retries: 0 },
        initial,
    )
}

#[tokio::test]
async fn guarded_page_shows_loading_until_probe_resolves() {
    let mut c = console(Desk::logged_in(Role::Inspector), "/apartments");
    assert_eq!(c.render(), Screen::Loading);
    assert!(c.history().navigations().is_empty());

    assert_eq!(c.start().await, ProbeOutcome::Authenticated);
    assert_eq!(c.render(), Screen::Page(Page::Apartments));
    assert!(c.history().navigations().is_empty(), "authenticated refresh must not bounce through login");
}

#[tokio::test]
async fn anonymous_visit_lands_on_login_and_back_does_not_reexpose() {
    let mut c = console(Desk::new(Role::Inspector), "/");
    c.start().await;
    assert_eq!(c.open("/citizens"), Screen::Page(Page::Login));
    assert_eq!(c.current_path(), "/login");

    // The guarded entry was replaced; going back lands on the root, which is guarded too.
    assert_eq!(c.back(), Some(Screen::Page(Page::Login)));
    assert_eq!(c.current_path(), "/login");
}

#[tokio::test]
async fn login_then_browse_then_logout() {
    let mut c = console(Desk::new(Role::Inspector), "/services");
    c.start().await;
    assert_eq!(c.render(), Screen::Page(Page::Login));
    assert!(c.menu().is_empty());

    let err = c.login(&Credentials::new("insp", "nope")).await.unwrap_err();
    assert_eq!(err.message(), "Invalid username or password");
    assert_eq!(c.store().auth_state(), AuthState::Anonymous);

    c.login(&Credentials::new("insp", "secret")).await.unwrap();
    assert_eq!(c.render(), Screen::Page(Page::Dashboard));
    assert_eq!(c.menu().len(), 1);
    assert_eq!(c.open("/citizens/"), Screen::Page(Page::Citizens));

    c.logout();
    assert_eq!(c.render(), Screen::Page(Page::Login));
    assert_eq!(c.back(), Some(Screen::Page(Page::Login)), "back after logout must not show citizens");
    assert_eq!(c.store().auth_state(), AuthState::Anonymous);
}

#[tokio::test]
async fn unrecognized_role_is_sent_to_forbidden() {
    let mut c = console(Desk::logged_in(Role::Unrecognized), "/apartments");
    c.start().await;
    assert_eq!(c.render(), Screen::Page(Page::Forbidden));
    assert_eq!(c.current_path(), "/forbidden");
    assert!(c.menu().is_empty());
}

#[tokio::test]
async fn logged_in_user_is_sent_home_from_login() {
    let mut c = console(Desk::logged_in(Role::Inspector), "/login");
    assert_eq!(c.render(), Screen::Loading);
    c.start().await;
    assert_eq!(c.render(), Screen::Page(Page::Dashboard));
    assert_eq!(c.current_path(), "/");
}

#[tokio::test]
async fn unknown_path_is_not_found() {
    let mut c = console(Desk::new(Role::Inspector), "/");
    c.start().await;
    assert_eq!(c.open("/reports?x=1"), Screen::NotFound("/reports".into()));
}

#[tokio::test]
async fn same_page_rerender_navigates_once() {
    let mut c = console(Desk::logged_in(Role::Unrecognized), "/citizens");
    c.start().await;
    c.render();
    c.render();
    assert_eq!(c.history().navigations().len(), 1);
}

#[tokio::test]
async fn start_runs_the_probe_once() {
    let c = console(Desk::logged_in(Role::Inspector), "/");
    assert_eq!(c.start().await, ProbeOutcome::Authenticated);
    c.store().set_anonymous();
    assert_eq!(c.start().await, ProbeOutcome::AlreadyRan);
    assert_eq!(c.store().auth_state(), AuthState::Anonymous);
}
