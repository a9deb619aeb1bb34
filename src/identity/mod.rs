//! Identity and access control for the console.
//! Keep the public surface thin and split implementation across sub-modules.

mod principal;
mod store;
mod guard;
mod restricted;
mod probe;
mod session;

pub use principal::{Identity, Role, Village, District};
pub use store::{AuthState, IdentityStore, StoreSnapshot};
pub use guard::{decide, GuardDecision, GuardView, RequiredRoles, RouteGuard, DEFAULT_FORBIDDEN_PATH, DEFAULT_LOGIN_PATH};
pub use restricted::{RestrictedDecision, RestrictedRoute, HOME_PATH};
pub use probe::{IdentityProbe, ProbeOutcome, ProbeSettings};
pub use session::{login, login_within, logout, Credentials, DEFAULT_LOGIN_TIMEOUT};
