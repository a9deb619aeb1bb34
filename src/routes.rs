//! Route table and sidebar menu.
//! Every role set here is fixed when the table is built; nothing is derived from runtime data.

use crate::identity::{decide, AuthState, GuardDecision, RequiredRoles, DEFAULT_FORBIDDEN_PATH, DEFAULT_LOGIN_PATH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Dashboard,
    Apartments,
    Citizens,
    Services,
    Login,
    Forbidden,
}

impl Page {
    pub fn title(&self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Apartments => "Apartments",
            Page::Citizens => "Citizens",
            Page::Services => "Services",
            Page::Login => "Inspector sign-in",
            Page::Forbidden => "Access denied",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// Role-gated: see [`crate::identity::RouteGuard`].
    Roles(RequiredRoles),
    /// Hidden from logged-in users (the login page).
    GuestOnly,
    Public,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    pub path: String,
    pub page: Page,
    pub access: Access,
}

#[derive(Debug, Clone)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
    login_path: String,
    forbidden_path: String,
}

/// Drop query string and fragment, and a trailing slash except on the root.
pub fn normalize_path(path: &str) -> String {
    let p = path.split(['?', '#']).next().unwrap_or("").trim();
    let p = p.trim_end_matches('/');
    if p.is_empty() {
        "/".to_string()
    } else if p.starts_with('/') {
        p.to_string()
    } else {
        format!("/{}", p)
    }
}

impl Default for RouteTable {
    fn default() -> Self { Self::default_routes(DEFAULT_LOGIN_PATH, DEFAULT_FORBIDDEN_PATH) }
}

impl RouteTable {
    pub fn default_routes(login_path: &str, forbidden_path: &str) -> Self {
        let guarded = |path: &str, page: Page| RouteEntry {
            path: path.to_string(),
            page,
            access: Access::Roles(RequiredRoles::inspector()),
        };
        let login_path = normalize_path(login_path);
        let forbidden_path = normalize_path(forbidden_path);
        let entries = vec![
            guarded("/", Page::Dashboard),
            guarded("/apartments", Page::Apartments),
            guarded("/citizens", Page::Citizens),
            guarded("/services", Page::Services),
            RouteEntry { path: login_path.clone(), page: Page::Login, access: Access::GuestOnly },
            RouteEntry { path: forbidden_path.clone(), page: Page::Forbidden, access: Access::Public },
        ];
        Self { entries, login_path, forbidden_path }
    }

    pub fn login_path(&self) -> &str { &self.login_path }

    pub fn forbidden_path(&self) -> &str { &self.forbidden_path }

    pub fn entries(&self) -> &[RouteEntry] { &self.entries }

    pub fn resolve(&self, path: &str) -> Option<&RouteEntry> {
        let p = normalize_path(path);
        self.entries.iter().find(|e| e.path == p)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub url: &'static str,
    pub label: &'static str,
    pub roles: RequiredRoles,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuGroup {
    pub title: &'static str,
    pub roles: RequiredRoles,
    pub items: Vec<MenuItem>,
}

pub fn default_menu() -> Vec<MenuGroup> {
    let item = |url, label| MenuItem { url, label, roles: RequiredRoles::inspector() };
    vec![MenuGroup {
        title: "Main",
        roles: RequiredRoles::inspector(),
        items: vec![
            item("/", "Dashboard"),
            item("/apartments", "Apartments"),
            item("/citizens", "Citizens"),
            item("/services", "Services"),
        ],
    }]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleGroup<'a> {
    pub title: &'a str,
    pub items: Vec<&'a MenuItem>,
}

/// Sidebar entries the current identity may see. Uses the pure guard decision,
/// so building the menu never navigates.
pub fn visible_menu<'a>(menu: &'a [MenuGroup], state: &AuthState) -> Vec<VisibleGroup<'a>> {
    menu.iter()
        .filter(|g| decide(state, &g.roles) == GuardDecision::Render)
        .map(|g| VisibleGroup {
            title: g.title,
            items: g.items.iter().filter(|i| decide(state, &i.roles) == GuardDecision::Render).collect(),
        })
        .collect()
}
