//! inspector_console: identity store, role-gated route guard and startup
//! identity probe for the municipal inspector dashboard.

pub mod api;
pub mod config;
pub mod console;
pub mod error;
pub mod identity;
pub mod logging;
pub mod nav;
pub mod routes;
