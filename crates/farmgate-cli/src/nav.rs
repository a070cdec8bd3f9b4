//! Navigation gate for command handlers.
//!
//! Commands map onto routes; before issuing any network call, the route
//! is checked against the current session. A redirect outcome prints the
//! destination (role mismatches are a silent redirect, not an error) and
//! the command stops without calling the API.

use std::io::{self, Write};

use farmgate_core::routes::{Navigation, Route};
use farmgate_core::session::SessionStore;

/// Check `route` against the current session. Returns `true` when the
/// command may proceed; otherwise the redirect has been reported.
pub fn gate(session: &SessionStore, route: Route) -> anyhow::Result<bool> {
    let mut out = io::stdout();
    match route.guard(session.current().as_ref()) {
        Navigation::Allow(_) => Ok(true),
        Navigation::RedirectLogin => {
            writeln!(out, "Not logged in. Run `farmgate auth login` first.")?;
            Ok(false)
        }
        Navigation::RedirectHome => {
            writeln!(out, "Redirected to home.")?;
            Ok(false)
        }
    }
}

/// `farmgate open <path>`: resolve a path through the route table and
/// report where navigation lands.
pub fn open(session: &SessionStore, path: &str) -> anyhow::Result<()> {
    let mut out = io::stdout();
    let route = Route::resolve(path);
    match route.guard(session.current().as_ref()) {
        Navigation::Allow(Route::NotFound) => writeln!(out, "{path}: not found")?,
        Navigation::Allow(route) => writeln!(out, "{path}: {route:?}")?,
        Navigation::RedirectLogin => writeln!(out, "{path}: redirected to Login")?,
        Navigation::RedirectHome => writeln!(out, "{path}: redirected to Home")?,
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use farmgate_core::role::Role;
    use farmgate_core::session::Session;

    use super::*;

    fn store_with(dir: &tempfile::TempDir, role: Option<Role>) -> SessionStore {
        let store = SessionStore::open(dir.path().join("session.json"));
        if let Some(role) = role {
            store
                .establish(Session {
                    token: "tok-1".into(),
                    user_id: 1,
                    role,
                })
                .unwrap();
        }
        store
    }

    #[test]
    fn gate_lets_the_owning_role_through() {
        let dir = tempfile::tempdir().unwrap();
        assert!(gate(&store_with(&dir, Some(Role::Farmer)), Route::FarmerOrders).unwrap());
        assert!(gate(&store_with(&dir, Some(Role::Admin)), Route::Admin).unwrap());
        assert!(gate(&store_with(&dir, Some(Role::Customer)), Route::Cart).unwrap());
    }

    #[test]
    fn gate_stops_the_wrong_role() {
        let dir = tempfile::tempdir().unwrap();
        let customer = store_with(&dir, Some(Role::Customer));
        assert!(!gate(&customer, Route::FarmerOrders).unwrap());
        assert!(!gate(&customer, Route::Admin).unwrap());
    }

    #[test]
    fn gate_stops_anonymous_callers() {
        let dir = tempfile::tempdir().unwrap();
        let anonymous = store_with(&dir, None);
        assert!(!gate(&anonymous, Route::FarmerOrders).unwrap());
        assert!(!gate(&anonymous, Route::Cart).unwrap());
    }
}
