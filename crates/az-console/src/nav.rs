//! Routes, menu and navigation state

use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::debug;

use az_common::Role;

use crate::guard::{guard, GuardDecision, HOME_PATH, LOGIN_PATH};
use crate::session::{Session, SessionState};

/// One console view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteEntry {
    pub path: &'static str,
    pub label: &'static str,
    /// Empty means any signed-in user
    pub roles: &'static [Role],
    /// Needs a session at all
    pub protected: bool,
}

pub static ROUTES: [RouteEntry; 8] = [
    RouteEntry { path: LOGIN_PATH, label: "Autentificare", roles: &[], protected: false },
    RouteEntry { path: HOME_PATH, label: "Dashboard", roles: &[], protected: true },
    RouteEntry { path: "/students", label: "Studenți", roles: &[], protected: true },
    RouteEntry { path: "/courses", label: "Cursuri", roles: &[], protected: true },
    RouteEntry { path: "/enrollments", label: "Înscrieri", roles: &[], protected: true },
    RouteEntry { path: "/attendance", label: "Prezențe", roles: &[], protected: true },
    RouteEntry { path: "/users", label: "Utilizatori", roles: &[Role::Admin], protected: true },
    RouteEntry { path: "/audit", label: "Audit Log", roles: &[Role::Admin], protected: true },
];

fn normalize(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or("");
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        HOME_PATH
    } else {
        trimmed
    }
}

/// Route for `path`; unknown paths fall back to the dashboard
pub fn resolve(path: &str) -> &'static RouteEntry {
    let path = normalize(path);
    ROUTES
        .iter()
        .find(|r| r.path == path)
        .unwrap_or(&ROUTES[1])
}

/// Menu entries visible to `session`
pub fn menu(session: &Session) -> Vec<&'static RouteEntry> {
    ROUTES
        .iter()
        .filter(|r| r.protected)
        .filter(|r| r.roles.is_empty() || session.has_any_role(r.roles))
        .collect()
}

/// Current location plus the location to return to after login
pub struct Navigator {
    location: watch::Sender<String>,
    return_to: Mutex<Option<String>>,
}

impl Navigator {
    pub fn new() -> Self {
        let (location, _) = watch::channel(HOME_PATH.to_string());
        Self {
            location,
            return_to: Mutex::new(None),
        }
    }

    pub fn location(&self) -> String {
        self.location.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.location.subscribe()
    }

    fn set_location(&self, path: &str) {
        self.location.send_if_modified(|current| {
            if current != path {
                *current = path.to_string();
                true
            } else {
                false
            }
        });
    }

    /// Request `path` and apply the guard's decision
    pub fn navigate(&self, state: &SessionState, path: &str) -> GuardDecision {
        let route = resolve(path);
        if !route.protected {
            self.set_location(route.path);
            return GuardDecision::Render;
        }

        let decision = guard(state, Some(route.roles), route.path);
        debug!(path = %route.path, decision = ?decision, "Navigate");
        match &decision {
            GuardDecision::Wait | GuardDecision::Render => self.set_location(route.path),
            GuardDecision::RedirectToLogin { from } => {
                *self.return_to.lock() = Some(from.clone());
                self.set_location(LOGIN_PATH);
            }
            GuardDecision::RedirectHome => self.set_location(HOME_PATH),
        }
        decision
    }

    /// Move to the remembered location (default `/`) through the guard
    /// and return where the user landed
    pub fn after_login(&self, state: &SessionState) -> String {
        let target = self
            .return_to
            .lock()
            .take()
            .unwrap_or_else(|| HOME_PATH.to_string());
        self.navigate(state, &target);
        self.location()
    }

    /// Send the user to login, remembering where they were
    pub fn force_login(&self) {
        let current = self.location();
        if current != LOGIN_PATH {
            *self.return_to.lock() = Some(current);
        }
        self.set_location(LOGIN_PATH);
    }

    /// Go to login without remembering anything (explicit logout)
    pub fn to_login(&self) {
        self.return_to.lock().take();
        self.set_location(LOGIN_PATH);
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(roles: &[Role]) -> Session {
        Session {
            username: "u".into(),
            roles: roles.iter().copied().collect(),
        }
    }

    #[test]
    fn test_resolve_unknown_paths_to_dashboard() {
        assert_eq!(resolve("/students/").path, "/students");
        assert_eq!(resolve("/audit?page=2").path, "/audit");
        assert_eq!(resolve("/nowhere").path, "/");
        assert_eq!(resolve("").path, "/");
    }

    #[test]
    fn test_menu_hides_admin_entries() {
        let professor: Vec<_> = menu(&session(&[Role::Professor])).iter().map(|r| r.path).collect();
        assert_eq!(professor, vec!["/", "/students", "/courses", "/enrollments", "/attendance"]);

        let admin = menu(&session(&[Role::Admin]));
        assert_eq!(admin.len(), 7);
        assert!(admin.iter().any(|r| r.path == "/audit"));
    }

    #[test]
    fn test_redirect_to_login_then_back() {
        let nav = Navigator::new();
        let decision = nav.navigate(&SessionState::Anonymous, "/courses");
        assert_eq!(decision, GuardDecision::RedirectToLogin { from: "/courses".into() });
        assert_eq!(nav.location(), "/login");

        let state = SessionState::Authenticated(session(&[Role::Professor]));
        assert_eq!(nav.after_login(&state), "/courses");
        assert_eq!(nav.location(), "/courses");
        assert_eq!(nav.after_login(&state), "/");
    }

    #[test]
    fn test_forbidden_route_redirects_home() {
        let nav = Navigator::new();
        let state = SessionState::Authenticated(session(&[Role::Secretary]));
        nav.navigate(&state, "/students");
        assert_eq!(nav.navigate(&state, "/users"), GuardDecision::RedirectHome);
        assert_eq!(nav.location(), "/");
    }

    #[test]
    fn test_force_login_remembers_current_view() {
        let nav = Navigator::new();
        let state = SessionState::Authenticated(session(&[Role::Admin]));
        nav.navigate(&state, "/audit");
        nav.force_login();
        assert_eq!(nav.location(), "/login");
        assert_eq!(nav.after_login(&state), "/audit");
    }

    #[test]
    fn test_relogin_as_other_role_is_guarded() {
        let nav = Navigator::new();
        let admin = SessionState::Authenticated(session(&[Role::Admin]));
        nav.navigate(&admin, "/users");
        nav.force_login();

        let secretary = SessionState::Authenticated(session(&[Role::Secretary]));
        assert_eq!(nav.after_login(&secretary), "/");
        assert_eq!(nav.location(), "/");
        // The remembered view is consumed either way
        assert_eq!(nav.after_login(&admin), "/");
    }
}
