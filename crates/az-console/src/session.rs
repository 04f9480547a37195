//! Session Store
//!
//! Holds the console's record of who is signed in:
//! - `Loading` until the first who-am-I probe finishes
//! - `Authenticated` after a successful probe or login
//! - `Anonymous` after a failed probe, logout, or forced invalidation
//!
//! The store is the single writer of a versioned `watch` channel. Every
//! write bumps the version; readers take snapshots and re-read on change.

use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use az_client::{ApiError, AuthApi, CONNECTION_MESSAGE};
use az_common::role::{has_any_role, parse_roles};
use az_common::{validate, Capabilities, FieldErrors, LoginForm, Role, RoleSet, ValidationContext};

use crate::error::{AuthError, LOGIN_FAILED_MESSAGE};

/// The authenticated principal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub username: String,
    pub roles: RoleSet,
}

impl Session {
    pub fn capabilities(&self) -> Capabilities {
        Capabilities::from_roles(&self.roles)
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        has_any_role(&self.roles, roles)
    }

    /// Role labels for display next to the username
    pub fn role_labels(&self) -> Vec<&'static str> {
        self.roles.iter().map(Role::label).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Loading,
    Anonymous,
    Authenticated(Session),
}

impl SessionState {
    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionState::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }

    /// Capability flags; an anonymous or loading session has none
    pub fn capabilities(&self) -> Capabilities {
        self.session()
            .map(Session::capabilities)
            .unwrap_or_else(Capabilities::none)
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        self.session().map(|s| s.has_any_role(roles)).unwrap_or(false)
    }
}

/// Immutable view of the store at one version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub version: u64,
    pub state: SessionState,
}

pub struct SessionStore {
    auth: AuthApi,
    tx: watch::Sender<SessionSnapshot>,
    probed: AtomicBool,
}

impl SessionStore {
    pub fn new(auth: AuthApi) -> Self {
        let (tx, _) = watch::channel(SessionSnapshot {
            version: 0,
            state: SessionState::Loading,
        });
        Self {
            auth,
            tx,
            probed: AtomicBool::new(false),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.tx.borrow().clone()
    }

    pub fn state(&self) -> SessionState {
        self.tx.borrow().state.clone()
    }

    pub fn current(&self) -> Option<Session> {
        self.tx.borrow().state.session().cloned()
    }

    pub fn version(&self) -> u64 {
        self.tx.borrow().version
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.tx.subscribe()
    }

    pub fn capabilities(&self) -> Capabilities {
        self.tx.borrow().state.capabilities()
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.tx
            .borrow()
            .state
            .session()
            .map(|s| s.has_role(role))
            .unwrap_or(false)
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        self.tx.borrow().state.has_any_role(roles)
    }

    fn publish(&self, state: SessionState) {
        self.tx.send_modify(|snapshot| {
            snapshot.version += 1;
            snapshot.state = state;
        });
    }

    /// Ask the server who we are. Runs once; later calls return the
    /// current state without a request.
    pub async fn probe(&self) -> SessionState {
        if self.probed.swap(true, Ordering::SeqCst) {
            return self.state();
        }

        let next = match self.auth.me().await {
            Ok(response) => match response.username.filter(|u| !u.is_empty()) {
                Some(username) => SessionState::Authenticated(Session {
                    username,
                    roles: parse_roles(&response.roles),
                }),
                None => SessionState::Anonymous,
            },
            Err(e) => {
                debug!(error = %e, "Session probe failed");
                SessionState::Anonymous
            }
        };

        // A login that finished first wins; the probe only leaves Loading
        self.tx.send_if_modified(|snapshot| {
            if snapshot.state.is_loading() {
                snapshot.version += 1;
                snapshot.state = next;
                true
            } else {
                false
            }
        });

        let state = self.state();
        info!(authenticated = state.is_authenticated(), "Session probe complete");
        state
    }

    pub async fn login(&self, form: &LoginForm) -> Result<Session, AuthError> {
        validate(form, &ValidationContext::create()).map_err(AuthError::Validation)?;

        match self.auth.login(&form.username, &form.password).await {
            Ok(response) => {
                let session = Session {
                    username: response
                        .username
                        .filter(|u| !u.is_empty())
                        .unwrap_or_else(|| form.username.clone()),
                    roles: parse_roles(&response.roles),
                };
                info!(username = %session.username, roles = ?session.roles, "Logged in");
                self.probed.store(true, Ordering::SeqCst);
                self.publish(SessionState::Authenticated(session.clone()));
                Ok(session)
            }
            Err(ApiError::Status { status, body }) => {
                debug!(status, "Login rejected");
                Err(AuthError::BadCredentials {
                    message: body
                        .message
                        .clone()
                        .filter(|m| !m.is_empty())
                        .unwrap_or_else(|| LOGIN_FAILED_MESSAGE.to_string()),
                    field_errors: body
                        .field_errors()
                        .map(|m| FieldErrors::from(m.clone()))
                        .unwrap_or_default(),
                })
            }
            Err(e) => {
                warn!(error = %e, "Login request failed");
                Err(AuthError::Connection(CONNECTION_MESSAGE.to_string()))
            }
        }
    }

    /// End the session. The local session is cleared even if the server
    /// call fails.
    pub async fn logout(&self) {
        if let Err(e) = self.auth.logout().await {
            warn!(error = %e, "Logout request failed; clearing session anyway");
        }
        self.probed.store(true, Ordering::SeqCst);
        self.publish(SessionState::Anonymous);
        info!("Logged out");
    }

    /// Drop an authenticated session after the server rejected it.
    /// Returns whether anything changed.
    pub fn invalidate(&self) -> bool {
        self.tx.send_if_modified(|snapshot| {
            if snapshot.state.is_authenticated() {
                snapshot.version += 1;
                snapshot.state = SessionState::Anonymous;
                true
            } else {
                false
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use az_client::{ApiGateway, GatewayConfig};

    fn store() -> SessionStore {
        let gateway = ApiGateway::new(GatewayConfig::with_base_url("http://127.0.0.1:9/api")).unwrap();
        SessionStore::new(AuthApi::new(gateway))
    }

    #[test]
    fn test_starts_loading_without_capabilities() {
        let store = store();
        let snapshot = store.snapshot();
        assert_eq!(snapshot.version, 0);
        assert!(snapshot.state.is_loading());
        assert_eq!(store.capabilities(), Capabilities::none());
    }

    #[tokio::test]
    async fn test_login_with_blank_fields_sends_nothing() {
        let store = store();
        let err = store.login(&LoginForm::default()).await.unwrap_err();
        let fields = err.field_errors().unwrap();
        assert!(fields.contains("username"));
        assert!(fields.contains("password"));
        assert_eq!(store.version(), 0);
    }

    #[test]
    fn test_invalidate_only_affects_authenticated() {
        let store = store();
        assert!(!store.invalidate());

        store.publish(SessionState::Authenticated(Session {
            username: "admin".into(),
            roles: [Role::Admin].into_iter().collect(),
        }));
        assert!(store.has_role(Role::Admin));
        assert!(store.capabilities().can_delete);

        let version = store.version();
        assert!(store.invalidate());
        assert_eq!(store.version(), version + 1);
        assert_eq!(store.state(), SessionState::Anonymous);
        assert!(!store.invalidate());
    }

    #[test]
    fn test_role_labels() {
        let session = Session {
            username: "ana".into(),
            roles: [Role::Professor, Role::Secretary].into_iter().collect(),
        };
        assert_eq!(session.role_labels(), vec!["Secretariat", "Profesor"]);
        assert!(session.capabilities().can_create);
        assert!(!session.capabilities().can_delete);
    }
}
