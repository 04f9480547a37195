//! Access Guard
//!
//! Pure decisions over the session state; navigation is left to the caller.

use az_common::Role;

use crate::session::SessionState;

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session still loading; render nothing else and do not redirect
    Wait,
    /// Not signed in; come back to `from` after login
    RedirectToLogin { from: String },
    /// Signed in without any of the required roles
    RedirectHome,
    Render,
}

/// Decide what to do with a request for `location`.
/// `required` of `None` or empty means any signed-in user.
pub fn guard(state: &SessionState, required: Option<&[Role]>, location: &str) -> GuardDecision {
    match state {
        SessionState::Loading => GuardDecision::Wait,
        SessionState::Anonymous => GuardDecision::RedirectToLogin {
            from: location.to_string(),
        },
        SessionState::Authenticated(session) => match required {
            Some(roles) if !roles.is_empty() && !session.has_any_role(roles) => GuardDecision::RedirectHome,
            _ => GuardDecision::Render,
        },
    }
}

/// Inline variant: `content` when the session holds one of `roles`,
/// otherwise `fallback`
pub fn role_gate<T>(state: &SessionState, roles: &[Role], content: T, fallback: T) -> T {
    if state.has_any_role(roles) {
        content
    } else {
        fallback
    }
}
