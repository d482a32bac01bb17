//! Role-based access decisions over the current session snapshot.
//!
//! The check is synchronous and trusts the locally stored user record; the
//! real authorization boundary is server-side. This gate only decides where
//! to send the user, it is not a security mechanism.

use crate::session::Session;

/// Outcome of a guard evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Render/run the guarded content.
    Allow,
    /// No token or no user: go to the login view.
    RedirectLogin,
    /// Authenticated but the role requirement is not met: go home.
    RedirectHome,
}

/// Evaluates access for an optional required role.
///
/// `None` means any authenticated user. `"admin"` requires the admin flag on
/// the user record. Any other role requires an exact match on the user's
/// role field; an absent role field never matches.
pub fn evaluate(required_role: Option<&str>, session: &Session) -> GuardOutcome {
    let Some(user) = session.user() else {
        return GuardOutcome::RedirectLogin;
    };
    if session.token().is_none() {
        return GuardOutcome::RedirectLogin;
    }

    match required_role {
        None => GuardOutcome::Allow,
        Some("admin") => {
            if user.is_admin {
                GuardOutcome::Allow
            } else {
                GuardOutcome::RedirectHome
            }
        }
        Some(role) => {
            if user.role.as_deref() == Some(role) {
                GuardOutcome::Allow
            } else {
                GuardOutcome::RedirectHome
            }
        }
    }
}
