//! Protected-route gate.
//!
//! Decides what a role-restricted page shows given the current auth state.
//! This is navigation UX only; the server enforces authorization on every
//! request regardless.

use emarket_core::UserRole;

use crate::session::Session;

/// Where unauthenticated visitors are sent.
pub const LOGIN_PATH: &str = "/login";

/// What the gate knows about the visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AuthView {
    /// Auth state is still being restored.
    pub is_loading: bool,
    pub authenticated: bool,
    pub role: Option<UserRole>,
}

impl AuthView {
    /// Snapshot a session. A token without a known user counts as a
    /// customer.
    #[must_use]
    pub fn from_session(session: &Session) -> Self {
        let authenticated = session.is_authenticated();
        Self {
            is_loading: false,
            authenticated,
            role: authenticated.then(|| {
                session
                    .user()
                    .map_or(UserRole::Customer, |user| user.role)
            }),
        }
    }
}

/// The gate's verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Show a spinner; auth state isn't known yet.
    Loading,
    /// Navigate away.
    Redirect(&'static str),
    /// Show the page.
    Render,
}

/// Evaluate the gate for a page restricted to `allowed` roles.
///
/// An empty `allowed` list admits any authenticated visitor.
#[must_use]
pub fn evaluate(auth: &AuthView, allowed: &[UserRole]) -> GateDecision {
    if auth.is_loading {
        return GateDecision::Loading;
    }
    if !auth.authenticated {
        return GateDecision::Redirect(LOGIN_PATH);
    }

    let role = auth.role.unwrap_or_default();
    if allowed.is_empty() || allowed.contains(&role) {
        GateDecision::Render
    } else {
        GateDecision::Redirect(role.home_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionUser;
    use emarket_core::UserId;
    use secrecy::SecretString;

    fn signed_in(role: UserRole) -> AuthView {
        AuthView {
            is_loading: false,
            authenticated: true,
            role: Some(role),
        }
    }

    #[test]
    fn test_loading_wins() {
        let auth = AuthView {
            is_loading: true,
            ..signed_in(UserRole::Admin)
        };
        assert_eq!(evaluate(&auth, &[UserRole::Admin]), GateDecision::Loading);
    }

    #[test]
    fn test_anonymous_goes_to_login() {
        assert_eq!(
            evaluate(&AuthView::default(), &[UserRole::Customer]),
            GateDecision::Redirect("/login")
        );
    }

    #[test]
    fn test_wrong_role_goes_home() {
        assert_eq!(
            evaluate(&signed_in(UserRole::Customer), &[UserRole::Admin]),
            GateDecision::Redirect("/")
        );
        assert_eq!(
            evaluate(&signed_in(UserRole::Staff), &[UserRole::Admin]),
            GateDecision::Redirect("/staff/dashboard")
        );
        assert_eq!(
            evaluate(&signed_in(UserRole::Admin), &[UserRole::Staff]),
            GateDecision::Redirect("/admin/dashboard")
        );
    }

    #[test]
    fn test_allowed_role_renders() {
        assert_eq!(
            evaluate(&signed_in(UserRole::Staff), &[UserRole::Admin, UserRole::Staff]),
            GateDecision::Render
        );
        assert_eq!(evaluate(&signed_in(UserRole::Customer), &[]), GateDecision::Render);
    }

    #[test]
    fn test_view_from_session() {
        let session = Session::new();
        assert_eq!(AuthView::from_session(&session), AuthView::default());

        session.set_token(SecretString::from("t"));
        assert_eq!(AuthView::from_session(&session).role, Some(UserRole::Customer));

        session.sign_in(
            SecretString::from("t"),
            SessionUser {
                user_id: UserId::new(1),
                role: UserRole::Staff,
                full_name: None,
            },
        );
        assert_eq!(AuthView::from_session(&session).role, Some(UserRole::Staff));
    }
}
