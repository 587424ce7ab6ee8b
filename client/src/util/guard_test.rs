use platform::types::{AuthChangeEvent, Session, User};

use super::*;

const ALL_ROUTES: [AppRoute; 4] = [AppRoute::Root, AppRoute::Login, AppRoute::Register, AppRoute::Dashboard];

fn signed_in() -> AuthState {
    let session = Session {
        access_token: "at".to_owned(),
        refresh_token: "rt".to_owned(),
        token_type: "bearer".to_owned(),
        expires_in: 3600,
        expires_at: None,
        user: User { id: "u1".to_owned(), email: None, user_metadata: serde_json::Map::new(), created_at: None },
    };
    AuthState::from_event(AuthChangeEvent::SignedIn, Some(session))
}

// =============================================================
// GuardState
// =============================================================

#[test]
fn guard_state_follows_auth_snapshot() {
    assert_eq!(GuardState::from_auth(&AuthState::default()), GuardState::Loading);
    assert_eq!(GuardState::from_auth(&signed_in()), GuardState::Authenticated);
    assert_eq!(
        GuardState::from_auth(&AuthState::from_event(AuthChangeEvent::SignedOut, None)),
        GuardState::Unauthenticated
    );
}

// =============================================================
// decide
// =============================================================

#[test]
fn loading_blocks_every_route() {
    for route in ALL_ROUTES {
        assert_eq!(decide(GuardState::Loading, route), RouteDecision::Placeholder);
    }
}

#[test]
fn authenticated_users_leave_auth_screens() {
    for route in [AppRoute::Root, AppRoute::Login, AppRoute::Register] {
        assert_eq!(decide(GuardState::Authenticated, route), RouteDecision::Redirect(AppRoute::Dashboard));
    }
    assert_eq!(decide(GuardState::Authenticated, AppRoute::Dashboard), RouteDecision::Render);
}

#[test]
fn unauthenticated_users_are_sent_to_login() {
    assert_eq!(decide(GuardState::Unauthenticated, AppRoute::Dashboard), RouteDecision::Redirect(AppRoute::Login));
    assert_eq!(decide(GuardState::Unauthenticated, AppRoute::Root), RouteDecision::Redirect(AppRoute::Login));
    assert_eq!(decide(GuardState::Unauthenticated, AppRoute::Login), RouteDecision::Render);
    assert_eq!(decide(GuardState::Unauthenticated, AppRoute::Register), RouteDecision::Render);
}

#[test]
fn sign_in_makes_dashboard_reachable() {
    let before = GuardState::from_auth(&AuthState::from_event(AuthChangeEvent::InitialSession, None));
    assert_ne!(decide(before, AppRoute::Dashboard), RouteDecision::Render);
    let after = GuardState::from_auth(&signed_in());
    assert_eq!(decide(after, AppRoute::Dashboard), RouteDecision::Render);
}

#[test]
fn route_paths() {
    assert_eq!(AppRoute::Root.path(), "/");
    assert_eq!(AppRoute::Dashboard.path(), "/dashboard");
}
