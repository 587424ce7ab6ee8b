//! Route guard decisions.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every route is wrapped by the `Guarded` component in `app`, which asks
//! [`decide`] what to do each time the auth snapshot changes.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use crate::state::auth::AuthState;

/// Coarse auth status seen by the router.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardState {
    Loading,
    Authenticated,
    Unauthenticated,
}

impl GuardState {
    #[must_use]
    pub fn from_auth(state: &AuthState) -> Self {
        if state.loading {
            Self::Loading
        } else if state.user.is_some() {
            Self::Authenticated
        } else {
            Self::Unauthenticated
        }
    }
}

/// Client-side routes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppRoute {
    Root,
    Login,
    Register,
    Dashboard,
}

impl AppRoute {
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Root => "/",
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Dashboard => "/dashboard",
        }
    }
}

/// What a guarded route should render.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteDecision {
    /// Auth still loading: show the placeholder, render nothing else.
    Placeholder,
    Render,
    Redirect(AppRoute),
}

/// Signed-in users are kept away from the auth screens; signed-out users
/// away from the dashboard.
#[must_use]
pub fn decide(state: GuardState, route: AppRoute) -> RouteDecision {
    match (state, route) {
        (GuardState::Loading, _) => RouteDecision::Placeholder,
        (GuardState::Authenticated, AppRoute::Root | AppRoute::Login | AppRoute::Register) => {
            RouteDecision::Redirect(AppRoute::Dashboard)
        }
        (GuardState::Unauthenticated, AppRoute::Root | AppRoute::Dashboard) => RouteDecision::Redirect(AppRoute::Login),
        (GuardState::Authenticated, AppRoute::Dashboard)
        | (GuardState::Unauthenticated, AppRoute::Login | AppRoute::Register) => RouteDecision::Render,
    }
}
