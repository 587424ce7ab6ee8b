//! Root application component with routing and context providers.
//!
//! SYSTEM CONTEXT
//! ==============
//! `App` owns three contexts: the auth snapshot signal, the gallery state
//! signal and the optional platform [`Services`]. A background bridge copies
//! every state published by the session mirror into the auth signal; routes
//! only ever read that signal.

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::hooks::use_navigate;
use leptos_router::{
    NavigateOptions, StaticSegment,
    components::{Route, Router, Routes},
};
use platform::types::AuthChangeEvent;

use crate::net::api::Services;
use crate::pages::{dashboard::DashboardPage, login::LoginPage, register::RegisterPage};
use crate::state::auth::AuthState;
use crate::state::gallery::GalleryState;
use crate::util::guard::{AppRoute, GuardState, RouteDecision, decide};

/// Root application component.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let auth = RwSignal::new(AuthState::default());
    let gallery = RwSignal::new(GalleryState::default());
    let services = match Services::from_build_env() {
        Ok(services) => Some(services),
        Err(e) => {
            log::error!("platform is not configured: {e}");
            None
        }
    };

    provide_context(auth);
    provide_context(gallery);
    provide_context(services.clone());

    start_session_bridge(services, auth);

    view! {
        <Title text="Image Gallery"/>

        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("") view=|| view! { <Guarded route=AppRoute::Root/> }/>
                <Route
                    path=StaticSegment("login")
                    view=|| view! { <Guarded route=AppRoute::Login><LoginPage/></Guarded> }
                />
                <Route
                    path=StaticSegment("register")
                    view=|| view! { <Guarded route=AppRoute::Register><RegisterPage/></Guarded> }
                />
                <Route
                    path=StaticSegment("dashboard")
                    view=|| view! { <Guarded route=AppRoute::Dashboard><DashboardPage/></Guarded> }
                />
            </Routes>
        </Router>
    }
}

/// Restore the session once, then mirror every published state into `auth`
/// until the signal is disposed.
fn start_session_bridge(services: Option<Services>, auth: RwSignal<AuthState>) {
    let Some(services) = services else {
        auth.set(AuthState::from_event(AuthChangeEvent::InitialSession, None));
        return;
    };
    #[cfg(feature = "csr")]
    leptos::task::spawn_local(async move {
        let mirror = services.mirror;
        let mut subscription = mirror.subscribe();
        mirror
            .initialize(crate::util::browser::take_redirect_tokens())
            .await;
        while let Some(state) = subscription.changed().await {
            if auth.try_set(state).is_some() {
                log::debug!("auth signal disposed, stopping session bridge");
                break;
            }
        }
    });
    #[cfg(not(feature = "csr"))]
    {
        let _ = services;
    }
}

/// Applies the route guard: a placeholder while auth loads, a redirect when
/// the route is not allowed in the current state, else the page.
#[component]
fn Guarded(route: AppRoute, #[prop(optional)] children: Option<ChildrenFn>) -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let navigate = use_navigate();
    let decision = Memo::new(move |_| decide(GuardState::from_auth(&auth.get()), route));

    Effect::new(move || {
        if let RouteDecision::Redirect(target) = decision.get() {
            navigate(target.path(), NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });

    move || match decision.get() {
        RouteDecision::Placeholder => view! { <div class="loading">"Loading..."</div> }.into_any(),
        RouteDecision::Render => children.as_ref().map(|c| c()).into_any(),
        RouteDecision::Redirect(_) => ().into_any(),
    }
}
