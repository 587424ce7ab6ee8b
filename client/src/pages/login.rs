//! Sign-in page: email + password, plus third-party providers.

use leptos::prelude::*;
#[cfg(feature = "csr")]
use leptos_router::NavigateOptions;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;

use crate::components::oauth_buttons::OAuthButtons;
use crate::net::api::Services;
use crate::state::auth::AuthState;
use crate::util::forms;
use crate::util::guard::AppRoute;

#[component]
pub fn LoginPage() -> impl IntoView {
    let services = use_context::<Option<Services>>().flatten();
    let auth = expect_context::<RwSignal<AuthState>>();
    let navigate = use_navigate();
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let error = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let Some(services) = services.clone() else {
            error.set(Some(forms::NOT_CONFIGURED.to_owned()));
            return;
        };
        let email_value = email.get_untracked();
        let password_value = password.get_untracked();
        let navigate = navigate.clone();
        busy.set(true);
        error.set(None);

        #[cfg(feature = "csr")]
        leptos::task::spawn_local(async move {
            match forms::submit_sign_in(&services.mirror, &email_value, &password_value).await {
                Ok(state) => {
                    // Publish before navigating; the session bridge may lag.
                    auth.try_set(state);
                    navigate(AppRoute::Dashboard.path(), NavigateOptions::default());
                }
                Err(message) => {
                    error.try_set(Some(message));
                }
            }
            busy.try_set(false);
        });
        #[cfg(not(feature = "csr"))]
        {
            let _ = (services, email_value, password_value, navigate, auth);
        }
    };

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>"Sign in"</h1>
                <form class="auth-form" on:submit=on_submit>
                    <input
                        class="auth-input"
                        type="email"
                        placeholder="you@example.com"
                        autocomplete="email"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <input
                        class="auth-input"
                        type="password"
                        placeholder="Password"
                        autocomplete="current-password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <button class="auth-button" type="submit" disabled=move || busy.get()>
                        {move || if busy.get() { "Signing in..." } else { "Sign in" }}
                    </button>
                </form>
                <Show when=move || error.get().is_some()>
                    <p class="auth-message auth-message--error">{move || error.get().unwrap_or_default()}</p>
                </Show>
                <div class="auth-divider">"or"</div>
                <OAuthButtons providers=&forms::SIGN_IN_PROVIDERS error=error/>
                <p class="auth-switch">
                    "No account yet? "
                    <A href=AppRoute::Register.path()>"Create one"</A>
                </p>
            </div>
        </div>
    }
}
