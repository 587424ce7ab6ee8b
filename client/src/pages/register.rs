//! Registration page. Confirmation and length checks run before any
//! platform call.

use leptos::prelude::*;
use leptos_router::components::A;

use crate::components::oauth_buttons::OAuthButtons;
use crate::net::api::Services;
use crate::state::auth::AuthState;
use crate::util::forms;
use crate::util::guard::AppRoute;

#[component]
pub fn RegisterPage() -> impl IntoView {
    let services = use_context::<Option<Services>>().flatten();
    let auth = expect_context::<RwSignal<AuthState>>();
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let error = RwSignal::new(None::<String>);
    let notice = RwSignal::new(None::<&'static str>);
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        error.set(None);
        notice.set(None);
        // Local checks first so a bad form never reaches the auth service.
        let email_value = email.get_untracked();
        let password_value = password.get_untracked();
        let confirm_value = confirm.get_untracked();
        if let Err(message) = forms::validate_sign_up(&email_value, &password_value, &confirm_value) {
            error.set(Some(message.to_owned()));
            return;
        }
        let Some(services) = services.clone() else {
            error.set(Some(forms::NOT_CONFIGURED.to_owned()));
            return;
        };
        busy.set(true);

        #[cfg(feature = "csr")]
        leptos::task::spawn_local(async move {
            match forms::submit_sign_up(&services.mirror, &email_value, &password_value, &confirm_value).await {
                Ok(Some(message)) => {
                    notice.try_set(Some(message));
                }
                // Confirmed at once: publishing the session lets the guard
                // move on to the dashboard.
                Ok(None) => {
                    auth.try_set(services.mirror.current());
                }
                Err(message) => {
                    error.try_set(Some(message));
                }
            }
            busy.try_set(false);
        });
        #[cfg(not(feature = "csr"))]
        {
            let _ = (services, auth);
        }
    };

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>"Create account"</h1>
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
                        autocomplete="new-password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <input
                        class="auth-input"
                        type="password"
                        placeholder="Confirm password"
                        autocomplete="new-password"
                        prop:value=move || confirm.get()
                        on:input=move |ev| confirm.set(event_target_value(&ev))
                    />
                    <button class="auth-button" type="submit" disabled=move || busy.get()>
                        {move || if busy.get() { "Creating account..." } else { "Sign up" }}
                    </button>
                </form>
                <Show when=move || error.get().is_some()>
                    <p class="auth-message auth-message--error">{move || error.get().unwrap_or_default()}</p>
                </Show>
                <Show when=move || notice.get().is_some()>
                    <p class="auth-message auth-message--success">{move || notice.get().unwrap_or_default()}</p>
                </Show>
                <div class="auth-divider">"or"</div>
                <OAuthButtons providers=&forms::SIGN_UP_PROVIDERS error=error/>
                <p class="auth-switch">
                    "Already registered? "
                    <A href=AppRoute::Login.path()>"Sign in"</A>
                </p>
            </div>
        </div>
    }
}
