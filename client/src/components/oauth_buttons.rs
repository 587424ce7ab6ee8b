//! Third-party sign-in buttons for the auth screens.

use leptos::prelude::*;
use platform::types::OAuthProvider;

use crate::net::api::Services;
use crate::util::{browser, forms};

/// One button per provider. A click hands the browser to the provider;
/// failures land in `error`.
#[component]
pub fn OAuthButtons(providers: &'static [OAuthProvider], error: RwSignal<Option<String>>) -> impl IntoView {
    let services = use_context::<Option<Services>>().flatten();

    let start = move |provider: OAuthProvider| {
        let Some(services) = services.as_ref() else {
            error.set(Some(forms::NOT_CONFIGURED.to_owned()));
            return;
        };
        let return_to = forms::oauth_return_url(browser::origin().as_deref());
        match services.mirror.sign_in_with_oauth(provider, return_to.as_deref()) {
            Ok(url) => browser::redirect_to(&url),
            Err(e) => error.set(Some(forms::auth_error_message(&e))),
        }
    };

    view! {
        <div class="oauth-buttons">
            {providers
                .iter()
                .map(|&provider| {
                    let start = start.clone();
                    view! {
                        <button
                            type="button"
                            class=format!("oauth-button oauth-button--{}", provider.as_str())
                            on:click=move |_| start(provider)
                        >
                            {format!("Continue with {}", provider.label())}
                        </button>
                    }
                })
                .collect_view()}
        </div>
    }
}
