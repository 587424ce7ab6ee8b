//! Dashboard: the signed-in user's image gallery.
//!
//! SYSTEM CONTEXT
//! ==============
//! This is the authenticated landing route. It reloads the gallery whenever
//! the signed-in user changes and after every successful upload or delete.
//! Each reload takes a generation from `GalleryState`, so an older listing
//! that finishes late is dropped. Every storage call takes its token from
//! `Services::user_storage`, which refreshes an access token close to expiry.

use leptos::prelude::*;

use crate::components::image_card::ImageCard;
use crate::net::api::Services;
use crate::state::auth::AuthState;
#[cfg(feature = "csr")]
use crate::state::gallery::StatusMessage;
use crate::state::gallery::{GalleryState, MessageKind};
#[cfg(feature = "csr")]
use crate::util::gallery::{GalleryError, GalleryListing, ListErrorCategory, Visibility};

/// Gallery page with upload, listing and delete.
#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let gallery = expect_context::<RwSignal<GalleryState>>();
    let services = use_context::<Option<Services>>().flatten();

    let user_id = Memo::new(move |_| auth.with(|a| a.user_id().map(str::to_owned)));

    let reload_services = services.clone();
    Effect::new(move || {
        user_id.track();
        gallery.update(GalleryState::reset);
        refresh_gallery(reload_services.clone(), auth, gallery);
    });

    let upload_services = services.clone();
    let on_file = move |ev: leptos::ev::Event| {
        #[cfg(feature = "csr")]
        {
            let input = event_target::<web_sys::HtmlInputElement>(&ev);
            let Some(file) = input.files().and_then(|files| files.get(0)) else {
                return;
            };
            input.set_value("");
            upload_file(upload_services.clone(), auth, gallery, file);
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (ev, &upload_services);
        }
    };

    let delete_services = services.clone();
    let on_delete = Callback::new(move |path: String| {
        delete_file(delete_services.clone(), auth, gallery, path);
    });

    let sign_out_services = services;
    let on_sign_out = move |_| {
        let Some(services) = sign_out_services.clone() else {
            return;
        };
        #[cfg(feature = "csr")]
        leptos::task::spawn_local(async move {
            if let Err(e) = services.mirror.sign_out().await {
                log::warn!("sign-out: {e}");
            }
        });
        #[cfg(not(feature = "csr"))]
        {
            let _ = services;
        }
    };

    let welcome = move || {
        auth.with(|a| {
            a.user
                .as_ref()
                .map(|u| format!("Welcome, {}", u.email.as_deref().unwrap_or_else(|| u.display_name())))
                .unwrap_or_default()
        })
    };
    let uploading = Signal::derive(move || gallery.with(|g| g.uploading));

    view! {
        <div class="dashboard">
            <header class="dashboard__header">
                <h1>"Image Gallery"</h1>
                <span class="dashboard__welcome">{welcome}</span>
                <button class="dashboard__sign-out" type="button" on:click=on_sign_out>
                    "Sign out"
                </button>
            </header>

            <section class="dashboard__upload">
                <label class="upload-button" class:upload-button--busy=move || uploading.get()>
                    {move || if uploading.get() { "Uploading..." } else { "Upload image" }}
                    <input
                        class="upload-button__input"
                        type="file"
                        accept="image/*"
                        disabled=move || uploading.get()
                        on:change=on_file
                    />
                </label>
                {move || {
                    gallery
                        .with(|g| g.message.clone())
                        .map(|message| {
                            let class = match message.kind {
                                MessageKind::Success => "status-message status-message--success",
                                MessageKind::Error => "status-message status-message--error",
                            };
                            view! { <p class=class>{message.text}</p> }
                        })
                }}
            </section>

            <section class="dashboard__gallery">
                {move || {
                    let state = gallery.get();
                    if let Some(error) = state.error {
                        return view! { <p class="gallery-error">{error}</p> }.into_any();
                    }
                    if state.loading && state.images.is_empty() {
                        return view! { <p class="gallery-loading">"Loading images..."</p> }.into_any();
                    }
                    if state.images.is_empty() {
                        return view! { <p class="gallery-empty">"No images yet. Upload one to get started."</p> }
                            .into_any();
                    }
                    let skipped = (state.failed > 0)
                        .then(|| {
                            view! {
                                <p class="gallery-skipped">
                                    {format!("{} image(s) could not be loaded.", state.failed)}
                                </p>
                            }
                        });
                    view! {
                        {skipped}
                        <div class="image-grid">
                            {state
                                .images
                                .into_iter()
                                .map(|image| view! { <ImageCard image=image on_delete=on_delete disabled=uploading/> })
                                .collect_view()}
                        </div>
                    }
                        .into_any()
                }}
            </section>
        </div>
    }
}

/// Start a gallery reload for the current user.
fn refresh_gallery(services: Option<Services>, auth: RwSignal<AuthState>, gallery: RwSignal<GalleryState>) {
    let Some(services) = services else {
        return;
    };
    if auth.with_untracked(|a| a.user_id().is_none()) {
        return;
    }
    let Some(generation) = gallery.try_update(GalleryState::begin_refresh) else {
        return;
    };

    #[cfg(feature = "csr")]
    leptos::task::spawn_local(async move {
        let result = load_with_retry(&services).await;
        gallery.try_update(|g| g.finish_refresh(generation, result));
    });
    #[cfg(not(feature = "csr"))]
    {
        let _ = (services, generation);
    }
}

/// List the user's images with a token that is fresh at call time. A listing
/// still rejected as expired gets one retry after a forced refresh; a
/// rejected refresh signs the user out.
#[cfg(feature = "csr")]
async fn load_with_retry(services: &Services) -> Result<GalleryListing, GalleryError> {
    use crate::util::clock::now_millis;
    use crate::util::gallery::load_gallery;

    let Some(user) = services.user_storage().await.map_err(GalleryError::new)? else {
        return Ok(GalleryListing { visibility: Visibility::Public, images: Vec::new(), failed: 0 });
    };
    let result = load_gallery(&user.client, &user.user_id, &services.gallery, now_millis()).await;
    if !matches!(&result, Err(e) if e.category == ListErrorCategory::Reauthenticate) {
        return result;
    }
    match services.mirror.refresh().await {
        Ok(Some(session)) => {
            let storage = services.platform.storage(session.access_token);
            load_gallery(&storage, &user.user_id, &services.gallery, now_millis()).await
        }
        Ok(None) => result,
        Err(e) => {
            log::warn!("token refresh after expired listing failed: {e}");
            result
        }
    }
}

#[cfg(feature = "csr")]
fn upload_file(
    services: Option<Services>,
    auth: RwSignal<AuthState>,
    gallery: RwSignal<GalleryState>,
    file: web_sys::File,
) {
    use crate::util::gallery::{UPLOAD_SUCCESS, upload_image};

    let Some(services) = services else {
        return;
    };
    gallery.update(|g| {
        g.uploading = true;
        g.message = None;
    });

    leptos::task::spawn_local(async move {
        let result = match services.user_storage().await {
            Ok(Some(user)) => match crate::util::browser::read_file(&file).await {
                Ok(bytes) => {
                    upload_image(&user.client, &user.user_id, &file.name(), &file.type_(), bytes, &services.gallery)
                        .await
                }
                Err(e) => Err(format!("Error uploading image: {e}")),
            },
            Ok(None) => Err(format!("Error uploading image: {}", ListErrorCategory::Reauthenticate.message())),
            Err(e) => Err(format!("Error uploading image: {}", e.message())),
        };
        let uploaded = result.is_ok();
        gallery.try_update(|g| {
            g.uploading = false;
            g.set_message(match result {
                Ok(_) => StatusMessage::success(UPLOAD_SUCCESS),
                Err(message) => StatusMessage::error(message),
            });
        });
        if uploaded {
            refresh_gallery(Some(services), auth, gallery);
        }
    });
}

fn delete_file(services: Option<Services>, auth: RwSignal<AuthState>, gallery: RwSignal<GalleryState>, path: String) {
    let Some(services) = services else {
        return;
    };
    gallery.update(|g| g.message = None);

    #[cfg(feature = "csr")]
    leptos::task::spawn_local(async move {
        let result = match services.user_storage().await {
            Ok(Some(user)) => crate::util::gallery::delete_image(&user.client, &path, &services.gallery).await,
            Ok(None) => Err(format!("Error deleting image: {}", ListErrorCategory::Reauthenticate.message())),
            Err(e) => Err(format!("Error deleting image: {}", e.message())),
        };
        match result {
            Ok(()) => refresh_gallery(Some(services), auth, gallery),
            Err(message) => {
                gallery.try_update(|g| g.set_message(StatusMessage::error(message)));
            }
        }
    });
    #[cfg(not(feature = "csr"))]
    {
        let _ = (services, auth, path);
    }
}
