//! Single gallery tile with its delete control.

use leptos::prelude::*;

use crate::util::gallery::ResolvedImage;

/// An image tile. `on_delete` receives the object path, never the URL.
#[component]
pub fn ImageCard(image: ResolvedImage, on_delete: Callback<String>, #[prop(into)] disabled: Signal<bool>) -> impl IntoView {
    let path = image.path.clone();
    view! {
        <figure class="image-card">
            <img class="image-card__img" src=image.url alt=image.name.clone() loading="lazy"/>
            <figcaption class="image-card__caption">
                <span class="image-card__name">{image.name}</span>
                <button
                    class="image-card__delete"
                    type="button"
                    disabled=move || disabled.get()
                    on:click=move |_| on_delete.run(path.clone())
                >
                    "Delete"
                </button>
            </figcaption>
        </figure>
    }
}
