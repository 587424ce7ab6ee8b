//! # client
//!
//! Leptos + WASM frontend for the photo gallery: email/password and OAuth
//! sign-in, and a per-user dashboard that uploads, lists and deletes images
//! held by the hosted storage platform.
//!
//! Browser-independent logic (session mirror, route guard, form checks,
//! gallery resolution) lives in `state` and `util` and is unit-tested on the
//! host; `pages` and `components` wire it into the reactive UI.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: install console logging and mount the app.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::mount_to_body(app::App);
}
