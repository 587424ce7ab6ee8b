//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render pieces shared by the auth screens and the dashboard,
//! reading shared state from Leptos context providers.

pub mod image_card;
pub mod oauth_buttons;
