//! Networking wiring for the platform REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` builds the shared [`api::Services`] bundle the app provides as
//! context: the platform client, the session mirror and gallery settings.

pub mod api;
