//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! `auth` is the snapshot the UI renders, `session` owns the single writer
//! that produces those snapshots, and `gallery` holds dashboard data.

pub mod auth;
pub mod gallery;
pub mod session;
