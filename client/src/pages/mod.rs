//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration and delegates rendering details
//! to `components`. Access control happens in `app::Guarded`, never here.

pub mod dashboard;
pub mod login;
pub mod register;
