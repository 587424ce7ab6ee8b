//! Typed REST client for the hosted auth + storage platform.
//!
//! This crate owns every call the gallery makes to the backend-as-a-service:
//! password and OAuth sign-in, token refresh, bucket metadata, object
//! listing, URL signing, uploads, removals, and the administrative bucket
//! and CORS configuration used by the maintenance CLI.
//!
//! ARCHITECTURE
//! ============
//! `client::PlatformClient` owns the shared HTTP core. `auth` and `storage`
//! layer endpoint groups on top of it, and `api` defines the traits the UI
//! logic depends on so it can be exercised against in-memory fakes.

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod storage;
pub mod types;

pub use api::{AuthApi, StorageAdminApi, StorageApi};
pub use auth::AuthClient;
pub use client::PlatformClient;
pub use config::PlatformConfig;
pub use error::{ApiError, ErrorKind, PlatformError};
pub use storage::StorageClient;
