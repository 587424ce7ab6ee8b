use std::collections::HashMap;

use platform::types::{Session, User};

use super::*;
use crate::state::session::MemoryPersistence;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    move |key| map.get(key).cloned()
}

fn persistence() -> Arc<dyn SessionPersistence> {
    Arc::new(MemoryPersistence::default())
}

#[test]
fn services_build_from_url_and_anon_key() {
    let services = Services::from_lookup(
        lookup(&[("SUPABASE_URL", "https://demo.supabase.co/"), ("SUPABASE_ANON_KEY", "anon")]),
        persistence(),
    )
    .unwrap();
    assert_eq!(services.platform.config().url, "https://demo.supabase.co");
    assert_eq!(services.gallery, GalleryConfig::default());
}

#[test]
fn missing_anon_key_is_a_config_error() {
    let err = Services::from_lookup(lookup(&[("SUPABASE_URL", "https://demo.supabase.co")]), persistence())
        .err()
        .unwrap();
    assert!(matches!(err, PlatformError::MissingConfig { ref var } if var == "SUPABASE_ANON_KEY"));
}

fn services_with(persistence: Arc<dyn SessionPersistence>) -> Services {
    Services::from_lookup(
        lookup(&[("NEXT_PUBLIC_SUPABASE_URL", "https://demo.supabase.co"), ("SUPABASE_ANON_KEY", "anon")]),
        persistence,
    )
    .unwrap()
}

#[tokio::test]
async fn user_storage_requires_a_session() {
    let services = services_with(persistence());
    services.mirror.initialize(None).await;
    assert!(services.user_storage().await.unwrap().is_none());
}

#[tokio::test]
async fn user_storage_is_bound_to_the_signed_in_user() {
    let user: User = serde_json::from_value(serde_json::json!({ "id": "u1", "email": "a@b.c" })).unwrap();
    let session = Session {
        access_token: "at".to_owned(),
        refresh_token: "rt".to_owned(),
        token_type: "bearer".to_owned(),
        expires_in: 3600,
        expires_at: Some(crate::util::clock::now_secs() + 3600),
        user,
    };
    let services = services_with(Arc::new(MemoryPersistence::with_session(session)));
    services.mirror.initialize(None).await;

    let storage = services.user_storage().await.unwrap().unwrap();
    assert_eq!(storage.user_id, "u1");
}

#[test]
fn unknown_build_variables_are_absent() {
    assert!(build_env("SUPABASE_SERVICE_ROLE_KEY").is_none());
}
