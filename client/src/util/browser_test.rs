use super::*;

#[test]
fn hash_with_tokens_yields_redirect_tokens() {
    let tokens = redirect_tokens_from_hash("#access_token=at&refresh_token=rt&expires_in=3600&token_type=bearer")
        .expect("tokens");
    assert_eq!(tokens.access_token, "at");
    assert_eq!(tokens.refresh_token, "rt");
}

#[test]
fn provider_error_in_hash_yields_nothing() {
    assert!(redirect_tokens_from_hash("#error=access_denied&error_description=User+cancelled").is_none());
}

#[test]
fn empty_hash_yields_nothing() {
    assert!(redirect_tokens_from_hash("").is_none());
    assert!(redirect_tokens_from_hash("#").is_none());
}

#[test]
fn local_storage_persistence_is_inert_off_browser() {
    let persistence = LocalStoragePersistence::default();
    assert!(persistence.load().is_none());
    persistence.clear();
    assert!(persistence.load().is_none());
}
