use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let owned: Vec<(String, String)> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    move |key| owned.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
}

#[test]
fn new_trims_trailing_slash() {
    let config = PlatformConfig::new("https://demo.supabase.co/", "anon").unwrap();
    assert_eq!(config.url, "https://demo.supabase.co");
    assert_eq!(config.api_key, "anon");
    assert_eq!(config.timeouts, Timeouts::default());
}

#[test]
fn new_rejects_blank_key() {
    assert!(matches!(
        PlatformConfig::new("https://demo.supabase.co", "  "),
        Err(PlatformError::ConfigParse(_))
    ));
}

#[test]
fn new_rejects_relative_url() {
    assert!(matches!(PlatformConfig::new("demo.supabase.co", "anon"), Err(PlatformError::ConfigParse(_))));
}

#[test]
fn lookup_reads_primary_url_and_anon_key() {
    let lookup = lookup_from(&[("SUPABASE_URL", "https://a.supabase.co"), ("SUPABASE_ANON_KEY", "k1")]);
    let config = PlatformConfig::from_lookup(ANON_KEY_VAR, lookup).unwrap();
    assert_eq!(config.url, "https://a.supabase.co");
    assert_eq!(config.api_key, "k1");
}

#[test]
fn lookup_falls_back_to_public_url_var() {
    let lookup = lookup_from(&[
        ("NEXT_PUBLIC_SUPABASE_URL", "https://b.supabase.co"),
        ("SUPABASE_SERVICE_ROLE_KEY", "service"),
    ]);
    let config = PlatformConfig::from_lookup("SUPABASE_SERVICE_ROLE_KEY", lookup).unwrap();
    assert_eq!(config.url, "https://b.supabase.co");
    assert_eq!(config.api_key, "service");
}

#[test]
fn lookup_missing_url_names_primary_var() {
    let lookup = lookup_from(&[("SUPABASE_ANON_KEY", "k1")]);
    let err = PlatformConfig::from_lookup(ANON_KEY_VAR, lookup).unwrap_err();
    assert!(matches!(err, PlatformError::MissingConfig { ref var } if var == "SUPABASE_URL"));
}

#[test]
fn lookup_blank_key_counts_as_missing() {
    let lookup = lookup_from(&[("SUPABASE_URL", "https://a.supabase.co"), ("SUPABASE_ANON_KEY", "")]);
    let err = PlatformConfig::from_lookup(ANON_KEY_VAR, lookup).unwrap_err();
    assert!(matches!(err, PlatformError::MissingConfig { ref var } if var == "SUPABASE_ANON_KEY"));
}

#[test]
fn lookup_parses_timeouts_and_ignores_garbage() {
    let lookup = lookup_from(&[
        ("SUPABASE_URL", "https://a.supabase.co"),
        ("SUPABASE_ANON_KEY", "k1"),
        ("PLATFORM_REQUEST_TIMEOUT_SECS", "5"),
        ("PLATFORM_CONNECT_TIMEOUT_SECS", "soon"),
    ]);
    let config = PlatformConfig::from_lookup(ANON_KEY_VAR, lookup).unwrap();
    assert_eq!(config.timeouts.request_secs, 5);
    assert_eq!(config.timeouts.connect_secs, DEFAULT_CONNECT_TIMEOUT_SECS);
}
