use super::*;

const BASE: &str = "https://demo.supabase.co";

#[test]
fn public_url_points_at_public_object_route() {
    assert_eq!(
        public_object_url(BASE, "images", "u-1/0.5.png"),
        "https://demo.supabase.co/storage/v1/object/public/images/u-1/0.5.png"
    );
}

#[test]
fn public_url_ignores_leading_slash_in_path() {
    assert_eq!(
        public_object_url(BASE, "images", "/u-1/a.png"),
        "https://demo.supabase.co/storage/v1/object/public/images/u-1/a.png"
    );
}

#[test]
fn signed_url_is_prefixed_with_storage_root() {
    assert_eq!(
        absolute_signed_url(BASE, "/object/sign/images/u-1/a.png?token=abc"),
        "https://demo.supabase.co/storage/v1/object/sign/images/u-1/a.png?token=abc"
    );
}

#[test]
fn absolute_signed_url_is_kept() {
    let url = "https://cdn.example.com/object/sign/images/a.png?token=abc";
    assert_eq!(absolute_signed_url(BASE, url), url);
}

#[test]
fn sign_response_accepts_both_key_spellings() {
    let a: SignResponse = serde_json::from_str(r#"{"signedURL":"/object/sign/x"}"#).unwrap();
    let b: SignResponse = serde_json::from_str(r#"{"signedUrl":"/object/sign/y"}"#).unwrap();
    assert_eq!(a.signed_url, "/object/sign/x");
    assert_eq!(b.signed_url, "/object/sign/y");
}

#[test]
fn update_bucket_body_flattens_options() {
    let options = BucketOptions {
        public: true,
        file_size_limit: Some(5 * 1024 * 1024),
        allowed_mime_types: Some(vec!["image/*".to_owned()]),
    };
    let body = serde_json::to_value(UpdateBucketRequest { id: "images", name: "images", options: &options }).unwrap();
    assert_eq!(
        body,
        serde_json::json!({
            "id": "images",
            "name": "images",
            "public": true,
            "file_size_limit": 5_242_880,
            "allowed_mime_types": ["image/*"]
        })
    );
}

#[test]
fn remove_body_lists_prefixes() {
    let paths = vec!["u-1/a.png".to_owned()];
    let body = serde_json::to_value(RemoveRequest { prefixes: &paths }).unwrap();
    assert_eq!(body, serde_json::json!({ "prefixes": ["u-1/a.png"] }));
}
