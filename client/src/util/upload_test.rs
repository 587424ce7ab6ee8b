use super::*;

#[test]
fn extension_is_text_after_last_dot() {
    assert_eq!(file_extension("photo.png"), Some("png"));
    assert_eq!(file_extension("archive.tar.gz"), Some("gz"));
    assert_eq!(file_extension("README"), None);
    assert_eq!(file_extension("trailing."), None);
}

#[test]
fn object_path_keeps_user_prefix_and_extension() {
    let path = object_path("user-1", "holiday.JPG");
    let (prefix, name) = path.split_once('/').unwrap();
    assert_eq!(prefix, "user-1");
    let (stem, ext) = name.rsplit_once('.').unwrap();
    assert_eq!(ext, "JPG");
    assert_eq!(stem.len(), 32);
    assert!(stem.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn object_names_are_unique() {
    assert_ne!(object_path("u", "a.png"), object_path("u", "a.png"));
}

#[test]
fn object_path_without_extension_has_no_dot() {
    let path = object_path("u", "scan");
    assert!(!path.split_once('/').unwrap().1.contains('.'));
}

#[test]
fn content_type_from_extension() {
    assert_eq!(image_content_type("a.jpeg"), Some("image/jpeg"));
    assert_eq!(image_content_type("A.PNG"), Some("image/png"));
    assert_eq!(image_content_type("notes.txt"), None);
}

#[test]
fn validate_prefers_declared_image_type() {
    assert_eq!(validate_upload("photo", "image/png", 10), Ok("image/png".to_owned()));
}

#[test]
fn validate_falls_back_to_extension() {
    assert_eq!(validate_upload("photo.webp", "", 10), Ok("image/webp".to_owned()));
}

#[test]
fn validate_rejects_non_images() {
    assert_eq!(validate_upload("notes.txt", "text/plain", 10), Err(NOT_AN_IMAGE));
}

#[test]
fn validate_enforces_size_limit() {
    assert!(validate_upload("a.png", "image/png", MAX_UPLOAD_BYTES).is_ok());
    assert_eq!(validate_upload("a.png", "image/png", MAX_UPLOAD_BYTES + 1), Err(TOO_LARGE));
}
