//! Upload naming and client-side admission checks.
//!
//! Stored objects live at `{userId}/{random}.{ext}`; the original file name
//! only contributes its extension.

#[cfg(test)]
#[path = "upload_test.rs"]
mod upload_test;

/// Largest upload the bucket accepts (5 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

pub const NOT_AN_IMAGE: &str = "Only image files can be uploaded.";
pub const TOO_LARGE: &str = "Images must be 5 MB or smaller.";

/// Extension after the last `.`, if any.
#[must_use]
pub fn file_extension(file_name: &str) -> Option<&str> {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
}

/// Fresh random object name keeping `ext`.
#[must_use]
pub fn random_object_name(ext: Option<&str>) -> String {
    let token = uuid::Uuid::new_v4().simple().to_string();
    match ext {
        Some(ext) => format!("{token}.{ext}"),
        None => token,
    }
}

/// Storage path for a new upload of `file_name` by `user_id`.
#[must_use]
pub fn object_path(user_id: &str, file_name: &str) -> String {
    format!("{user_id}/{}", random_object_name(file_extension(file_name)))
}

/// MIME type for common image extensions.
#[must_use]
pub fn image_content_type(file_name: &str) -> Option<&'static str> {
    let ext = file_extension(file_name)?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "avif" => "image/avif",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "heic" => "image/heic",
        _ => return None,
    };
    Some(mime)
}

/// Admit an upload: it must be an image no larger than [`MAX_UPLOAD_BYTES`].
/// The browser-declared type wins over the extension when it names an image.
///
/// # Errors
///
/// Returns the message to show when the file is rejected.
pub fn validate_upload(file_name: &str, declared_type: &str, size: u64) -> Result<String, &'static str> {
    let content_type = if declared_type.starts_with("image/") {
        declared_type.to_owned()
    } else {
        image_content_type(file_name).ok_or(NOT_AN_IMAGE)?.to_owned()
    };
    if size > MAX_UPLOAD_BYTES {
        return Err(TOO_LARGE);
    }
    Ok(content_type)
}
