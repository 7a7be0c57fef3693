//! Image attachments for profile photos and company logos
//!
//! Images are stored inline in the profile as `data:` URLs.

use crate::error::MediaError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::Path;

/// Largest accepted image, in megabytes
pub const MAX_IMAGE_MB: u64 = 5;

const MAX_IMAGE_BYTES: u64 = MAX_IMAGE_MB * 1024 * 1024;

/// MIME type for an accepted image extension
fn image_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// Read an image file and encode it as a `data:` URL
pub async fn attach_image(path: impl AsRef<Path>) -> Result<String, MediaError> {
    let path = path.as_ref();
    let mime = image_mime(path).ok_or(MediaError::NotAnImage)?;

    let size = tokio::fs::metadata(path).await?.len();
    if size > MAX_IMAGE_BYTES {
        return Err(MediaError::TooLarge {
            max_mb: MAX_IMAGE_MB,
        });
    }

    let bytes = tokio::fs::read(path).await?;
    tracing::debug!("Attached {} ({} bytes)", path.display(), bytes.len());
    Ok(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
}
