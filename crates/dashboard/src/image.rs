use std::path::Path;

use hayah_core::HayahError;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

/// Lowercased extension if it is one of the accepted image types
pub fn image_extension(path: &Path) -> Result<String, HayahError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(HayahError::Validation(format!(
            "Unsupported image type, use one of: {}",
            IMAGE_EXTENSIONS.join(", ")
        )))
    }
}

pub fn check_image_size(len: u64) -> Result<(), HayahError> {
    if len > MAX_IMAGE_BYTES {
        return Err(HayahError::Validation(
            "Image must be at most 5 MB".to_string(),
        ));
    }
    Ok(())
}
