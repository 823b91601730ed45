//! Image decoding and batch folder listing
//!
//! Loading goes through a plain byte read followed by an in-memory decode,
//! so paths with non-ASCII characters behave the same on every platform.
//! Decode failures map to the `ImageReadError` outcome at the batch
//! boundary; they never abort a run.

use std::path::{Path, PathBuf};

use opencv::{
    core::{Mat, Vector},
    imgcodecs::{imdecode, IMREAD_COLOR},
    prelude::*,
};

use crate::error::{ClassifyError, Result};

/// Check a path against the configured extension list (case-insensitive)
pub fn is_supported(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_lowercase();
            extensions.iter().any(|supported| *supported == ext)
        })
        .unwrap_or(false)
}

/// Load one image as a BGR Mat.
///
/// # Errors
///
/// [`ClassifyError::ImageRead`] when the file cannot be read or its bytes do
/// not decode as an image.
pub fn load_image(path: &Path) -> Result<Mat> {
    let bytes = std::fs::read(path)
        .map_err(|e| ClassifyError::image_read(path.display().to_string(), e))?;

    let buffer = Vector::<u8>::from_slice(&bytes);
    let image = imdecode(&buffer, IMREAD_COLOR)
        .map_err(|e| ClassifyError::opencv("imdecode", e))?;

    if image.empty() {
        return Err(ClassifyError::ImageRead {
            message: format!("{} is not a decodable image", path.display()),
            source: None,
        });
    }
    Ok(image)
}

/// List the supported image files directly inside `dir`, sorted by name so
/// batch runs process (and report) in a stable order.
pub fn list_image_files(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| ClassifyError::image_read(format!("folder {}", dir.display()), e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry =
            entry.map_err(|e| ClassifyError::image_read(format!("folder {}", dir.display()), e))?;
        let path = entry.path();
        if path.is_file() && is_supported(&path, extensions) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extensions() -> Vec<String> {
        vec!["jpeg".into(), "jpg".into(), "png".into()]
    }

    #[test]
    fn test_supported_extensions() {
        assert!(is_supported(Path::new("sign.png"), &extensions()));
        assert!(is_supported(Path::new("sign.JPG"), &extensions()));
        assert!(is_supported(Path::new("dir/sign.jpeg"), &extensions()));
        assert!(!is_supported(Path::new("sign.bmp"), &extensions()));
        assert!(!is_supported(Path::new("sign"), &extensions()));
        assert!(!is_supported(Path::new(".png"), &extensions()));
    }

    #[test]
    fn test_load_missing_file_is_image_read_error() {
        let err = load_image(Path::new("nonexistent_sign.png")).unwrap_err();
        assert!(matches!(err, ClassifyError::ImageRead { .. }));
    }
}
