//! Local storage of company logos.
//!
//! Picked images are copied into the app-private data directory and referred
//! to by a `file://` URI, which is what the company record stores.

use crate::errors::{Error, Result};
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::info;

/// Subdirectory of the app data directory holding company logos.
pub const COMPANY_IMAGE_DIR: &str = "images/company";

/// Path a logo saved at `millis` would be written to.
#[must_use]
pub fn company_logo_path(app_data_dir: &Path, millis: i64) -> PathBuf {
    app_data_dir
        .join(COMPANY_IMAGE_DIR)
        .join(format!("company_logo_{millis}.jpg"))
}

/// Copies `source` into the logo directory and returns its `file://` URI.
///
/// # Errors
/// Returns [`Error::Io`] if the directory cannot be created or the file cannot
/// be copied, and a validation error if `source` is not a file.
pub fn store_company_logo(app_data_dir: &Path, source: &Path) -> Result<String> {
    if !source.is_file() {
        return Err(Error::validation(format!(
            "Image not found: {}",
            source.display()
        )));
    }

    let destination = company_logo_path(app_data_dir, Utc::now().timestamp_millis());
    if let Some(parent) = destination.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::copy(source, &destination)?;

    let absolute = std::path::absolute(&destination)?;
    info!("Company logo saved to {}", absolute.display());
    Ok(format!("file://{}", absolute.display()))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_store_company_logo() {
        let data_dir = tempfile::tempdir().unwrap();
        let source_dir = tempfile::tempdir().unwrap();
        let source = source_dir.path().join("picked.jpg");
        std::fs::write(&source, b"not really a jpeg").unwrap();

        let uri = store_company_logo(data_dir.path(), &source).unwrap();
        assert!(uri.starts_with("file://"));
        assert!(uri.contains("images/company/company_logo_"));
        assert!(uri.ends_with(".jpg"));

        let stored = PathBuf::from(uri.trim_start_matches("file://"));
        assert_eq!(std::fs::read(stored).unwrap(), b"not really a jpeg");
    }

    #[test]
    fn test_missing_source_rejected() {
        let data_dir = tempfile::tempdir().unwrap();
        let result = store_company_logo(data_dir.path(), Path::new("/nonexistent/logo.jpg"));
        assert!(matches!(result, Err(Error::Validation { .. })));
        assert!(!data_dir.path().join(COMPANY_IMAGE_DIR).exists());
    }

    #[test]
    fn test_logo_path_layout() {
        let path = company_logo_path(Path::new("data"), 1_700_000_000_000);
        assert_eq!(
            path,
            PathBuf::from("data/images/company/company_logo_1700000000000.jpg")
        );
    }
}
