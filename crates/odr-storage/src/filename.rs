//! Filename checks for scratch files.

use crate::error::{StorageError, StorageResult};

/// Name used when an upload carries no usable filename.
pub const DEFAULT_UPLOAD_FILENAME: &str = "upload.jpg";

/// Reduce a client-supplied upload filename to a safe basename.
///
/// Directory components (either separator style) are dropped. Names that end
/// up empty or consist only of dots fall back to `DEFAULT_UPLOAD_FILENAME`.
pub fn sanitize_upload_filename(raw: Option<&str>) -> String {
    let base = raw
        .map(|name| name.rsplit(['/', '\\']).next().unwrap_or_default().trim())
        .unwrap_or_default();

    if base.is_empty() || base.chars().all(|c| c == '.') || base.contains('\0') {
        DEFAULT_UPLOAD_FILENAME.to_string()
    } else {
        base.to_string()
    }
}

/// Validate a filename taken from a download path.
///
/// Prevents directory traversal: no separators, nothing empty, and not a
/// `.` or `..` component. Dots inside a name (`v1..2.jpg`) are fine.
pub fn validate_filename(name: &str) -> StorageResult<&str> {
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0')
    {
        return Err(StorageError::invalid_filename(name));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_directories() {
        assert_eq!(sanitize_upload_filename(Some("photo.jpg")), "photo.jpg");
        assert_eq!(sanitize_upload_filename(Some("../../etc/passwd")), "passwd");
        assert_eq!(sanitize_upload_filename(Some("C:\\Users\\me\\cat.png")), "cat.png");
        assert_eq!(sanitize_upload_filename(Some("dir/")), DEFAULT_UPLOAD_FILENAME);
    }

    #[test]
    fn test_sanitize_defaults() {
        assert_eq!(sanitize_upload_filename(None), DEFAULT_UPLOAD_FILENAME);
        assert_eq!(sanitize_upload_filename(Some("")), DEFAULT_UPLOAD_FILENAME);
        assert_eq!(sanitize_upload_filename(Some("..")), DEFAULT_UPLOAD_FILENAME);
    }

    #[test]
    fn test_validate_filename() {
        assert!(validate_filename("annotated_test.jpg").is_ok());
        assert!(validate_filename("test.jpg_report.pdf").is_ok());
        assert!(validate_filename("../secret").is_err());
        assert!(validate_filename("a/b.jpg").is_err());
        assert!(validate_filename("").is_err());
        assert!(validate_filename("..").is_err());
        assert!(validate_filename(".").is_err());
        assert!(validate_filename("..\\secret").is_err());
    }

    #[test]
    fn test_sanitized_names_always_validate() {
        for raw in ["v1..2.jpg", "..hidden.png", "../../x..y.jpg", "...", "a\\..\\b.bmp"] {
            let name = sanitize_upload_filename(Some(raw));
            assert!(validate_filename(&name).is_ok(), "{raw} -> {name}");
        }
        assert_eq!(sanitize_upload_filename(Some("v1..2.jpg")), "v1..2.jpg");
    }
}
