//! Bulk-upload acceptance rules.
//!
//! Files are accepted on name and MIME type alone; their content is never
//! read.

use thiserror::Error;

use crate::models::UploadedFile;

/// Largest accepted upload.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

const ACCEPTED_EXTENSIONS: [&str; 3] = [".csv", ".xlsx", ".xls"];
const ACCEPTED_CONTENT_TYPE: &str = "text/csv";

/// Errors from the upload form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("Please select a file to upload.")]
    MissingFile,

    #[error("Unsupported file type: {0}. Please upload a CSV or Excel file.")]
    UnsupportedType(String),

    #[error("File is too large. Maximum size is 10 MB.")]
    TooLarge { size_bytes: u64 },
}

/// Check an uploaded file against the accepted types and size limit.
///
/// # Errors
///
/// Returns an [`UploadError`] if the file has no name, is not a CSV or
/// Excel file, or exceeds [`MAX_UPLOAD_BYTES`].
pub fn accept(
    name: &str,
    content_type: Option<&str>,
    size_bytes: u64,
) -> Result<UploadedFile, UploadError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(UploadError::MissingFile);
    }

    let lower = name.to_lowercase();
    let by_extension = ACCEPTED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext));
    let by_mime = content_type.is_some_and(|ct| ct.eq_ignore_ascii_case(ACCEPTED_CONTENT_TYPE));
    if !by_extension && !by_mime {
        return Err(UploadError::UnsupportedType(name.to_string()));
    }

    if size_bytes > MAX_UPLOAD_BYTES {
        return Err(UploadError::TooLarge { size_bytes });
    }

    Ok(UploadedFile {
        name: name.to_string(),
        size_bytes,
        content_type: content_type.map(str::to_string),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_spreadsheet_extensions() {
        for name in ["a.csv", "B.XLSX", "legacy.xls"] {
            assert!(accept(name, None, 100).is_ok(), "{name}");
        }
    }

    #[test]
    fn test_accepts_csv_mime_with_any_name() {
        let file = accept("export", Some("text/csv"), 100).unwrap();
        assert_eq!(file.content_type.as_deref(), Some("text/csv"));
    }

    #[test]
    fn test_rejects_other_types() {
        assert_eq!(
            accept("notes.txt", Some("text/plain"), 100),
            Err(UploadError::UnsupportedType("notes.txt".to_string()))
        );
    }

    #[test]
    fn test_size_limit() {
        assert!(accept("big.csv", None, MAX_UPLOAD_BYTES).is_ok());
        assert!(matches!(
            accept("big.csv", None, MAX_UPLOAD_BYTES + 1),
            Err(UploadError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_missing_name() {
        assert_eq!(accept("  ", None, 0), Err(UploadError::MissingFile));
    }
}
