use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for mdinclude operations
#[derive(Error, Debug)]
pub enum MdIncludeError {
    /// IO error when reading or writing documents
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Markdown document to expand does not exist or is not a file
    #[error("Document not found: {path}")]
    DocumentNotFound { path: PathBuf },

    /// Root directory for document discovery does not exist
    #[error("Root directory not found: {path}")]
    RootNotFound { path: PathBuf },

    /// Regex compilation error
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// `WalkDir` error when traversing directories
    #[error("Directory traversal error: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// Invalid exclude pattern
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] globset::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MdIncludeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MdIncludeError::DocumentNotFound {
            path: PathBuf::from("ReadMe/missing.md"),
        };
        assert_eq!(format!("{err}"), "Document not found: ReadMe/missing.md");

        let err = MdIncludeError::RootNotFound {
            path: PathBuf::from("ReadMe"),
        };
        assert_eq!(format!("{err}"), "Root directory not found: ReadMe");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "test");
        let err: MdIncludeError = io_err.into();
        assert!(matches!(err, MdIncludeError::Io(_)));
        assert!(format!("{err}").starts_with("IO error:"));
    }

    #[test]
    fn test_error_from_glob() {
        let glob_err = globset::Glob::new("a[").unwrap_err();
        let err: MdIncludeError = glob_err.into();
        assert!(matches!(err, MdIncludeError::Glob(_)));
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<String>("invalid").unwrap_err();
        let err: MdIncludeError = json_err.into();
        assert!(matches!(err, MdIncludeError::Json(_)));
    }
}
