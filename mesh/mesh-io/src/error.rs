//! Error types for STL I/O operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for STL I/O operations.
pub type IoResult<T> = Result<T, IoError>;

/// Errors that can occur while reading or writing STL data.
///
/// Variants fall in two groups: parse errors (the bytes are not a valid STL
/// stream, see [`IoError::is_parse_error`]) and file system errors.
#[derive(Debug, Error)]
pub enum IoError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was not found.
        path: PathBuf,
        /// The underlying error reported by the operating system.
        #[source]
        source: std::io::Error,
    },

    /// Invalid file content (parse error).
    #[error("invalid STL content at line {line}: {message}")]
    InvalidContent {
        /// 1-based line of an ASCII file, or 0 for binary data.
        line: usize,
        /// Description of what was invalid.
        message: String,
    },

    /// The stream ended in the middle of a record.
    #[error("unexpected end of STL data: {context}")]
    UnexpectedEof {
        /// What the parser was waiting for.
        context: String,
    },

    /// Binary data shorter than the fixed header.
    #[error("invalid STL header: expected {expected} bytes, got {got}")]
    InvalidHeader {
        /// Expected header size.
        expected: usize,
        /// Actual number of bytes available.
        got: usize,
    },

    /// Declared facet count disagrees with the bytes that follow the header.
    #[error("facet count mismatch: header declares {declared} facets, data holds {available_bytes} bytes ({expected_bytes} expected)")]
    FacetCountMismatch {
        /// Facet count from the header.
        declared: u32,
        /// Bytes the declared count requires after the header.
        expected_bytes: u64,
        /// Bytes actually present after the header.
        available_bytes: u64,
    },

    /// A vertex coordinate decoded to NaN or infinity.
    #[error("non-finite coordinate in facet {facet}")]
    NonFiniteCoordinate {
        /// Zero-based index of the offending facet.
        facet: usize,
    },

    /// A vertex coordinate does not fit in the `f32` fields of binary STL.
    #[error("coordinate {value} in facet {facet} is outside the f32 range of binary STL")]
    CoordinateOutOfRange {
        /// Zero-based index of the offending facet.
        facet: usize,
        /// The coordinate that overflowed.
        value: f64,
    },

    /// More facets than the binary facet count field can hold.
    #[error("too many facets for binary STL: {count}")]
    TooManyFacets {
        /// Number of facets in the mesh.
        count: usize,
    },

    /// I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// ASCII STL is not valid UTF-8.
    #[error("UTF-8 decoding error: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

impl IoError {
    /// Create an `InvalidContent` error for a given ASCII line.
    #[must_use]
    pub fn invalid_content(line: usize, message: impl Into<String>) -> Self {
        Self::InvalidContent {
            line,
            message: message.into(),
        }
    }

    /// Create an `UnexpectedEof` error.
    #[must_use]
    pub fn unexpected_eof(context: impl Into<String>) -> Self {
        Self::UnexpectedEof {
            context: context.into(),
        }
    }

    /// Whether the error describes malformed or truncated STL data rather than
    /// a failure of the file system.
    #[must_use]
    pub const fn is_parse_error(&self) -> bool {
        !matches!(
            self,
            Self::FileNotFound { .. }
                | Self::Io(_)
                | Self::TooManyFacets { .. }
                | Self::CoordinateOutOfRange { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IoError::invalid_content(12, "expected 'vertex'");
        assert_eq!(
            format!("{err}"),
            "invalid STL content at line 12: expected 'vertex'"
        );

        let err = IoError::FacetCountMismatch {
            declared: 3,
            expected_bytes: 150,
            available_bytes: 100,
        };
        let text = format!("{err}");
        assert!(text.contains("declares 3 facets"));
        assert!(text.contains("150 expected"));
    }

    #[test]
    fn parse_errors_are_classified() {
        assert!(IoError::unexpected_eof("endsolid").is_parse_error());
        assert!(IoError::NonFiniteCoordinate { facet: 0 }.is_parse_error());
        assert!(
            IoError::InvalidHeader {
                expected: 84,
                got: 10
            }
            .is_parse_error()
        );

        let io = IoError::Io(std::io::Error::other("disk full"));
        assert!(!io.is_parse_error());
        assert!(
            !IoError::CoordinateOutOfRange {
                facet: 0,
                value: 1e40
            }
            .is_parse_error()
        );
    }

    #[test]
    fn file_not_found_keeps_os_error() {
        use std::error::Error as _;

        let err = IoError::FileNotFound {
            path: PathBuf::from("a.stl"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(!err.is_parse_error());
        let source = err.source().and_then(|e| e.downcast_ref::<std::io::Error>());
        assert!(source.is_some_and(|e| e.kind() == std::io::ErrorKind::NotFound));
    }
}
