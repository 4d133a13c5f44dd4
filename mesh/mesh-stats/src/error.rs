//! Error types for statistics and squish operations.

use thiserror::Error;

/// Result type alias for statistics operations.
pub type StatsResult<T> = Result<T, StatsError>;

/// Errors that can occur while computing statistics or squishing a mesh.
#[derive(Debug, Error, PartialEq)]
pub enum StatsError {
    /// Input mesh has no vertices, so no bounds exist.
    #[error("input mesh is empty")]
    EmptyMesh,

    /// Every vertex sits at the same height, so the normalized position of a
    /// vertex within the bounds is undefined.
    #[error("degenerate Z range: every vertex is at z = {value}")]
    DegenerateRange {
        /// The single Z value shared by all vertices.
        value: f64,
    },

    /// Invalid operation parameters.
    #[error("invalid parameters: {0}")]
    InvalidParams(String),
}

impl StatsError {
    /// Create an invalid params error.
    #[must_use]
    pub fn invalid_params(details: impl Into<String>) -> Self {
        Self::InvalidParams(details.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StatsError::EmptyMesh;
        assert_eq!(format!("{err}"), "input mesh is empty");

        let err = StatsError::DegenerateRange { value: 7.0 };
        assert!(format!("{err}").contains("z = 7"));

        let err = StatsError::invalid_params("bucket count must be positive");
        assert!(format!("{err}").contains("bucket count"));
    }
}
