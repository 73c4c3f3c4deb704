use crate::types::LayerKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WireframeError {
    #[error("input image is empty ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("dimension mismatch: expected {expected_width}x{expected_height}, got {actual_width}x{actual_height}")]
    DimensionMismatch {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    #[error("no face detected")]
    NoFaceDetected,

    #[error("required layer {0:?} is missing")]
    MissingLayer(LayerKind),

    #[error("collaborator failure: {0}")]
    Collaborator(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl WireframeError {
    pub(crate) fn check_dimensions(
        expected: (u32, u32),
        actual: (u32, u32),
    ) -> Result<()> {
        if expected == actual {
            return Ok(());
        }
        Err(WireframeError::DimensionMismatch {
            expected_width: expected.0,
            expected_height: expected.1,
            actual_width: actual.0,
            actual_height: actual.1,
        })
    }
}

pub type Result<T> = std::result::Result<T, WireframeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimension_check_reports_both_sizes() {
        assert!(WireframeError::check_dimensions((4, 3), (4, 3)).is_ok());
        let err = WireframeError::check_dimensions((4, 3), (5, 3)).unwrap_err();
        assert!(matches!(
            err,
            WireframeError::DimensionMismatch {
                expected_width: 4,
                expected_height: 3,
                actual_width: 5,
                actual_height: 3,
            }
        ));
        assert_eq!(err.to_string(), "dimension mismatch: expected 4x3, got 5x3");
    }
}
