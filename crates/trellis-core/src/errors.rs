//! Error types for the Trellis layout engine.

use thiserror::Error;

/// Rejected constraint input. Unsatisfiable sizes and unresolved links are
/// never reported through this type; the layout clamps and carries on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("Invalid span, split or skip count: {span}")]
    InvalidSpan { span: i32 },

    #[error("Cell ({col}, {row}) is outside the grid")]
    InvalidCell { row: i32, col: i32 },

    #[error("Unknown link field in reference '{reference}'")]
    UnknownLinkField { reference: String },

    #[error("Unknown unit '{unit}'")]
    UnknownUnit { unit: String },

    #[error("Invalid dock side '{side}'")]
    InvalidDockSide { side: String },

    #[error("Invalid constraint: {reason}")]
    InvalidConstraint { reason: String },
}

/// Convenience alias used throughout the Trellis crates.
pub type Result<T> = std::result::Result<T, LayoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = LayoutError::InvalidSpan { span: 0 };
        assert_eq!(err.to_string(), "Invalid span, split or skip count: 0");

        let err = LayoutError::InvalidCell { row: 2, col: 40_000 };
        assert_eq!(err.to_string(), "Cell (40000, 2) is outside the grid");

        let err = LayoutError::UnknownLinkField {
            reference: "button.z".into(),
        };
        assert!(err.to_string().contains("button.z"));
    }
}
