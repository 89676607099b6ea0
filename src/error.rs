use thiserror::Error;

/// Failures raised by the numeric side of the crate.
///
/// All of them are terminal for the call that produced them.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ManifoldError {
    /// A parameter lies outside the range the operation accepts,
    /// e.g. more hole centres than points.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The input has no spread, so min-max scaling would divide by zero.
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    /// Row, column or length counts that must agree do not.
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),
}

pub type Result<T> = std::result::Result<T, ManifoldError>;
