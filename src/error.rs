use thiserror::Error;

/// Top-level error type for the catenary crate.
#[derive(Debug, Error)]
pub enum CatenaryError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Tessellation(#[from] TessellationError),
}

/// Errors raised when validating geometric inputs.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("parameter {parameter} = {value} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("parameter {parameter} is not finite ({value})")]
    NonFinite { parameter: &'static str, value: f64 },

    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors related to sampling curves into polylines.
#[derive(Debug, Error)]
pub enum TessellationError {
    #[error("invalid tessellation parameters: {0}")]
    InvalidParameters(String),
}

/// Convenience type alias for results using [`CatenaryError`].
pub type Result<T> = std::result::Result<T, CatenaryError>;
