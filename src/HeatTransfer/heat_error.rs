use thiserror::Error;

/// error types for the heat conduction setup and solvers
#[derive(Debug, Error)]
pub enum HeatError {
    #[error(
        "Invalid dimension on axis {axis}: extent {extent}, cells {cells} (extents must be positive, counts non-zero, 1 to 3 axes)"
    )]
    InvalidDimension {
        axis: usize,
        extent: f64,
        cells: usize,
    },
    #[error("Face '{face}' is not valid for a {dimension}D geometry")]
    UnknownFace { face: String, dimension: usize },
    #[error("Explicit step {step:e} s exceeds the stability bound {bound:e} s")]
    NumericalInstability { step: f64, bound: f64 },
    #[error("Invalid emission: {0}")]
    InvalidEmission(String),
    #[error("Invalid material: {0}")]
    InvalidMaterial(String),
    #[error("State vector has {found} entries, geometry has {expected} cells")]
    StateSizeMismatch { expected: usize, found: usize },
    #[error("Invalid time span: {0}")]
    InvalidTimeSpan(String),
    #[error("Solver error: {0}")]
    Solver(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse task: {0}")]
    Serde(#[from] serde_json::Error),
}
