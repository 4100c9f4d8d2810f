use thiserror::Error;

/// Top-level error type for the hatch tiling engine.
#[derive(Debug, Error)]
pub enum HatchError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors related to geometric construction.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("can not process zero domain (bounds {u} x {v})")]
    ZeroDomain { u: f64, v: f64 },

    #[error("lines do not intersect")]
    NoIntersection,
}

/// Errors related to safe grid resolution.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("safe grid U:{u_tiles} V:{v_tiles} has no repeating lattice point")]
    InvalidGrid { u_tiles: u32, v_tiles: u32 },
}

/// Errors related to pattern conversion.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Convenience type alias for results using [`HatchError`].
pub type Result<T> = std::result::Result<T, HatchError>;
