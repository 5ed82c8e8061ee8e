use thiserror::Error;

/// Argument errors raised by geometry constructors and set operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("at least {required} locations are required, got {got}")]
    TooFewLocations { required: usize, got: usize },
    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },
}
