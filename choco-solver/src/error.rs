use thiserror::Error;

use crate::backend::BackendError;

/// The result type of every fallible operation of the proxy layer.
pub type ChocoResult<T> = Result<T, ChocoError>;

/// Errors reported by the proxy layer.
///
/// Variants other than [`ChocoError::Backend`] are detected locally, before any call is forwarded
/// to the backend.
#[derive(Debug, Error)]
pub enum ChocoError {
    #[error("the solver runtime is not initialised")]
    RuntimeNotInitialized,
    #[error("'{0}' is not a recognised operator")]
    InvalidOperator(String),
    #[error("invalid operator combination: {0}")]
    InvalidOperatorCombination(String),
    #[error("length mismatch: expected {expected} elements but got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("empty domain: lower bound {lb} exceeds upper bound {ub}")]
    EmptyDomain { lb: i32, ub: i32 },
    #[error("the {0} limit must be positive")]
    InvalidLimit(&'static str),
    #[error("variable '{0}' is not instantiated")]
    NotInstantiated(String),
    #[error("string contains an interior NUL byte: {0:?}")]
    InvalidString(String),
    #[error(transparent)]
    Backend(#[from] BackendError),
}
