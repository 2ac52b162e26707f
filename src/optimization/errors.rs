use argmin::core::{ArgminError, Error};
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Crate-wide result alias for optimizer operations.
pub type OptResult<T> = Result<T, OptError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- Derivatives ----
    /// Implies that FD should be used for the objective gradient.
    GradientNotImplemented,

    /// Implies that FD should be used for the barrier Hessian.
    HessianNotImplemented,

    /// Implies that FD should be used for the constraint Jacobian.
    JacobianNotImplemented,

    /// Gradient dimensions do not match parameter dimensions.
    GradientDimMismatch {
        expected: usize,
        found: usize,
    },

    /// Gradient elements need to be finite
    InvalidGradient {
        index: usize,
        value: f64,
        reason: &'static str,
    },

    /// Hessian matrix dimensions do not match parameter dimensions.
    HessianDimMismatch {
        expected: usize,
        found: (usize, usize),
    },

    /// Hessian values need to be finite.
    InvalidHessian {
        row: usize,
        col: usize,
        value: f64,
    },

    /// Jacobian must be (number of constraints) × (number of parameters).
    JacobianDimMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    /// Jacobian values need to be finite.
    InvalidJacobian {
        row: usize,
        col: usize,
        value: f64,
    },

    // ---- SolverOptions ----
    /// Gradient tolerance needs to be positive and finite.
    InvalidTolGrad {
        tol: f64,
        reason: &'static str,
    },
    /// Maximum iterations needs to be positive.
    InvalidMaxIter {
        max_iter: usize,
        reason: &'static str,
    },
    /// At least one tolerance must be provided.
    NoTolerancesProvided,

    /// Barrier schedule values must be finite and ordered.
    InvalidBarrierParam {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// Maximum number of barrier stages needs to be positive.
    InvalidMaxStages {
        stages: usize,
        reason: &'static str,
    },

    /// Trust-region radius settings must be finite and positive.
    InvalidRadius {
        value: f64,
        reason: &'static str,
    },

    /// Acceptance threshold must lie in [0, 1/4).
    InvalidEta {
        value: f64,
        reason: &'static str,
    },

    /// Invalid trust-region subproblem name.
    InvalidSubproblem {
        name: String,
        reason: &'static str,
    },

    // ---- Start point / constraints ----
    /// Initial parameter vector must have finite values.
    InvalidThetaInput {
        index: usize,
        value: f64,
    },

    /// Starting point must lie strictly inside every inequality constraint.
    InfeasibleStart {
        index: usize,
        value: f64,
    },

    /// The barrier derivatives were requested outside the strict interior.
    OutsideBarrierDomain {
        index: usize,
        value: f64,
    },

    /// Constraint function returned a non-finite value.
    NonFiniteConstraint {
        index: usize,
        value: f64,
    },

    // ---- Cost function ----
    /// Cost function returned a non-finite value.
    NonFiniteCost {
        value: f64,
    },

    /// Error raised by a user objective, carried as text.
    Objective {
        text: String,
    },

    // ---- Optimizer outcome ----
    /// Estimated parameters must be finite.
    InvalidThetaHat {
        index: usize,
        value: f64,
        reason: &'static str,
    },

    /// Theta hat is missing
    MissingThetaHat,

    // ---- Argmin ---
    /// Wrapper for argmin::InvalidParameter
    InvalidParameter {
        text: String,
    },
    /// Wrapper for argmin::NotImplemented
    NotImplemented {
        text: String,
    },
    /// Wrapper for argmin::NotInitialized
    NotInitialized {
        text: String,
    },
    /// Wrapper for argmin::ConditionViolated
    ConditionViolated {
        text: String,
    },
    /// Wrapper for argmin::CheckPointNotFound
    CheckPointNotFound {
        text: String,
    },
    /// Wrapper for argmin::PotentialBug
    PotentialBug {
        text: String,
    },
    /// Wrapper for argmin::ImpossibleError
    ImpossibleError {
        text: String,
    },
    /// Wrapper for other argmin::Error types
    BackendError {
        text: String,
    },

    // ---- Fallback ----
    UnknownError,
}

impl std::error::Error for OptError {}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Derivatives ----
            OptError::GradientNotImplemented => {
                write!(f, "Analytic gradient not implemented")
            }
            OptError::HessianNotImplemented => {
                write!(f, "Analytic Hessian not implemented")
            }
            OptError::JacobianNotImplemented => {
                write!(f, "Analytic constraint Jacobian not implemented")
            }
            OptError::GradientDimMismatch { expected, found } => {
                write!(f, "Gradient dimension mismatch: expected {expected}, found {found}")
            }
            OptError::InvalidGradient { index, value, reason } => {
                write!(f, "Invalid gradient at index {index}: {value}: {reason}")
            }
            OptError::HessianDimMismatch { expected, found } => {
                write!(
                    f,
                    "Hessian dimension mismatch: expected ({expected}, {expected}), found {found:?}"
                )
            }
            OptError::InvalidHessian { row, col, value } => {
                write!(f, "Invalid Hessian at ({row}, {col}): {value}, must be finite")
            }
            OptError::JacobianDimMismatch { expected, found } => {
                write!(f, "Jacobian dimension mismatch: expected {expected:?}, found {found:?}")
            }
            OptError::InvalidJacobian { row, col, value } => {
                write!(f, "Invalid Jacobian at ({row}, {col}): {value}, must be finite")
            }

            // ---- SolverOptions ----
            OptError::InvalidTolGrad { tol, reason } => {
                write!(f, "Invalid gradient tolerance {tol}: {reason}")
            }
            OptError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid maximum iterations {max_iter}: {reason}")
            }
            OptError::NoTolerancesProvided => {
                write!(f, "No tolerances provided")
            }
            OptError::InvalidBarrierParam { name, value, reason } => {
                write!(f, "Invalid barrier setting {name} = {value}: {reason}")
            }
            OptError::InvalidMaxStages { stages, reason } => {
                write!(f, "Invalid maximum barrier stages {stages}: {reason}")
            }
            OptError::InvalidRadius { value, reason } => {
                write!(f, "Invalid trust-region radius {value}: {reason}")
            }
            OptError::InvalidEta { value, reason } => {
                write!(f, "Invalid trust-region acceptance threshold {value}: {reason}")
            }
            OptError::InvalidSubproblem { name, reason } => {
                write!(f, "Invalid trust-region subproblem '{name}': {reason}")
            }

            // ---- Start point / constraints ----
            OptError::InvalidThetaInput { index, value } => {
                write!(f, "Invalid theta input at index {index}: {value}, must be finite")
            }
            OptError::InfeasibleStart { index, value } => {
                write!(
                    f,
                    "Starting point violates constraint {index}: value {value}, must be > 0"
                )
            }
            OptError::OutsideBarrierDomain { index, value } => {
                write!(
                    f,
                    "Barrier derivative requested outside the interior: constraint {index} = {value}"
                )
            }
            OptError::NonFiniteConstraint { index, value } => {
                write!(f, "Constraint {index} returned a non-finite value: {value}")
            }

            // ---- Cost function ----
            OptError::NonFiniteCost { value } => {
                write!(f, "Non-finite cost value: {value}")
            }
            OptError::Objective { text } => {
                write!(f, "Objective error: {text}")
            }

            // ---- Optimizer outcome ----
            OptError::InvalidThetaHat { index, value, reason } => {
                write!(f, "Invalid estimated parameter at index {index}: {value}: {reason}")
            }
            OptError::MissingThetaHat => {
                write!(f, "Missing estimated parameters (theta hat)")
            }

            // ---- Argmin ----
            OptError::InvalidParameter { text } => {
                write!(f, "Invalid parameter: {text}")
            }
            OptError::NotImplemented { text } => {
                write!(f, "Not implemented: {text}")
            }
            OptError::NotInitialized { text } => {
                write!(f, "Not initialized: {text}")
            }
            OptError::ConditionViolated { text } => {
                write!(f, "Condition violated: {text}")
            }
            OptError::CheckPointNotFound { text } => {
                write!(f, "Checkpoint not found: {text}")
            }
            OptError::PotentialBug { text } => {
                write!(f, "Potential bug: {text}")
            }
            OptError::ImpossibleError { text } => {
                write!(f, "Impossible error: {text}")
            }
            OptError::BackendError { text } => {
                write!(f, "Backend error: {text}")
            }

            // ---- Fallback ----
            OptError::UnknownError => {
                write!(f, "Unknown error")
            }
        }
    }
}

impl From<Error> for OptError {
    /// Recover an [`OptError`] that travelled through argmin unchanged, map
    /// argmin's own error kinds, and wrap anything else as text.
    fn from(original_err: Error) -> Self {
        let original_err = match original_err.downcast::<OptError>() {
            Ok(opt_err) => return opt_err,
            Err(err) => err,
        };
        match original_err.downcast() {
            Ok(opt_err) => match opt_err {
                ArgminError::InvalidParameter { text } => OptError::InvalidParameter { text },
                ArgminError::NotImplemented { text } => OptError::NotImplemented { text },
                ArgminError::NotInitialized { text } => OptError::NotInitialized { text },
                ArgminError::ConditionViolated { text } => OptError::ConditionViolated { text },
                ArgminError::CheckpointNotFound { text } => OptError::CheckPointNotFound { text },
                ArgminError::PotentialBug { text } => OptError::PotentialBug { text },
                ArgminError::ImpossibleError { text } => OptError::ImpossibleError { text },
                _ => OptError::UnknownError,
            },
            Err(err) => OptError::BackendError { text: err.to_string() },
        }
    }
}

/// Convert an [`OptError`] into a Python `ValueError` with the error message.
#[cfg(feature = "python-bindings")]
impl From<OptError> for PyErr {
    fn from(err: OptError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Round-tripping an `OptError` through `argmin::core::Error`.
    // - Mapping of argmin's own error kinds.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Errors raised inside argmin callbacks are boxed as `argmin::core::Error`;
    // the original variant must survive the trip back.
    //
    // Given
    // -----
    // - `OptError::NonFiniteCost` converted into an argmin error.
    //
    // Expect
    // ------
    // - `OptError::from` returns the same variant and payload.
    fn opt_error_survives_argmin_round_trip() {
        // Arrange
        let original = OptError::NonFiniteCost { value: f64::INFINITY };
        let boxed: Error = original.clone().into();

        // Act
        let recovered = OptError::from(boxed);

        // Assert
        assert_eq!(recovered, original);
    }

    #[test]
    // Purpose
    // -------
    // Argmin's `ArgminError` kinds map onto the matching wrapper variants.
    //
    // Given
    // -----
    // - `ArgminError::InvalidParameter` with a message.
    //
    // Expect
    // ------
    // - `OptError::InvalidParameter` carrying the same text.
    fn argmin_error_maps_to_wrapper_variant() {
        // Arrange
        let boxed: Error = ArgminError::InvalidParameter { text: "radius".to_string() }.into();

        // Act
        let mapped = OptError::from(boxed);

        // Assert
        assert_eq!(mapped, OptError::InvalidParameter { text: "radius".to_string() });
    }
}
