//! Errors for the inventory policy domain (cost-model guards, feasibility of
//! the constraint box, configuration checks, and solver failures).
//!
//! Every [`PolicyError`] belongs to one [`ErrorCategory`]:
//! - **Domain**: the cost model was asked to evaluate a point where it is
//!   undefined (non-positive lot, negative spread, non-finite inputs).
//! - **ConstraintInfeasible**: the feasible region is empty, detected before
//!   any solver work.
//! - **Configuration**: invalid parameters or options.
//! - **Solver**: a hard failure reported by the generic optimizer.
//!
//! Non-convergence is *not* an error; it is reported through
//! [`SolveStatus::NotConverged`](crate::policy::result::SolveStatus).
use crate::optimization::errors::OptError;
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Result alias for policy operations that may produce [`PolicyError`].
pub type PolicyResult<T> = Result<T, PolicyError>;

/// Coarse classification of a [`PolicyError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Domain,
    ConstraintInfeasible,
    Configuration,
    Solver,
}

/// Unified error type for the inventory policy layer.
#[derive(Debug, Clone, PartialEq)]
pub enum PolicyError {
    // ---- Domain ----
    /// Lot quantity must be finite and > 0 for the ordering term.
    NonPositiveLot { value: f64 },

    /// Minimum lot must be > 0 so every feasible lot keeps the cost finite.
    NonPositiveMinLot { value: f64 },

    /// The safety-stock radicand is negative.
    NegativeSpread { value: f64 },

    /// A decision coordinate is NaN/±inf.
    NonFiniteDecision { field: &'static str, value: f64 },

    /// The cost model produced a non-finite total.
    NonFiniteCost { value: f64 },

    // ---- Constraint feasibility ----
    /// `min_lot > max_lot`.
    InfeasibleLotBounds { min_lot: f64, max_lot: f64 },

    /// `max_service_factor < 1`.
    InfeasibleServiceBound { max_service_factor: f64 },

    /// No multiple of `lot_multiple` lies inside `[min_lot, max_lot]`.
    NoLotMultipleInRange { lot_multiple: f64, min_lot: f64, max_lot: f64 },

    // ---- Configuration ----
    /// A policy parameter is NaN/±inf.
    NonFiniteParam { field: &'static str, value: f64 },

    /// The cost grid needs at least two points per axis.
    InvalidGridResolution { resolution: usize },

    /// Enforced lot multiples need a finite step > 0.
    InvalidLotMultiple { value: f64 },

    /// Interior margin must lie in (0, 0.5).
    InvalidInteriorMargin { value: f64 },

    // ---- Solver ----
    /// Hard failure from the generic optimizer.
    Solver(OptError),
}

impl PolicyError {
    /// Category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            PolicyError::NonPositiveLot { .. }
            | PolicyError::NonPositiveMinLot { .. }
            | PolicyError::NegativeSpread { .. }
            | PolicyError::NonFiniteDecision { .. }
            | PolicyError::NonFiniteCost { .. } => ErrorCategory::Domain,
            PolicyError::InfeasibleLotBounds { .. }
            | PolicyError::InfeasibleServiceBound { .. }
            | PolicyError::NoLotMultipleInRange { .. } => ErrorCategory::ConstraintInfeasible,
            PolicyError::NonFiniteParam { .. }
            | PolicyError::InvalidGridResolution { .. }
            | PolicyError::InvalidLotMultiple { .. }
            | PolicyError::InvalidInteriorMargin { .. } => ErrorCategory::Configuration,
            PolicyError::Solver(_) => ErrorCategory::Solver,
        }
    }

    pub fn is_domain(&self) -> bool {
        self.category() == ErrorCategory::Domain
    }

    pub fn is_constraint_infeasible(&self) -> bool {
        self.category() == ErrorCategory::ConstraintInfeasible
    }
}

impl std::error::Error for PolicyError {}

impl std::fmt::Display for PolicyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Domain ----
            PolicyError::NonPositiveLot { value } => {
                write!(f, "Lot quantity must be finite and > 0, got {value}")
            }
            PolicyError::NonPositiveMinLot { value } => {
                write!(f, "Minimum lot must be > 0, got {value}")
            }
            PolicyError::NegativeSpread { value } => {
                write!(f, "Safety-stock spread must be non-negative, got {value}")
            }
            PolicyError::NonFiniteDecision { field, value } => {
                write!(f, "Decision field '{field}' must be finite, got {value}")
            }
            PolicyError::NonFiniteCost { value } => {
                write!(f, "Cost model produced a non-finite value: {value}")
            }
            // ---- Constraint feasibility ----
            PolicyError::InfeasibleLotBounds { min_lot, max_lot } => {
                write!(f, "Infeasible lot bounds: min_lot {min_lot} exceeds max_lot {max_lot}")
            }
            PolicyError::InfeasibleServiceBound { max_service_factor } => {
                write!(
                    f,
                    "Infeasible service bound: max_service_factor {max_service_factor} is below 1"
                )
            }
            PolicyError::NoLotMultipleInRange { lot_multiple, min_lot, max_lot } => {
                write!(f, "No multiple of {lot_multiple} lies inside [{min_lot}, {max_lot}]")
            }
            // ---- Configuration ----
            PolicyError::NonFiniteParam { field, value } => {
                write!(f, "Parameter '{field}' must be finite, got {value}")
            }
            PolicyError::InvalidGridResolution { resolution } => {
                write!(f, "Grid resolution must be at least 2, got {resolution}")
            }
            PolicyError::InvalidLotMultiple { value } => {
                write!(f, "Lot multiple must be finite and > 0 when enforced, got {value}")
            }
            PolicyError::InvalidInteriorMargin { value } => {
                write!(f, "Interior margin must lie in (0, 0.5), got {value}")
            }
            // ---- Solver ----
            PolicyError::Solver(err) => {
                write!(f, "Optimizer failed: {err}")
            }
        }
    }
}

impl From<OptError> for PolicyError {
    fn from(err: OptError) -> PolicyError {
        PolicyError::Solver(err)
    }
}

impl From<PolicyError> for OptError {
    fn from(err: PolicyError) -> OptError {
        match err {
            PolicyError::Solver(inner) => inner,
            other => OptError::Objective { text: other.to_string() },
        }
    }
}

/// Convert a [`PolicyError`] into a Python `ValueError` with the error message.
#[cfg(feature = "python-bindings")]
impl std::convert::From<PolicyError> for PyErr {
    fn from(err: PolicyError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
