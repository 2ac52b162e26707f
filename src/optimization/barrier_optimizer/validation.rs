//! Validation helpers for the barrier optimizer.
//!
//! This module centralizes the consistency checks used across the optimizer
//! interface:
//!
//! - **Option checks**: [`verify_tol_grad`], [`verify_barrier_schedule`],
//!   [`verify_radius`], [`verify_eta`].
//! - **Derivative validation**: [`validate_grad`], [`validate_hessian`],
//!   [`validate_jacobian`] enforce shape and finite entries.
//! - **Start point**: [`validate_start`] requires finite entries and a
//!   strictly interior point.
//! - **Outcomes**: [`validate_theta_hat`], [`validate_value`].
use crate::optimization::{
    errors::{OptError, OptResult},
    barrier_optimizer::types::{Grad, Hessian, Jacobian, Theta},
};

/// Validate the optional gradient-norm tolerance.
///
/// # Errors
/// Returns [`OptError::InvalidTolGrad`] if the value is non-finite or ≤ 0.0.
pub fn verify_tol_grad(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Validate a barrier schedule `(mu_init, mu_min, shrink)`.
///
/// Rules: `0 < mu_min ≤ mu_init`, both finite, and `0 < shrink < 1`.
///
/// # Errors
/// Returns [`OptError::InvalidBarrierParam`] naming the offending field.
pub fn verify_barrier_schedule(mu_init: f64, mu_min: f64, shrink: f64) -> OptResult<()> {
    if !mu_init.is_finite() || mu_init <= 0.0 {
        return Err(OptError::InvalidBarrierParam {
            name: "mu_init",
            value: mu_init,
            reason: "Initial barrier parameter must be finite and positive.",
        });
    }
    if !mu_min.is_finite() || mu_min <= 0.0 {
        return Err(OptError::InvalidBarrierParam {
            name: "mu_min",
            value: mu_min,
            reason: "Final barrier parameter must be finite and positive.",
        });
    }
    if mu_min > mu_init {
        return Err(OptError::InvalidBarrierParam {
            name: "mu_min",
            value: mu_min,
            reason: "Final barrier parameter must not exceed the initial one.",
        });
    }
    if !(shrink > 0.0 && shrink < 1.0) {
        return Err(OptError::InvalidBarrierParam {
            name: "shrink",
            value: shrink,
            reason: "Shrink factor must lie strictly between 0 and 1.",
        });
    }
    Ok(())
}

/// Validate a trust-region radius (initial or maximum).
///
/// # Errors
/// Returns [`OptError::InvalidRadius`] if the value is non-finite or ≤ 0.0.
pub fn verify_radius(radius: f64) -> OptResult<()> {
    if !radius.is_finite() {
        return Err(OptError::InvalidRadius { value: radius, reason: "Radius must be finite." });
    }
    if radius <= 0.0 {
        return Err(OptError::InvalidRadius { value: radius, reason: "Radius must be positive." });
    }
    Ok(())
}

/// Validate the step-acceptance threshold `eta ∈ [0, 0.25)`.
///
/// # Errors
/// Returns [`OptError::InvalidEta`] otherwise.
pub fn verify_eta(eta: f64) -> OptResult<()> {
    if !(0.0..0.25).contains(&eta) {
        return Err(OptError::InvalidEta { value: eta, reason: "Eta must lie in [0, 0.25)." });
    }
    Ok(())
}

/// Validate a gradient vector against dimension and finiteness.
///
/// # Errors
/// - [`OptError::GradientDimMismatch`] if length does not match `dim`.
/// - [`OptError::InvalidGradient`] with the index/value/reason of the first
///   offending element.
pub fn validate_grad(grad: &Grad, dim: usize) -> OptResult<()> {
    if grad.len() != dim {
        return Err(OptError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    for (index, &value) in grad.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidGradient {
                index,
                value,
                reason: "Gradient elements must be finite.",
            });
        }
    }
    Ok(())
}

/// Validate the shape and entries of a Hessian matrix.
///
/// # Errors
/// - [`OptError::HessianDimMismatch`] if dimensions do not match `dim`.
/// - [`OptError::InvalidHessian`] if any entry is non-finite.
pub fn validate_hessian(hessian: &Hessian, dim: usize) -> OptResult<()> {
    if hessian.nrows() != dim || hessian.ncols() != dim {
        return Err(OptError::HessianDimMismatch {
            expected: dim,
            found: (hessian.nrows(), hessian.ncols()),
        });
    }
    for ((i, j), &value) in hessian.indexed_iter() {
        if !value.is_finite() {
            return Err(OptError::InvalidHessian { row: i, col: j, value });
        }
    }
    Ok(())
}

/// Validate the shape and entries of a constraint Jacobian.
///
/// # Errors
/// - [`OptError::JacobianDimMismatch`] unless the matrix is `n_constraints × dim`.
/// - [`OptError::InvalidJacobian`] if any entry is non-finite.
pub fn validate_jacobian(jacobian: &Jacobian, n_constraints: usize, dim: usize) -> OptResult<()> {
    if jacobian.nrows() != n_constraints || jacobian.ncols() != dim {
        return Err(OptError::JacobianDimMismatch {
            expected: (n_constraints, dim),
            found: (jacobian.nrows(), jacobian.ncols()),
        });
    }
    for ((row, col), &value) in jacobian.indexed_iter() {
        if !value.is_finite() {
            return Err(OptError::InvalidJacobian { row, col, value });
        }
    }
    Ok(())
}

/// Validate constraint values returned by an objective.
///
/// # Errors
/// Returns [`OptError::NonFiniteConstraint`] for the first NaN/±∞ entry.
pub fn validate_constraints(values: &Theta) -> OptResult<()> {
    for (index, &value) in values.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::NonFiniteConstraint { index, value });
        }
    }
    Ok(())
}

/// Validate a starting point: finite entries and strictly positive
/// constraint values.
///
/// # Errors
/// - [`OptError::InvalidThetaInput`] for a non-finite coordinate.
/// - [`OptError::NonFiniteConstraint`] for a non-finite constraint value.
/// - [`OptError::InfeasibleStart`] for the first constraint with `c_i(x0) ≤ 0`.
pub fn validate_start(theta0: &Theta, constraints: &Theta) -> OptResult<()> {
    for (index, &value) in theta0.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidThetaInput { index, value });
        }
    }
    validate_constraints(constraints)?;
    for (index, &value) in constraints.iter().enumerate() {
        if value <= 0.0 {
            return Err(OptError::InfeasibleStart { index, value });
        }
    }
    Ok(())
}

/// Validate and unwrap an estimated parameter vector (`theta_hat`).
///
/// # Errors
/// - [`OptError::MissingThetaHat`] if no vector was provided.
/// - [`OptError::InvalidThetaHat`] if any element is non-finite.
pub fn validate_theta_hat(theta_hat: Option<Theta>) -> OptResult<Theta> {
    match theta_hat {
        Some(t) => {
            for (index, &value) in t.iter().enumerate() {
                if !value.is_finite() {
                    return Err(OptError::InvalidThetaHat {
                        index,
                        value,
                        reason: "Parameter estimates must be finite.",
                    });
                }
            }
            Ok(t)
        }
        None => Err(OptError::MissingThetaHat),
    }
}

/// Validate that a scalar objective value is finite.
///
/// # Errors
/// Returns [`OptError::NonFiniteCost`] if the value is `NaN` or infinite.
pub fn validate_value(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(())
}
