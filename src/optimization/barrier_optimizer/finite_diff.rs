//! barrier_optimizer::finite_diff — finite-difference derivative helpers.
//!
//! Purpose
//! -------
//! Provide finite-difference gradients, constraint Jacobians and Hessians
//! around a parameter vector, together with validation and symmetry
//! cleanup, so the barrier adapter can fall back to numerical derivatives
//! when an objective does not supply analytic ones.
//!
//! Key behaviors
//! -------------
//! - Compute gradients with central differences first and forward
//!   differences as fallback, capturing objective errors raised inside the
//!   `finitediff` closures ([`fd_gradient`], [`run_fd_diff`]).
//! - Build constraint Jacobians row by row from the same gradient path
//!   ([`compute_jacobian`]).
//! - Construct central-difference Hessians, falling back to forward
//!   differences when validation fails, and symmetrize them in-place
//!   ([`compute_hessian`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - Closures passed to `finitediff` must return `f64`; any error raised by
//!   the wrapped objective is routed into a shared `closure_err` cell and the
//!   closure returns `NaN`. The captured error is surfaced afterwards.
//! - Returned derivatives always satisfy [`validate_grad`],
//!   [`validate_jacobian`] or [`validate_hessian`].
//!
//! Testing notes
//! -------------
//! - Unit tests cover both successful and failing paths, including the
//!   central→forward fallbacks.
use crate::optimization::{
    errors::{OptError, OptResult},
    barrier_optimizer::{
        types::{Grad, Hessian, Jacobian, Theta},
        validation::{validate_grad, validate_hessian, validate_jacobian},
    },
};
use argmin::core::Error;
use finitediff::FiniteDiff;
use std::cell::RefCell;

/// fd_gradient — finite-difference gradient of a fallible scalar function.
///
/// Tries central differences first. If the wrapped function failed during
/// the central pass, or the resulting gradient is not finite, retries once
/// with forward differences via [`run_fd_diff`].
///
/// # Errors
/// - Any error raised by `func` on the forward pass.
/// - [`OptError::InvalidGradient`] if the forward gradient is not finite.
pub fn fd_gradient<G: Fn(&Theta) -> OptResult<f64>>(theta: &Theta, func: &G) -> OptResult<Grad> {
    let closure_err: RefCell<Option<Error>> = RefCell::new(None);
    let scalar = |x: &Theta| -> f64 {
        match func(x) {
            Ok(val) => val,
            Err(e) => {
                let mut slot = closure_err.borrow_mut();
                if slot.is_none() {
                    *slot = Some(e.into());
                }
                f64::NAN
            }
        }
    };
    let central = theta.central_diff(&scalar);
    if closure_err.borrow().is_none() && validate_grad(&central, theta.len()).is_ok() {
        return Ok(central);
    }
    run_fd_diff(theta, &scalar, &closure_err)
}

/// run_fd_diff — forward-difference gradient with error capture and validation.
///
/// Parameters
/// ----------
/// - `theta`: point at which the gradient is approximated.
/// - `func`: closure passed to `forward_diff`; it is assumed to write any
///   evaluation error into `closure_err` and return `NaN` in that case.
/// - `closure_err`: shared error slot; cleared on entry, inspected after
///   the FD call.
///
/// # Errors
/// - The error captured in `closure_err`, converted via `From<Error>`.
/// - [`OptError::GradientDimMismatch`] / [`OptError::InvalidGradient`] from
///   [`validate_grad`].
pub fn run_fd_diff<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> OptResult<Grad> {
    closure_err.replace(None);
    let fd_grad = theta.forward_diff(func);
    let dim = theta.len();
    if let Some(err) = closure_err.take() {
        return Err(err.into());
    }
    validate_grad(&fd_grad, dim)?;
    Ok(fd_grad)
}

/// compute_jacobian — finite-difference Jacobian of a vector of constraints.
///
/// Row `i` is the gradient of `x ↦ constraints(x)[i]`, obtained through
/// [`fd_gradient`]. The result has shape `n_constraints × theta.len()`.
///
/// # Errors
/// - Errors raised by `constraints` during differencing.
/// - [`OptError::GradientDimMismatch`] if `constraints` returns fewer than
///   `n_constraints` values at a perturbed point.
/// - Validation errors from [`validate_jacobian`].
pub fn compute_jacobian<C: Fn(&Theta) -> OptResult<Theta>>(
    constraints: &C, theta: &Theta, n_constraints: usize,
) -> OptResult<Jacobian> {
    let dim = theta.len();
    let mut jacobian = Jacobian::zeros((n_constraints, dim));
    for row in 0..n_constraints {
        let component = |x: &Theta| -> OptResult<f64> {
            let values = constraints(x)?;
            values.get(row).copied().ok_or(OptError::GradientDimMismatch {
                expected: n_constraints,
                found: values.len(),
            })
        };
        let grad = fd_gradient(theta, &component)?;
        jacobian.row_mut(row).assign(&grad);
    }
    validate_jacobian(&jacobian, n_constraints, dim)?;
    Ok(jacobian)
}

/// compute_hessian — finite-difference Hessian with validation and symmetry.
///
/// Approximates the Hessian from a gradient function, preferring central
/// differences and falling back to forward differences when validation
/// fails. The returned matrix is symmetrized in-place.
///
/// # Errors
/// - [`OptError::HessianDimMismatch`] / [`OptError::InvalidHessian`] when the
///   forward-difference fallback also fails validation.
///
/// # Notes
/// - The central-difference validation error is discarded; only the
///   forward-difference result is surfaced.
pub fn compute_hessian<F: Fn(&Theta) -> Grad>(f: &F, theta: &Theta) -> OptResult<Hessian> {
    let dim = theta.len();
    let mut cent_hess = theta.central_hessian(f);
    match validate_hessian(&cent_hess, dim) {
        Ok(_) => {
            symmetrize_hess(&mut cent_hess);
            Ok(cent_hess)
        }
        Err(_) => {
            let mut forward_hess = theta.forward_hessian(f);
            validate_hessian(&forward_hess, dim)?;
            symmetrize_hess(&mut forward_hess);
            Ok(forward_hess)
        }
    }
}

// ---- Helper methods ----

/// Replace each off-diagonal pair with its average; the diagonal is left
/// untouched. Assumes a square matrix that already passed validation.
fn symmetrize_hess(hess: &mut Hessian) {
    for i in 0..hess.nrows() {
        for j in 0..i {
            let avg = 0.5 * (hess[[i, j]] + hess[[j, i]]);
            hess[[i, j]] = avg;
            hess[[j, i]] = avg;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argmin::core::ArgminError;
    use ndarray::{Array1, Array2, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Central/forward gradient computation with and without closure errors.
    // - Row-wise constraint Jacobians.
    // - Finite-difference Hessian construction, symmetry, and validation.
    //
    // They intentionally DO NOT cover:
    // - End-to-end optimizer behavior (see `api` tests).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // `fd_gradient` matches the analytic gradient of a smooth function.
    //
    // Given
    // -----
    // - `f(x) = x₀² + 3 x₁` at `(2, 5)`.
    //
    // Expect
    // ------
    // - Gradient ≈ `(4, 3)`.
    fn fd_gradient_matches_analytic_gradient() {
        // Arrange
        let theta = array![2.0, 5.0];
        let f = |x: &Theta| -> OptResult<f64> { Ok(x[0] * x[0] + 3.0 * x[1]) };

        // Act
        let grad = fd_gradient(&theta, &f).expect("smooth function");

        // Assert
        assert!((grad[0] - 4.0).abs() < 1e-5);
        assert!((grad[1] - 3.0).abs() < 1e-5);
    }

    #[test]
    // Purpose
    // -------
    // An objective that always fails surfaces its own error rather than a
    // NaN gradient.
    //
    // Given
    // -----
    // - A function returning `OptError::NonFiniteCost` everywhere.
    //
    // Expect
    // ------
    // - `fd_gradient` returns that error.
    fn fd_gradient_propagates_objective_error() {
        let theta = array![1.0];
        let f = |_: &Theta| -> OptResult<f64> { Err(OptError::NonFiniteCost { value: f64::NAN }) };

        let err = fd_gradient(&theta, &f).expect_err("objective always fails");

        assert!(matches!(err, OptError::NonFiniteCost { .. }));
    }

    #[test]
    // Purpose
    // -------
    // Verify that `run_fd_diff` returns a valid gradient for a simple
    // quadratic objective with no internal error path.
    //
    // Expect
    // ------
    // - `grad.len() == theta.len()` and all entries finite.
    fn run_fd_diff_quadratic_returns_valid_gradient() {
        // Arrange
        let theta: Theta = Array1::from(vec![0.0_f64, 1.0]);
        let closure_err: RefCell<Option<Error>> = RefCell::new(None);
        let f = |x: &Theta| x.dot(x);

        // Act
        let result = run_fd_diff(&theta, &f, &closure_err);

        // Assert
        let grad = result.expect("Gradient for quadratic should be computed successfully");
        assert_eq!(grad.len(), theta.len());
        assert!(grad.iter().all(|v| v.is_finite()));
    }

    #[test]
    // Purpose
    // -------
    // Ensure that `run_fd_diff` propagates an error captured in `closure_err`.
    //
    // Given
    // -----
    // - A closure writing an `ArgminError` into `closure_err` and returning NaN.
    //
    // Expect
    // ------
    // - `Err(OptError::NotImplemented { .. })`.
    fn run_fd_diff_closure_error_is_propagated() {
        // Arrange
        let theta: Theta = Array1::from(vec![1.0_f64]);
        let closure_err: RefCell<Option<Error>> = RefCell::new(None);
        let f = |_: &Theta| {
            let argmin_err = ArgminError::NotImplemented { text: "fd test".to_string() };
            closure_err.replace(Some(argmin_err.into()));
            f64::NAN
        };

        // Act
        let result = run_fd_diff(&theta, &f, &closure_err);

        // Assert
        match result.expect_err("Error in closure should cause run_fd_diff to fail") {
            OptError::NotImplemented { .. } => {}
            other => panic!("Unexpected OptError variant from closure error: {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Affine constraints produce their constant coefficient rows.
    //
    // Given
    // -----
    // - `c(x) = [10 − x₀, x₁ − 1]`.
    //
    // Expect
    // ------
    // - Jacobian ≈ `[[-1, 0], [0, 1]]`.
    fn compute_jacobian_recovers_affine_rows() {
        // Arrange
        let theta = array![3.0, 2.0];
        let constraints = |x: &Theta| -> OptResult<Theta> { Ok(array![10.0 - x[0], x[1] - 1.0]) };

        // Act
        let jac = compute_jacobian(&constraints, &theta, 2).expect("affine constraints");

        // Assert
        assert_eq!(jac.shape(), &[2, 2]);
        assert!((jac[[0, 0]] + 1.0).abs() < 1e-6);
        assert!(jac[[0, 1]].abs() < 1e-6);
        assert!(jac[[1, 0]].abs() < 1e-6);
        assert!((jac[[1, 1]] - 1.0).abs() < 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // Verify that `compute_hessian` produces a finite, symmetric Hessian for
    // a quadratic model where the gradient is linear.
    //
    // Expect
    // ------
    // - Shape (2, 2), symmetric, finite, diagonal ≈ 2.
    fn compute_hessian_quadratic_returns_symmetric_matrix() {
        // Arrange
        let theta: Theta = Array1::from(vec![1.0_f64, 2.0]);
        let grad_fn = |theta: &Theta| theta.mapv(|x| 2.0 * x);

        // Act
        let hess = compute_hessian(&grad_fn, &theta)
            .expect("Hessian for quadratic gradient should be computed successfully");

        // Assert
        assert_eq!(hess.shape(), &[2, 2]);
        assert!((hess[[0, 1]] - hess[[1, 0]]).abs() < 1e-10);
        assert!((hess[[0, 0]] - 2.0).abs() < 1e-5);
        assert!(hess.iter().all(|v| v.is_finite()));
    }

    #[test]
    // Purpose
    // -------
    // Both central and forward Hessians containing NaN surface a validation
    // error.
    //
    // Expect
    // ------
    // - `Err(OptError::InvalidHessian { .. })`.
    fn compute_hessian_non_finite_entries_yield_invalidhessian_error() {
        let theta: Theta = Array1::from(vec![0.0_f64]);
        let grad_fn = |_theta: &Theta| Array1::from(vec![f64::NAN]);

        let result = compute_hessian(&grad_fn, &theta);

        match result.expect_err("Non-finite Hessian entries should cause an error") {
            OptError::InvalidHessian { .. } => {}
            other => panic!("Expected InvalidHessian, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // `symmetrize_hess` averages each off-diagonal pair.
    fn symmetrize_hess_makes_matrix_symmetric() {
        // Arrange
        let mut h: Hessian = Array2::from_shape_vec((2, 2), vec![1.0_f64, 2.0, 0.0, 3.0]).unwrap();

        // Act
        super::symmetrize_hess(&mut h);

        // Assert
        assert_eq!(h[[0, 0]], 1.0);
        assert_eq!(h[[1, 1]], 3.0);
        assert_eq!(h[[0, 1]], 1.0);
        assert_eq!(h[[1, 0]], 1.0);
    }
}
