//! Adapter that exposes a user `ConstrainedObjective` as an `argmin` problem.
//!
//! For a fixed barrier parameter `μ > 0` the adapter presents the
//! unconstrained function
//!
//! ```text
//! φ_μ(x) = f(x) − μ Σ ln c_i(x)
//! ```
//!
//! to `argmin`. Points with any `c_i(x) ≤ 0` are reported with cost `+∞`, so
//! the trust-region ratio test rejects every step that leaves the strict
//! interior and shrinks the radius instead.
use std::cell::RefCell;

use crate::optimization::{
    errors::{OptError, OptResult},
    barrier_optimizer::{
        finite_diff::{compute_hessian, compute_jacobian, fd_gradient},
        traits::ConstrainedObjective,
        types::{Cost, Grad, Hessian, Jacobian, Theta},
        validation::{validate_constraints, validate_grad, validate_hessian, validate_jacobian},
    },
};
use argmin::core::{CostFunction, Error, Gradient, Hessian as ArgminHessian};
use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, Array2};

/// Bridges a user `ConstrainedObjective` to `argmin`'s `CostFunction`,
/// `Gradient` and `Hessian` for one barrier stage.
///
/// - `CostFunction::cost` returns `φ_μ(x)`, or `+∞` outside the interior.
/// - `Gradient::gradient` returns `∇f(x) − μ Σ ∇c_i(x) / c_i(x)`.
/// - `Hessian::hessian` assembles `∇²f + μ Jᵀ diag(1/c²) J` when the
///   objective supplies analytic second derivatives and affine constraints,
///   and falls back to finite differences of the barrier gradient otherwise.
#[derive(Debug, Clone)]
pub struct BarrierAdapter<'a, F: ConstrainedObjective> {
    pub f: &'a F,
    pub mu: f64,
}

impl<'a, F: ConstrainedObjective> BarrierAdapter<'a, F> {
    /// Construct a new adapter for barrier parameter `mu`.
    pub fn new(f: &'a F, mu: f64) -> Self {
        Self { f, mu }
    }

    /// Evaluate `c(x)` and report whether `x` lies strictly inside every
    /// constraint.
    ///
    /// Non-finite trial points and NaN constraint values count as outside.
    ///
    /// # Errors
    /// Propagates user errors from `constraints`.
    pub fn interior(&self, theta: &Theta) -> OptResult<(Theta, bool)> {
        if theta.iter().any(|v| !v.is_finite()) {
            return Ok((Theta::zeros(0), false));
        }
        let values = self.f.constraints(theta)?;
        let inside = values.iter().all(|&c| c > 0.0 && c.is_finite());
        Ok((values, inside))
    }

    /// Barrier function value `φ_μ(x)`.
    ///
    /// Returns `+∞` for points on or outside the boundary without calling
    /// the objective there.
    pub fn barrier_value(&self, theta: &Theta) -> OptResult<Cost> {
        let (values, inside) = self.interior(theta)?;
        if !inside {
            return Ok(f64::INFINITY);
        }
        let value = self.f.value(theta)?;
        if !value.is_finite() {
            return Err(OptError::NonFiniteCost { value });
        }
        let log_sum: f64 = values.iter().map(|c| c.ln()).sum();
        Ok(value - self.mu * log_sum)
    }

    /// Barrier gradient `∇φ_μ(x)`.
    ///
    /// # Errors
    /// - [`OptError::OutsideBarrierDomain`] if some `c_i(x) ≤ 0`.
    /// - Propagates derivative validation errors and user errors.
    pub fn barrier_gradient(&self, theta: &Theta) -> OptResult<Grad> {
        let dim = theta.len();
        let values = self.strict_constraints(theta)?;
        let objective_grad = self.objective_grad(theta)?;
        let jacobian = self.jacobian(theta, values.len())?;
        let weights = values.mapv(|c| self.mu / c);
        let grad = objective_grad - jacobian.t().dot(&weights);
        validate_grad(&grad, dim)?;
        Ok(grad)
    }

    /// Barrier Hessian `∇²φ_μ(x)`.
    ///
    /// # Errors
    /// - [`OptError::OutsideBarrierDomain`] if some `c_i(x) ≤ 0`.
    /// - Propagates errors from analytic derivatives or the finite-difference
    ///   fallback.
    pub fn barrier_hessian(&self, theta: &Theta) -> OptResult<Hessian> {
        let dim = theta.len();
        let values = self.strict_constraints(theta)?;
        if self.f.affine_constraints() {
            match self.analytic_hessian(theta, &values) {
                Ok(hessian) => {
                    validate_hessian(&hessian, dim)?;
                    return Ok(hessian);
                }
                Err(
                    OptError::GradientNotImplemented
                    | OptError::HessianNotImplemented
                    | OptError::JacobianNotImplemented,
                ) => {}
                Err(e) => return Err(e),
            }
        }

        let closure_err: RefCell<Option<OptError>> = RefCell::new(None);
        let grad_func = |point: &Theta| -> Grad {
            match self.barrier_gradient(point) {
                Ok(g) => g,
                Err(e) => {
                    let mut slot = closure_err.borrow_mut();
                    if slot.is_none() {
                        *slot = Some(e);
                    }
                    Array1::from_elem(dim, f64::NAN)
                }
            }
        };
        let hessian = compute_hessian(&grad_func, theta);
        if let Some(err) = closure_err.take() {
            return Err(err);
        }
        hessian
    }

    /// Newton decrement `√(gᵀ H⁻¹ g)` of `φ_μ` at `theta`.
    ///
    /// `½·decrement²` is the decrease predicted by a full Newton step.
    /// Returns `None` when the barrier Hessian is not positive definite.
    ///
    /// # Errors
    /// Propagates errors from [`barrier_gradient`](Self::barrier_gradient)
    /// and [`barrier_hessian`](Self::barrier_hessian).
    pub fn newton_decrement(&self, theta: &Theta) -> OptResult<Option<f64>> {
        let grad = self.barrier_gradient(theta)?;
        let hessian = self.barrier_hessian(theta)?;
        let n = grad.len();
        let h = DMatrix::from_fn(n, n, |i, j| hessian[[i, j]]);
        let g = DVector::from_iterator(n, grad.iter().copied());
        Ok(h.cholesky().map(|chol| g.dot(&chol.solve(&g)).max(0.0).sqrt()))
    }

    // ---- Helper Methods ----

    fn strict_constraints(&self, theta: &Theta) -> OptResult<Theta> {
        let values = self.f.constraints(theta)?;
        validate_constraints(&values)?;
        if let Some((index, &value)) = values.iter().enumerate().find(|(_, c)| **c <= 0.0) {
            return Err(OptError::OutsideBarrierDomain { index, value });
        }
        Ok(values)
    }

    fn objective_grad(&self, theta: &Theta) -> OptResult<Grad> {
        match self.f.grad(theta) {
            Ok(g) => {
                validate_grad(&g, theta.len())?;
                Ok(g)
            }
            Err(OptError::GradientNotImplemented) => {
                fd_gradient(theta, &|point: &Theta| self.f.value(point))
            }
            Err(e) => Err(e),
        }
    }

    fn jacobian(&self, theta: &Theta, n_constraints: usize) -> OptResult<Jacobian> {
        match self.f.constraint_jacobian(theta) {
            Ok(j) => {
                validate_jacobian(&j, n_constraints, theta.len())?;
                Ok(j)
            }
            Err(OptError::JacobianNotImplemented) => {
                compute_jacobian(&|point: &Theta| self.f.constraints(point), theta, n_constraints)
            }
            Err(e) => Err(e),
        }
    }

    fn analytic_hessian(&self, theta: &Theta, values: &Theta) -> OptResult<Hessian> {
        let dim = theta.len();
        let objective_hessian = self.f.hessian(theta)?;
        validate_hessian(&objective_hessian, dim)?;
        let jacobian = self.f.constraint_jacobian(theta)?;
        validate_jacobian(&jacobian, values.len(), dim)?;
        let mut scaled = Array2::<f64>::zeros(jacobian.raw_dim());
        for (i, (row, &c)) in jacobian.rows().into_iter().zip(values.iter()).enumerate() {
            scaled.row_mut(i).assign(&(&row * (self.mu / (c * c))));
        }
        Ok(objective_hessian + jacobian.t().dot(&scaled))
    }
}

impl<'a, F: ConstrainedObjective> CostFunction for BarrierAdapter<'a, F> {
    type Param = Theta;
    type Output = Cost;

    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        Ok(self.barrier_value(theta)?)
    }
}

impl<'a, F: ConstrainedObjective> Gradient for BarrierAdapter<'a, F> {
    type Param = Theta;
    type Gradient = Grad;

    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        Ok(self.barrier_gradient(theta)?)
    }
}

impl<'a, F: ConstrainedObjective> ArgminHessian for BarrierAdapter<'a, F> {
    type Param = Theta;
    type Hessian = Hessian;

    fn hessian(&self, theta: &Self::Param) -> Result<Self::Hessian, Error> {
        Ok(self.barrier_hessian(theta)?)
    }
}
