//! Public API surface for constrained minimization.
//!
//! - [`ConstrainedObjective`]: trait users implement for their problem.
//! - [`SolverOptions`], [`Tolerances`], [`BarrierSchedule`],
//!   [`TrustRegionConfig`]: configuration for the optimizer.
//! - [`Subproblem`]: choice of trust-region subproblem solver.
//! - [`SolveOutcome`]: normalized result returned by [`minimize`](super::minimize).
//!
//! Convention: constraints are inequalities `c_i(x) ≥ 0`. The optimizer
//! minimizes the log-barrier function `φ_μ(x) = f(x) − μ Σ ln c_i(x)` for a
//! decreasing sequence of `μ`, so every iterate stays strictly feasible.
use crate::optimization::{
    errors::{OptError, OptResult},
    barrier_optimizer::{
        types::{
            Cost, DEFAULT_STAGE_MAX_ITER, DEFAULT_SUBPROBLEM_MAX_ITER, FnEvalMap, Grad, Hessian,
            Jacobian, Theta,
        },
        validation::{
            validate_theta_hat, validate_value, verify_barrier_schedule, verify_eta,
            verify_radius, verify_tol_grad,
        },
    },
};
use std::str::FromStr;

/// User-implemented constrained objective.
///
/// Required:
/// - `value(&Theta) -> OptResult<Cost>`: evaluate `f(x)`. Only called at
///   points where every constraint is strictly positive.
/// - `constraints(&Theta) -> OptResult<Theta>`: the vector `c(x)`; a point
///   is feasible when every entry is `≥ 0`. Must always return the same
///   number of entries.
/// - `check(&Theta) -> OptResult<()>`: validation hook called once before
///   optimization.
///
/// Optional (finite differences are used when these return the matching
/// `*NotImplemented` error):
/// - `grad(&Theta) -> OptResult<Grad>`: analytic `∇f(x)`.
/// - `hessian(&Theta) -> OptResult<Hessian>`: analytic `∇²f(x)`.
/// - `constraint_jacobian(&Theta) -> OptResult<Jacobian>`: analytic
///   `∂c/∂x`, one row per constraint.
/// - `affine_constraints() -> bool`: `true` when every `c_i` is affine, so
///   the barrier Hessian can be assembled analytically without constraint
///   curvature.
pub trait ConstrainedObjective {
    // Required methods
    fn value(&self, theta: &Theta) -> OptResult<Cost>;
    fn constraints(&self, theta: &Theta) -> OptResult<Theta>;
    fn check(&self, theta: &Theta) -> OptResult<()>;

    // Optional methods
    fn grad(&self, _theta: &Theta) -> OptResult<Grad> {
        Err(OptError::GradientNotImplemented)
    }

    fn hessian(&self, _theta: &Theta) -> OptResult<Hessian> {
        Err(OptError::HessianNotImplemented)
    }

    fn constraint_jacobian(&self, _theta: &Theta) -> OptResult<Jacobian> {
        Err(OptError::JacobianNotImplemented)
    }

    fn affine_constraints(&self) -> bool {
        false
    }
}

/// Choice of trust-region subproblem solver.
///
/// Variants:
/// - `Steihaug`: truncated conjugate gradient (default).
/// - `CauchyPoint`: steepest-descent step clipped to the region.
///
/// Parsing:
/// `FromStr` accepts case-insensitive `"Steihaug"` and `"CauchyPoint"`.
/// Unknown names return `OptError::InvalidSubproblem`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subproblem {
    Steihaug,
    CauchyPoint,
}

impl FromStr for Subproblem {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "steihaug" => Ok(Subproblem::Steihaug),
            "cauchypoint" => Ok(Subproblem::CauchyPoint),
            _ => Err(OptError::InvalidSubproblem {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'Steihaug' or 'CauchyPoint'.",
            }),
        }
    }
}

/// Stopping rules.
///
/// - `tol_grad`: the run counts as converged when, at the final barrier
///   parameter, the barrier gradient norm or half the squared Newton
///   decrement falls below this threshold. The decrement form accepts
///   optima on an active bound, where the steep barrier keeps the gradient
///   norm above the threshold.
/// - `max_iter`: hard cap on trust-region iterations per barrier stage.
///
/// At least one of the two must be provided (see [`Tolerances::new`]).
/// A missing `max_iter` falls back to [`DEFAULT_STAGE_MAX_ITER`]; a missing
/// `tol_grad` means convergence is declared once the barrier schedule is
/// completed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub tol_grad: Option<f64>,
    pub max_iter: Option<usize>,
}

impl Tolerances {
    /// Construct validated tolerances.
    ///
    /// # Errors
    /// - [`OptError::NoTolerancesProvided`] if both are `None`.
    /// - [`OptError::InvalidTolGrad`] for non-finite or non-positive `tol_grad`.
    /// - [`OptError::InvalidMaxIter`] if `max_iter == 0`.
    pub fn new(tol_grad: Option<f64>, max_iter: Option<usize>) -> OptResult<Self> {
        if tol_grad.is_none() && max_iter.is_none() {
            return Err(OptError::NoTolerancesProvided);
        }
        verify_tol_grad(tol_grad)?;
        if let Some(max_iter) = max_iter {
            if max_iter == 0 {
                return Err(OptError::InvalidMaxIter {
                    max_iter,
                    reason: "Maximum iterations must be greater than zero.",
                });
            }
        }
        Ok(Self { tol_grad, max_iter })
    }

    /// Per-stage iteration cap actually handed to the executor.
    pub fn stage_max_iter(&self) -> usize {
        self.max_iter.unwrap_or(DEFAULT_STAGE_MAX_ITER)
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        Self { tol_grad: Some(1e-6), max_iter: Some(DEFAULT_STAGE_MAX_ITER) }
    }
}

/// Geometric barrier schedule `μ_{k+1} = max(shrink · μ_k, mu_min)`.
///
/// Default: `mu_init = 1.0`, `mu_min = 1e-6`, `shrink = 0.1`,
/// `max_stages = 20`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarrierSchedule {
    pub mu_init: f64,
    pub mu_min: f64,
    pub shrink: f64,
    pub max_stages: usize,
}

impl BarrierSchedule {
    /// Construct a validated schedule.
    ///
    /// # Errors
    /// - [`OptError::InvalidBarrierParam`] unless `0 < mu_min ≤ mu_init` and
    ///   `0 < shrink < 1`.
    /// - [`OptError::InvalidMaxStages`] if `max_stages == 0`.
    pub fn new(mu_init: f64, mu_min: f64, shrink: f64, max_stages: usize) -> OptResult<Self> {
        verify_barrier_schedule(mu_init, mu_min, shrink)?;
        if max_stages == 0 {
            return Err(OptError::InvalidMaxStages {
                stages: max_stages,
                reason: "At least one barrier stage is required.",
            });
        }
        Ok(Self { mu_init, mu_min, shrink, max_stages })
    }

    /// Next barrier parameter after `mu`.
    pub fn next(&self, mu: f64) -> f64 {
        (mu * self.shrink).max(self.mu_min)
    }
}

impl Default for BarrierSchedule {
    fn default() -> Self {
        Self { mu_init: 1.0, mu_min: 1e-6, shrink: 0.1, max_stages: 20 }
    }
}

/// Trust-region radius management.
///
/// Default: `radius = 1.0`, `max_radius = 1e3`, `eta = 0.125`,
/// `subproblem_max_iter = 20`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrustRegionConfig {
    pub radius: f64,
    pub max_radius: f64,
    pub eta: f64,
    pub subproblem_max_iter: u64,
}

impl TrustRegionConfig {
    /// Construct a validated configuration.
    ///
    /// # Errors
    /// - [`OptError::InvalidRadius`] for non-positive radii or
    ///   `radius > max_radius`.
    /// - [`OptError::InvalidEta`] unless `eta ∈ [0, 0.25)`.
    /// - [`OptError::InvalidMaxIter`] if `subproblem_max_iter == 0`.
    pub fn new(
        radius: f64, max_radius: f64, eta: f64, subproblem_max_iter: u64,
    ) -> OptResult<Self> {
        verify_radius(radius)?;
        verify_radius(max_radius)?;
        if radius > max_radius {
            return Err(OptError::InvalidRadius {
                value: radius,
                reason: "Initial radius must not exceed the maximum radius.",
            });
        }
        verify_eta(eta)?;
        if subproblem_max_iter == 0 {
            return Err(OptError::InvalidMaxIter {
                max_iter: 0,
                reason: "Subproblem iterations must be greater than zero.",
            });
        }
        Ok(Self { radius, max_radius, eta, subproblem_max_iter })
    }
}

impl Default for TrustRegionConfig {
    fn default() -> Self {
        Self {
            radius: 1.0,
            max_radius: 1e3,
            eta: 0.125,
            subproblem_max_iter: DEFAULT_SUBPROBLEM_MAX_ITER,
        }
    }
}

/// Optimizer-level configuration.
///
/// Fields:
/// - `tols`: stopping rules.
/// - `barrier`: barrier parameter schedule.
/// - `trust_region`: radius management and subproblem cap.
/// - `subproblem`: trust-region subproblem solver.
/// - `verbose`: if `true`, attaches argmin's slog observer (behind the
///   `obs_slog` feature) and prints one line per barrier stage.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SolverOptions {
    pub tols: Tolerances,
    pub barrier: BarrierSchedule,
    pub trust_region: TrustRegionConfig,
    pub subproblem: Subproblem,
    pub verbose: bool,
}

impl Default for Subproblem {
    fn default() -> Self {
        Subproblem::Steihaug
    }
}

impl SolverOptions {
    /// Bundle already-validated components.
    pub fn new(
        tols: Tolerances, barrier: BarrierSchedule, trust_region: TrustRegionConfig,
        subproblem: Subproblem, verbose: bool,
    ) -> Self {
        Self { tols, barrier, trust_region, subproblem, verbose }
    }
}

/// Canonical result returned by `minimize`.
///
/// - `theta_hat`: best parameter vector found (strictly feasible).
/// - `value`: objective value `f(θ̂)` without the barrier term.
/// - `converged`: `true` when the barrier schedule completed and the final
///   stationarity test passed.
/// - `status`: human-readable termination summary.
/// - `iterations`: trust-region iterations summed over all stages.
/// - `stages`: number of barrier stages run.
/// - `fn_evals`: function-evaluation counters reported by `argmin`, summed.
/// - `grad_norm`: barrier gradient norm at `θ̂` for the final `μ`.
/// - `barrier_param`: final `μ`.
/// - `constraints`: `c(θ̂)`.
/// - `multipliers`: barrier estimates `λ_i = μ / c_i(θ̂)` of the Lagrange
///   multipliers; large values mark active constraints.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveOutcome {
    pub theta_hat: Theta,
    pub value: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub stages: usize,
    pub fn_evals: FnEvalMap,
    pub grad_norm: Option<f64>,
    pub barrier_param: f64,
    pub constraints: Theta,
    pub multipliers: Theta,
}

impl SolveOutcome {
    /// Build a validated [`SolveOutcome`] from the final solver state.
    ///
    /// # Errors
    /// - Propagates validation errors for `theta_hat` or `value`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        theta_hat_opt: Option<Theta>, value: f64, converged: bool, status: String,
        iterations: u64, stages: usize, fn_evals: FnEvalMap, grad_norm: Option<f64>,
        barrier_param: f64, constraints: Theta,
    ) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat_opt)?;
        validate_value(value)?;
        let multipliers = constraints.mapv(|c| barrier_param / c);
        Ok(Self {
            theta_hat,
            value,
            converged,
            status,
            iterations: iterations as usize,
            stages,
            fn_evals,
            grad_norm,
            barrier_param,
            constraints,
            multipliers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Option constructors and their validation paths.
    // - `Subproblem` parsing.
    // - Multiplier estimates in `SolveOutcome::new`.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // At least one stopping rule is required.
    //
    // Expect
    // ------
    // - `Tolerances::new(None, None)` fails with `NoTolerancesProvided`.
    // - A missing `max_iter` falls back to the default stage cap.
    fn tolerances_require_a_stopping_rule() {
        assert_eq!(Tolerances::new(None, None), Err(OptError::NoTolerancesProvided));
        let tols = Tolerances::new(Some(1e-8), None).expect("valid");
        assert_eq!(tols.stage_max_iter(), DEFAULT_STAGE_MAX_ITER);
    }

    #[test]
    // Purpose
    // -------
    // Subproblem names parse case-insensitively.
    //
    // Expect
    // ------
    // - "STEIHAUG" and "cauchypoint" parse; "dogleg" is rejected.
    fn subproblem_parses_case_insensitively() {
        assert_eq!("STEIHAUG".parse::<Subproblem>(), Ok(Subproblem::Steihaug));
        assert_eq!("cauchypoint".parse::<Subproblem>(), Ok(Subproblem::CauchyPoint));
        assert!(matches!(
            "dogleg".parse::<Subproblem>(),
            Err(OptError::InvalidSubproblem { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // The schedule is geometric and floored at `mu_min`.
    //
    // Given
    // -----
    // - `mu_init = 1`, `mu_min = 0.05`, `shrink = 0.1`.
    //
    // Expect
    // ------
    // - `next(1.0) == 0.1`, `next(0.1) == 0.05`.
    fn barrier_schedule_is_floored() {
        let schedule = BarrierSchedule::new(1.0, 0.05, 0.1, 5).expect("valid");
        assert!((schedule.next(1.0) - 0.1).abs() < 1e-15);
        assert_eq!(schedule.next(0.1), 0.05);
        assert!(matches!(
            BarrierSchedule::new(1.0, 0.05, 0.1, 0),
            Err(OptError::InvalidMaxStages { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Initial radius may not exceed the maximum radius.
    fn trust_region_config_orders_radii() {
        assert!(TrustRegionConfig::new(1.0, 10.0, 0.1, 5).is_ok());
        assert!(matches!(
            TrustRegionConfig::new(20.0, 10.0, 0.1, 5),
            Err(OptError::InvalidRadius { .. })
        ));
        assert!(matches!(
            TrustRegionConfig::new(1.0, 10.0, 0.1, 0),
            Err(OptError::InvalidMaxIter { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Multipliers are `μ / c_i`.
    //
    // Given
    // -----
    // - `μ = 1e-3`, `c = [1e-3, 2.0]`.
    //
    // Expect
    // ------
    // - `multipliers ≈ [1.0, 5e-4]`.
    fn solve_outcome_estimates_multipliers() {
        let outcome = SolveOutcome::new(
            Some(array![1.0, 2.0]),
            3.0,
            true,
            "ok".to_string(),
            4,
            2,
            FnEvalMap::new(),
            Some(0.0),
            1e-3,
            array![1e-3, 2.0],
        )
        .expect("valid outcome");
        assert!((outcome.multipliers[0] - 1.0).abs() < 1e-12);
        assert!((outcome.multipliers[1] - 5e-4).abs() < 1e-15);
        assert_eq!(outcome.iterations, 4);
    }

    #[test]
    // Purpose
    // -------
    // A missing estimate is an error, not a panic.
    fn solve_outcome_requires_theta_hat() {
        let err = SolveOutcome::new(
            None,
            0.0,
            false,
            String::new(),
            0,
            0,
            FnEvalMap::new(),
            None,
            1.0,
            array![1.0],
        )
        .expect_err("missing theta");
        assert_eq!(err, OptError::MissingThetaHat);
    }
}
