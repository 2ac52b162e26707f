//! Policy optimizer: grid scan, constrained solve, lot-multiple snapping and
//! result assembly.
//!
//! [`PolicyOptimizer::optimize`] validates the inputs, evaluates the
//! starting cost and the cost surface, then minimizes the cost over the
//! constraint box with the log-barrier trust-region method of
//! [`barrier_optimizer`](crate::optimization::barrier_optimizer). The box
//! constraints are handed to the solver as inequalities `c(x) ≥ 0` together
//! with the analytic gradient and Hessian of the cost model.
//!
//! ## Seeding and degenerate boxes
//! The barrier method starts strictly inside the box: each free coordinate
//! of the caller's decision is clamped to
//! `[lower + m·w, upper − m·w]` (`w` = box width, `m` = interior margin).
//! A coordinate whose box has zero width is pinned to its bound and the solve
//! runs over the remaining coordinate; with both pinned the single feasible
//! point is evaluated directly.
//!
//! ## Lot multiples
//! With [`LotMultiplePolicy::Enforce`](crate::policy::core::options::LotMultiplePolicy)
//! the continuous optimum's lot is snapped to the neighbouring multiples
//! inside `[min_lot, max_lot]`, the service factor is re-solved with the lot
//! pinned for each, and the cheaper candidate wins.
use crate::{
    optimization::{
        barrier_optimizer::{api::minimize, traits::ConstrainedObjective, types::*},
        errors::{OptError, OptResult},
    },
    policy::{
        core::{
            constraints::{ConstraintKind, ConstraintSet},
            cost::CostModel,
            decision::DecisionVector,
            options::PolicyOptions,
            params::{MIN_SERVICE_FACTOR, PolicyParams},
            surface::CostSurface,
        },
        errors::{PolicyError, PolicyResult},
        result::{OptimizationResult, SolveStatus, SolverDiagnostics},
    },
};
use ndarray::Array2;

/// Distance to a boundary below which an inequality is reported as active.
pub const ACTIVE_TOLERANCE: f64 = 1e-4;

/// Cost minimization restricted to the free decision coordinates.
///
/// Pinned coordinates are read from `base`; `theta` holds the free ones in
/// increasing coordinate order.
#[derive(Debug, Clone)]
pub struct PolicyProblem<'a> {
    model: &'a CostModel,
    base: DecisionVector,
    free: Vec<usize>,
    kinds: Vec<ConstraintKind>,
}

impl<'a> PolicyProblem<'a> {
    pub fn new(
        model: &'a CostModel, constraints: &ConstraintSet, base: DecisionVector, free: Vec<usize>,
    ) -> Self {
        let kinds = constraints.inequalities_on(&free).collect();
        Self { model, base, free, kinds }
    }

    /// Full decision for the free coordinates in `theta`.
    pub fn decision(&self, theta: &Theta) -> DecisionVector {
        self.free
            .iter()
            .zip(theta.iter())
            .fold(self.base, |d, (&index, &value)| d.with_coordinate(index, value))
    }

    /// Free coordinates of `decision`.
    pub fn theta(&self, decision: &DecisionVector) -> Theta {
        self.free.iter().map(|&i| decision.coordinate(i)).collect()
    }

    pub fn constraint_kinds(&self) -> &[ConstraintKind] {
        &self.kinds
    }
}

impl<'a> ConstrainedObjective for PolicyProblem<'a> {
    fn value(&self, theta: &Theta) -> OptResult<Cost> {
        Ok(self.model.cost(&self.decision(theta))?)
    }

    fn constraints(&self, theta: &Theta) -> OptResult<Theta> {
        let decision = self.decision(theta);
        let params = self.model.params();
        Ok(self.kinds.iter().map(|k| k.evaluate(&decision, params)).collect())
    }

    fn check(&self, theta: &Theta) -> OptResult<()> {
        if theta.len() != self.free.len() {
            return Err(OptError::Objective {
                text: format!(
                    "expected {} free coordinates, got {}",
                    self.free.len(),
                    theta.len()
                ),
            });
        }
        self.decision(theta).validate()?;
        Ok(())
    }

    fn grad(&self, theta: &Theta) -> OptResult<Grad> {
        let full = self.model.gradient(&self.decision(theta))?;
        Ok(self.free.iter().map(|&i| full[i]).collect())
    }

    fn hessian(&self, theta: &Theta) -> OptResult<Hessian> {
        let full = self.model.hessian(&self.decision(theta))?;
        let n = self.free.len();
        Ok(Array2::from_shape_fn((n, n), |(r, c)| full[self.free[r]][self.free[c]]))
    }

    fn constraint_jacobian(&self, _theta: &Theta) -> OptResult<Jacobian> {
        let (m, n) = (self.kinds.len(), self.free.len());
        Ok(Array2::from_shape_fn((m, n), |(r, c)| self.kinds[r].gradient()[self.free[c]]))
    }

    fn affine_constraints(&self) -> bool {
        true
    }
}

/// Best point of one solve with its status and counters.
#[derive(Debug, Clone, PartialEq)]
struct Solution {
    decision: DecisionVector,
    status: SolveStatus,
    diagnostics: SolverDiagnostics,
}

/// Optimizer for one parameter set and one set of options.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyOptimizer {
    model: CostModel,
    options: PolicyOptions,
    constraints: ConstraintSet,
}

impl PolicyOptimizer {
    pub fn new(params: PolicyParams, options: PolicyOptions) -> Self {
        let constraints = if options.enforces_lot_multiple() {
            ConstraintSet::default().with_lot_multiple()
        } else {
            ConstraintSet::default()
        };
        Self { model: CostModel::new(params), options, constraints }
    }

    pub fn model(&self) -> &CostModel {
        &self.model
    }

    pub fn options(&self) -> &PolicyOptions {
        &self.options
    }

    pub fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    /// Run the full optimization from `initial_decision`.
    ///
    /// # Errors
    /// - Configuration errors for non-finite parameters or invalid options.
    /// - Constraint-infeasible errors for an empty box or, when enforced, no
    ///   lot multiple inside the lot range. Both are raised before any
    ///   solver work.
    /// - Domain errors for `min_lot ≤ 0` or an invalid initial decision.
    /// - [`PolicyError::Solver`] for hard solver failures.
    ///
    /// Non-convergence is reported in [`OptimizationResult::status`], not as
    /// an error.
    pub fn optimize(
        &self, initial_decision: DecisionVector,
    ) -> PolicyResult<(OptimizationResult, CostSurface)> {
        let params = self.model.params();
        params.validate()?;
        self.options.validate()?;
        params.check_feasible_region()?;
        let lot_step = self.lot_multiple_step()?;
        initial_decision.validate()?;

        self.model.cost(&initial_decision)?;
        let initial_breakdown = self.model.breakdown(&initial_decision)?;
        let surface = CostSurface::evaluate(&self.model, self.options.grid_resolution)?;

        let pins = self.degenerate_pins();
        let mut solution = self.solve_reduced(&initial_decision, &pins)?;
        if let Some(step) = lot_step {
            solution = self.snap_to_lot_multiple(solution, step)?;
        }

        let optimal_breakdown = self.model.breakdown(&solution.decision)?;
        let report = self.constraints.report(&solution.decision, params, ACTIVE_TOLERANCE);
        let result = OptimizationResult::new(
            initial_decision,
            initial_breakdown,
            solution.decision,
            optimal_breakdown,
            solution.status,
            report,
            solution.diagnostics,
            lot_step.is_some(),
        );
        Ok((result, surface))
    }

    // ---- Helper Methods ----

    fn lot_multiple_step(&self) -> PolicyResult<Option<f64>> {
        if !self.options.enforces_lot_multiple() {
            return Ok(None);
        }
        let params = self.model.params();
        let step = params.lot_multiple;
        if !step.is_finite() || step <= 0.0 {
            return Err(PolicyError::InvalidLotMultiple { value: step });
        }
        let (lo, hi) = ((params.min_lot / step).ceil(), (params.max_lot / step).floor());
        if lo > hi {
            return Err(PolicyError::NoLotMultipleInRange {
                lot_multiple: step,
                min_lot: params.min_lot,
                max_lot: params.max_lot,
            });
        }
        Ok(Some(step))
    }

    /// Coordinates whose box has zero width, with their only feasible value.
    fn degenerate_pins(&self) -> Vec<(usize, f64)> {
        let params = self.model.params();
        let mut pins = Vec::new();
        if params.lot_width() == 0.0 {
            pins.push((0, params.min_lot));
        }
        if params.service_width() == 0.0 {
            pins.push((1, MIN_SERVICE_FACTOR));
        }
        pins
    }

    /// Clamp each coordinate of `seed` into the shrunken interior of the box.
    fn interior_seed(&self, seed: &DecisionVector) -> DecisionVector {
        let params = self.model.params();
        let m = self.options.interior_margin;
        let clamp = |value: f64, lo: f64, hi: f64| {
            let w = hi - lo;
            if w > 0.0 { value.clamp(lo + m * w, hi - m * w) } else { lo }
        };
        DecisionVector::new(
            clamp(seed.lot_quantity, params.min_lot, params.max_lot),
            clamp(seed.service_factor, MIN_SERVICE_FACTOR, params.max_service_factor),
        )
    }

    fn solve_reduced(&self, seed: &DecisionVector, pins: &[(usize, f64)]) -> PolicyResult<Solution> {
        let base = pins
            .iter()
            .fold(self.interior_seed(seed), |d, &(index, value)| d.with_coordinate(index, value));
        let free: Vec<usize> = (0..2).filter(|i| pins.iter().all(|(p, _)| p != i)).collect();
        if free.is_empty() {
            self.model.cost(&base)?;
            return Ok(Solution {
                decision: base,
                status: SolveStatus::Converged {
                    reason: "feasible region is a single point".to_string(),
                },
                diagnostics: SolverDiagnostics::default(),
            });
        }

        let problem = PolicyProblem::new(&self.model, &self.constraints, base, free);
        let theta0 = problem.theta(&base);
        let outcome = minimize(&problem, theta0, &self.options.solver)?;
        Ok(Solution {
            decision: problem.decision(&outcome.theta_hat),
            status: SolveStatus::from_outcome(&outcome),
            diagnostics: SolverDiagnostics::from_outcome(&outcome),
        })
    }

    fn snap_to_lot_multiple(&self, continuous: Solution, step: f64) -> PolicyResult<Solution> {
        let params = self.model.params();
        let (lo, hi) = ((params.min_lot / step).ceil(), (params.max_lot / step).floor());
        let ratio = continuous.decision.lot_quantity / step;
        let below = ratio.floor().clamp(lo, hi) * step;
        let above = ratio.ceil().clamp(lo, hi) * step;
        let candidates = if below == above { vec![below] } else { vec![below, above] };

        let service_pin = self.degenerate_pins().into_iter().find(|&(index, _)| index == 1);
        let mut diagnostics = continuous.diagnostics;
        let mut best: Option<(f64, Solution)> = None;
        for lot in candidates {
            let mut pins = vec![(0, lot)];
            pins.extend(service_pin);
            let candidate = self.solve_reduced(&continuous.decision, &pins)?;
            diagnostics.absorb(candidate.diagnostics.clone());
            let candidate_cost = self.model.cost(&candidate.decision)?;
            if best.as_ref().map_or(true, |(cost, _)| candidate_cost < *cost) {
                best = Some((candidate_cost, candidate));
            }
        }

        let (_, mut chosen) = best.ok_or(PolicyError::NoLotMultipleInRange {
            lot_multiple: step,
            min_lot: params.min_lot,
            max_lot: params.max_lot,
        })?;
        diagnostics.barrier_param = chosen.diagnostics.barrier_param;
        diagnostics.grad_norm = chosen.diagnostics.grad_norm;
        chosen.diagnostics = diagnostics;
        Ok(chosen)
    }
}

/// Optimize with default options and the given grid resolution.
///
/// # Errors
/// See [`PolicyOptimizer::optimize`].
pub fn optimize(
    params: PolicyParams, initial_decision: DecisionVector, grid_resolution: usize,
) -> PolicyResult<(OptimizationResult, CostSurface)> {
    let options = PolicyOptions { grid_resolution, ..PolicyOptions::default() };
    PolicyOptimizer::new(params, options).optimize(initial_decision)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        optimization::barrier_optimizer::traits::{SolverOptions, Tolerances},
        policy::core::options::LotMultiplePolicy,
    };
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The reduced problem's coordinate mapping and derivatives.
    // - The reference scenario with and without lot multiples.
    // - Degenerate boxes and seeding.
    // - Error ordering for infeasible and domain failures.
    // - Non-convergence reporting.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // A problem with the lot pinned exposes only the service coordinate and
    // its two bounds.
    //
    // Given
    // -----
    // - Base `(120, 2)`, free coordinates `[1]`.
    //
    // Expect
    // ------
    // - `theta = [2]`, constraints `[3 − z, z − 1]`, Jacobian `[[-1], [1]]`.
    // - Gradient equals the service component of the full gradient.
    fn pinned_problem_maps_free_coordinates() {
        // Arrange
        let model = CostModel::new(PolicyParams::default());
        let base = DecisionVector::new(120.0, 2.0);
        let problem = PolicyProblem::new(&model, &ConstraintSet::default(), base, vec![1]);

        // Act
        let theta = problem.theta(&base);
        let c = problem.constraints(&array![2.5]).expect("constraints");
        let j = problem.constraint_jacobian(&theta).expect("jacobian");
        let g = problem.grad(&theta).expect("gradient");

        // Assert
        assert_eq!(theta, array![2.0]);
        assert_eq!(c, array![0.5, 1.5]);
        assert_eq!(j, array![[-1.0], [1.0]]);
        let full = model.gradient(&base).expect("gradient");
        assert_eq!(g, array![full[1]]);
        assert_eq!(problem.decision(&array![2.5]), DecisionVector::new(120.0, 2.5));
    }

    #[test]
    // Purpose
    // -------
    // The reference scenario lands on the lower lot bound with `z` at the
    // interior stationary point `φ(z) = √S / b`.
    //
    // Given
    // -----
    // - Reference parameters, seed `(140, 1.95)`, default options.
    //
    // Expect
    // ------
    // - Converged, lot ≈ 100, z ≈ 2.014, cost ≈ 1025 and below the initial
    //   cost; `MinLot` is the only active constraint.
    fn reference_scenario_reaches_lower_lot_bound() {
        let (result, surface) =
            optimize(PolicyParams::default(), DecisionVector::DEFAULT_SEED, 50).expect("solve");

        assert!(result.converged(), "status: {}", result.status);
        assert_abs_diff_eq!(result.optimal_decision.lot_quantity, 100.0, epsilon = 1e-3);
        assert_abs_diff_eq!(result.optimal_decision.service_factor, 2.014, epsilon = 1e-3);
        assert!(result.optimal_cost < result.initial_cost);
        assert_abs_diff_eq!(result.optimal_cost, 1025.0, epsilon = 0.5);
        let active: Vec<_> = result.active_constraints().map(|s| s.kind).collect();
        assert_eq!(active, vec![ConstraintKind::MinLot]);
        assert_eq!(surface.resolution(), 50);
        assert!(!result.lot_multiple_enforced);
    }

    #[test]
    // Purpose
    // -------
    // A service optimum beyond `max_service_factor` lands on that bound and
    // still counts as converged.
    //
    // Given
    // -----
    // - `shortage_cost_factor = 20000`, so `φ(z) = √S / b ≈ 0.0013` puts the
    //   unconstrained stationary point near `z ≈ 3.4 > 3`.
    //
    // Expect
    // ------
    // - Converged, z ≈ 3, lot ≈ 100.
    // - `MaxService` and `MinLot` are both active; all constraints hold.
    fn large_shortage_factor_reaches_max_service_bound() {
        let params = PolicyParams { shortage_cost_factor: 20_000.0, ..PolicyParams::default() };

        let (result, _) = optimize(params, DecisionVector::DEFAULT_SEED, 20).expect("solve");

        assert!(result.converged(), "status: {}", result.status);
        assert_abs_diff_eq!(result.optimal_decision.service_factor, 3.0, epsilon = 1e-3);
        assert_abs_diff_eq!(result.optimal_decision.lot_quantity, 100.0, epsilon = 1e-3);
        assert!(result.optimal_cost < result.initial_cost);
        let active: Vec<_> = result.active_constraints().map(|s| s.kind).collect();
        assert!(active.contains(&ConstraintKind::MaxService), "active: {active:?}");
        assert!(active.contains(&ConstraintKind::MinLot), "active: {active:?}");
        assert!(result.constraints.iter().all(|s| s.satisfied));
    }

    #[test]
    // Purpose
    // -------
    // Enforced lot multiples snap the lot onto a multiple of 20.
    //
    // Given
    // -----
    // - Reference parameters with `LotMultiplePolicy::Enforce`.
    //
    // Expect
    // ------
    // - Lot exactly 100 (the continuous optimum sits on the bound), the
    //   residual is zero and the service factor is re-solved.
    fn enforced_lot_multiple_snaps_to_multiple() {
        let options =
            PolicyOptions { lot_multiple: LotMultiplePolicy::Enforce, ..PolicyOptions::default() };
        let optimizer = PolicyOptimizer::new(PolicyParams::default(), options);

        let (result, _) = optimizer.optimize(DecisionVector::DEFAULT_SEED).expect("solve");

        assert_eq!(result.optimal_decision.lot_quantity, 100.0);
        assert_eq!(result.optimal_decision.lot_quantity % 20.0, 0.0);
        assert_abs_diff_eq!(result.optimal_decision.service_factor, 2.014, epsilon = 1e-3);
        assert!(result.lot_multiple_enforced);
        assert!(result.constraints.iter().any(|s| s.kind == ConstraintKind::LotMultiple
            && s.satisfied));
    }

    #[test]
    // Purpose
    // -------
    // A lot range without multiples is infeasible before any solve.
    //
    // Given
    // -----
    // - `min_lot = 101`, `max_lot = 119`, `lot_multiple = 20`, enforced.
    fn lot_range_without_multiple_is_infeasible() {
        let params = PolicyParams { min_lot: 101.0, max_lot: 119.0, ..PolicyParams::default() };
        let options =
            PolicyOptions { lot_multiple: LotMultiplePolicy::Enforce, ..PolicyOptions::default() };

        let err = PolicyOptimizer::new(params, options)
            .optimize(DecisionVector::DEFAULT_SEED)
            .expect_err("no multiple in range");

        assert!(err.is_constraint_infeasible());
    }

    #[test]
    // Purpose
    // -------
    // A degenerate lot box pins the lot and solves for `z` alone; a fully
    // degenerate box is evaluated directly.
    fn degenerate_boxes_are_pinned() {
        let lot_fixed = PolicyParams { min_lot: 150.0, max_lot: 150.0, ..PolicyParams::default() };
        let point =
            PolicyParams { max_service_factor: 1.0, ..lot_fixed };

        let (one_dim, _) =
            optimize(lot_fixed, DecisionVector::DEFAULT_SEED, 5).expect("1-D solve");
        let (single, _) = optimize(point, DecisionVector::DEFAULT_SEED, 5).expect("point");

        assert_eq!(one_dim.optimal_decision.lot_quantity, 150.0);
        assert_abs_diff_eq!(one_dim.optimal_decision.service_factor, 2.014, epsilon = 1e-3);
        assert_eq!(single.optimal_decision, DecisionVector::new(150.0, 1.0));
        assert_eq!(single.status.reason(), "feasible region is a single point");
        assert!(single.converged());
    }

    #[test]
    // Purpose
    // -------
    // Seeds on or beyond the boundary are pulled into the interior while the
    // result still reports the caller's starting point.
    fn boundary_seed_is_moved_inside() {
        let optimizer = PolicyOptimizer::new(PolicyParams::default(), PolicyOptions::default());
        let seed = DecisionVector::new(240.0, 0.5);

        let inside = optimizer.interior_seed(&seed);
        let (result, _) = optimizer.optimize(seed).expect("solve");

        assert_abs_diff_eq!(inside.lot_quantity, 240.0 - 0.14, epsilon = 1e-12);
        assert_abs_diff_eq!(inside.service_factor, 1.002, epsilon = 1e-12);
        assert_eq!(result.initial_decision, seed);
        assert!(result.converged(), "status: {}", result.status);
    }

    #[test]
    // Purpose
    // -------
    // Infeasible bounds are reported before the initial cost is evaluated,
    // and a zero lot is a domain error.
    fn infeasible_bounds_precede_domain_checks() {
        let swapped = PolicyParams { min_lot: 300.0, max_lot: 100.0, ..PolicyParams::default() };

        let infeasible = optimize(swapped, DecisionVector::new(0.0, 2.0), 50)
            .expect_err("empty box");
        let zero_lot = optimize(PolicyParams::default(), DecisionVector::new(0.0, 2.0), 50)
            .expect_err("zero lot");

        assert!(infeasible.is_constraint_infeasible());
        assert_eq!(zero_lot, PolicyError::NonPositiveLot { value: 0.0 });
    }

    #[test]
    // Purpose
    // -------
    // A tight iteration cap yields a best-effort point, not an error.
    //
    // Given
    // -----
    // - One trust-region iteration per barrier stage.
    //
    // Expect
    // ------
    // - `NotConverged` status, feasible decision.
    fn tight_iteration_cap_reports_not_converged() {
        let solver = SolverOptions {
            tols: Tolerances::new(Some(1e-6), Some(1)).expect("valid"),
            ..SolverOptions::default()
        };
        let options = PolicyOptions { solver, ..PolicyOptions::default() };
        let optimizer = PolicyOptimizer::new(PolicyParams::default(), options);

        let (result, _) = optimizer.optimize(DecisionVector::DEFAULT_SEED).expect("best effort");

        assert!(!result.converged());
        assert!(matches!(result.status, SolveStatus::NotConverged { .. }));
        assert!(result.constraints.iter().all(|s| s.satisfied));
    }
}
