//! High-level entry point for minimizing a user-provided `ConstrainedObjective`.
//!
//! Runs a sequence of trust-region solves on the log-barrier function for a
//! geometrically shrinking barrier parameter, warm-starting every stage from
//! the previous stage's best point.
use crate::optimization::{
    errors::OptResult,
    barrier_optimizer::{
        adapter::BarrierAdapter,
        builders::{build_trust_region_cauchy, build_trust_region_steihaug},
        run::{StageReport, run_trust_region},
        traits::{ConstrainedObjective, SolveOutcome, SolverOptions, Subproblem},
        types::{FnEvalMap, Theta},
        validation::validate_start,
    },
};
use argmin_math::ArgminL2Norm;

/// Minimize `f(x)` subject to `c_i(x) ≥ 0` with a log-barrier trust-region
/// method.
///
/// # Behavior
/// - Validates the start with `f.check(theta0)` and requires
///   `c_i(theta0) > 0` for every constraint.
/// - For `μ = mu_init, shrink · mu_init, …` down to `mu_min` (at most
///   `max_stages` stages), minimizes `φ_μ(x) = f(x) − μ Σ ln c_i(x)` with a
///   trust region whose subproblem is chosen by `opts.subproblem`.
/// - The run converges when the schedule reached `mu_min` and, if
///   `tol_grad` is set, either `‖∇φ_μ(θ̂)‖ ≤ tol_grad` or the Newton
///   decrement `δ` at `θ̂` satisfies `δ²/2 ≤ tol_grad`, both at the final `μ`.
///
/// # Errors
/// - Propagates any error from `f.check`, `f.value` or `f.constraints`.
/// - [`OptError::InfeasibleStart`](crate::optimization::errors::OptError::InfeasibleStart)
///   if `theta0` is not strictly feasible.
/// - Propagates builder and executor errors.
///
/// # Example
/// ```
/// use ndarray::array;
/// use inventory_policy::optimization::barrier_optimizer::prelude::*;
/// use inventory_policy::optimization::errors::OptResult;
///
/// /// min (x - 3)² subject to 1 - x ≥ 0
/// struct Capped;
/// impl ConstrainedObjective for Capped {
///     fn value(&self, theta: &Theta) -> OptResult<f64> {
///         Ok((theta[0] - 3.0).powi(2))
///     }
///     fn constraints(&self, theta: &Theta) -> OptResult<Theta> {
///         Ok(array![1.0 - theta[0]])
///     }
///     fn check(&self, _: &Theta) -> OptResult<()> {
///         Ok(())
///     }
/// }
///
/// let out = minimize(&Capped, array![0.0], &SolverOptions::default())?;
/// assert!((out.theta_hat[0] - 1.0).abs() < 1e-4);
/// # Ok::<(), inventory_policy::optimization::errors::OptError>(())
/// ```
pub fn minimize<F: ConstrainedObjective>(
    f: &F, theta0: Theta, opts: &SolverOptions,
) -> OptResult<SolveOutcome> {
    f.check(&theta0)?;
    let c0 = f.constraints(&theta0)?;
    validate_start(&theta0, &c0)?;

    let schedule = &opts.barrier;
    let max_iter = opts.tols.stage_max_iter();
    let mut theta = theta0;
    let mut mu = schedule.mu_init;
    let mut stages = 0usize;
    let mut iterations = 0u64;
    let mut fn_evals = FnEvalMap::new();

    loop {
        let report = run_stage(f, theta, mu, max_iter, opts)?;
        stages += 1;
        iterations += report.iterations;
        for (name, count) in &report.fn_evals {
            *fn_evals.entry(name.clone()).or_insert(0) += count;
        }
        theta = report.theta;
        if opts.verbose {
            log_stage(f, &theta, mu, stages, &report.termination);
        }
        if mu <= schedule.mu_min || stages >= schedule.max_stages {
            break;
        }
        mu = schedule.next(mu);
    }

    let adapter = BarrierAdapter::new(f, mu);
    let grad_norm = adapter.barrier_gradient(&theta).ok().map(|g| g.l2_norm());
    let decrement = adapter.newton_decrement(&theta).ok().flatten();
    let schedule_done = mu <= schedule.mu_min;
    let stationary = match opts.tols.tol_grad {
        Some(tol) => {
            grad_norm.is_some_and(|n| n <= tol) || decrement.is_some_and(|d| 0.5 * d * d <= tol)
        }
        None => true,
    };
    let converged = schedule_done && stationary;
    let status = if converged {
        format!("Barrier schedule completed after {stages} stages at mu = {mu:.1e}")
    } else if !schedule_done {
        format!(
            "Stage limit {} reached with mu = {mu:.1e} above mu_min = {:.1e}",
            schedule.max_stages, schedule.mu_min
        )
    } else {
        format!(
            "Barrier gradient norm {} and Newton decrement {} above tolerance {:e} at mu = {mu:.1e}",
            grad_norm.map_or_else(|| "unavailable".to_string(), |n| format!("{n:.3e}")),
            decrement.map_or_else(|| "unavailable".to_string(), |d| format!("{d:.3e}")),
            opts.tols.tol_grad.unwrap_or(f64::NAN)
        )
    };

    let value = f.value(&theta)?;
    let constraints = f.constraints(&theta)?;
    SolveOutcome::new(
        Some(theta),
        value,
        converged,
        status,
        iterations,
        stages,
        fn_evals,
        grad_norm,
        mu,
        constraints,
    )
}

// ---- Helper Methods ----

fn run_stage<F: ConstrainedObjective>(
    f: &F, theta: Theta, mu: f64, max_iter: usize, opts: &SolverOptions,
) -> OptResult<StageReport> {
    let problem = BarrierAdapter::new(f, mu);
    match opts.subproblem {
        Subproblem::Steihaug => {
            let solver = build_trust_region_steihaug(&opts.trust_region)?;
            run_trust_region(theta, max_iter, opts.verbose, problem, solver)
        }
        Subproblem::CauchyPoint => {
            let solver = build_trust_region_cauchy(&opts.trust_region)?;
            run_trust_region(theta, max_iter, opts.verbose, problem, solver)
        }
    }
}

fn log_stage<F: ConstrainedObjective>(
    f: &F, theta: &Theta, mu: f64, stage: usize, termination: &str,
) {
    let value = f.value(theta).unwrap_or(f64::NAN);
    eprintln!("stage {stage}: mu = {mu:.1e}, f = {value:.6}, theta = {theta}, {termination}");
}
