//! Execution helper that runs one trust-region barrier stage through an
//! `argmin` executor and returns a compact [`StageReport`].
use crate::optimization::{
    errors::{OptError, OptResult},
    barrier_optimizer::{
        adapter::BarrierAdapter,
        traits::ConstrainedObjective,
        types::{FnEvalMap, Grad, Hessian, Theta},
    },
};
#[cfg(feature = "obs_slog")]
use argmin::core::{CostFunction, Gradient};
use argmin::core::{Executor, IterState, Solver, State, TerminationStatus};
#[cfg(feature = "obs_slog")]
use argmin_math::ArgminL2Norm;

/// Result of a single barrier stage.
///
/// - `theta`: best strictly feasible point found in the stage.
/// - `iterations`: trust-region iterations performed.
/// - `fn_evals`: Argmin's function-evaluation counters for the stage.
/// - `termination`: Argmin's termination status, formatted.
#[derive(Debug, Clone, PartialEq)]
pub struct StageReport {
    pub theta: Theta,
    pub iterations: u64,
    pub fn_evals: FnEvalMap,
    pub termination: String,
}

/// Run a trust-region solver on the barrier problem for one value of `μ`.
///
/// Wires up:
/// - the barrier problem via [`BarrierAdapter`],
/// - the chosen trust-region `solver`,
/// - the warm-start point `theta0`,
/// - the per-stage iteration cap `max_iter`,
/// - an optional slog observer when `verbose` is set and the `obs_slog`
///   feature is enabled.
///
/// # Errors
/// - Propagates any `argmin` runtime error via `From<argmin::core::Error>`.
/// - [`OptError::MissingThetaHat`] if the executor reports no best point.
pub fn run_trust_region<'a, F, S>(
    theta0: Theta, max_iter: usize, verbose: bool, problem: BarrierAdapter<'a, F>, solver: S,
) -> OptResult<StageReport>
where
    F: ConstrainedObjective,
    S: Solver<BarrierAdapter<'a, F>, IterState<Theta, Grad, (), Hessian, (), f64>>
        + Send
        + 'static,
{
    #[cfg(feature = "obs_slog")]
    if verbose {
        log_initial_state(&theta0, &problem)?;
    }
    #[cfg(not(feature = "obs_slog"))]
    let _ = verbose;

    let optimizer = Executor::new(problem, solver)
        .configure(|state| state.param(theta0).max_iters(max_iter as u64));
    #[cfg(feature = "obs_slog")]
    let optimizer = if verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always)
    } else {
        optimizer
    };

    let mut result = optimizer.run()?.state().clone();
    let iterations = result.get_iter();
    let fn_evals = result.get_func_counts().clone();
    let termination = match result.get_termination_status() {
        TerminationStatus::NotTerminated => "Not terminated".to_string(),
        TerminationStatus::Terminated(reason) => format!("{reason:?}"),
    };
    let theta = result.take_best_param().ok_or(OptError::MissingThetaHat)?;
    Ok(StageReport { theta, iterations, fn_evals, termination })
}

// ---- Helper Methods ----

#[cfg(feature = "obs_slog")]
fn log_initial_state<F>(theta0: &Theta, problem: &BarrierAdapter<'_, F>) -> OptResult<()>
where
    F: ConstrainedObjective,
{
    let phi0 = problem.cost(theta0)?;
    let g0n = problem.gradient(theta0).ok().map(|g| g.l2_norm());

    eprintln!(
        "stage init: mu = {:.3e}, phi(theta0) = {:.6}{}",
        problem.mu,
        phi0,
        g0n.map(|n| format!(", ||grad|| = {:.6}", n)).unwrap_or_default()
    );
    Ok(())
}
