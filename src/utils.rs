#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*};

#[cfg(feature = "python-bindings")]
use crate::{
    optimization::barrier_optimizer::traits::{SolverOptions, Subproblem, Tolerances},
    policy::core::options::{LotMultiplePolicy, PolicyOptions},
};

#[cfg(feature = "python-bindings")]
pub fn extract_solver_options(
    tol_grad: Option<f64>, max_iter: Option<usize>, subproblem: Option<&str>, verbose: bool,
) -> PyResult<SolverOptions> {
    use std::str::FromStr;

    // Tolerances::new -> OptResult<Tolerances> -> PyErr
    let tols = Tolerances::new(tol_grad, max_iter)?;

    let subproblem = match subproblem {
        Some(name) => Subproblem::from_str(name)?,
        None => Subproblem::Steihaug,
    };

    Ok(SolverOptions { tols, subproblem, verbose, ..SolverOptions::default() })
}

#[cfg(feature = "python-bindings")]
pub fn extract_policy_options(
    grid_resolution: usize, lot_multiple: Option<&str>, interior_margin: f64,
    solver: SolverOptions,
) -> PyResult<PolicyOptions> {
    let policy = match lot_multiple {
        Some(name) => name.parse::<LotMultiplePolicy>().map_err(PyValueError::new_err)?,
        None => LotMultiplePolicy::Ignore,
    };

    // PolicyOptions::new -> PolicyResult<PolicyOptions> -> PyErr
    Ok(PolicyOptions::new(grid_resolution, policy, interior_margin, solver)?)
}
