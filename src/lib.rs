//! inventory_policy — constrained optimization of inventory replenishment
//! policies with Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that exposes
//! the policy optimizer to Python via the `_inventory_policy` extension
//! module. When the `python-bindings` feature is enabled, this module defines
//! the Python-facing function and classes used by a thin Python front-end.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules (`optimization` and `policy`) as the
//!   public crate surface.
//! - Define `#[pyclass]` wrappers for the optimization result and the cost
//!   surface, the `optimize_policy` `#[pyfunction]`, and the `#[pymodule]`
//!   initializer for `_inventory_policy`.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work is implemented in the inner Rust modules; this file
//!   performs only FFI glue, argument defaults, and error mapping.
//! - Python keyword defaults mirror [`PolicyParams::default`] and
//!   [`DecisionVector::DEFAULT_SEED`].
//!
//! Conventions
//! -----------
//! - Errors from core Rust code are propagated as rich error types internally
//!   and converted to `ValueError` at the PyO3 boundary.
//! - Cost surface arrays are returned as NumPy arrays with rows along the lot
//!   axis and columns along the service axis.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should depend directly on [`policy`] and can ignore the
//!   PyO3 items guarded by the `python-bindings` feature.
//! - A Python front-end (form input, chart rendering) imports
//!   `_inventory_policy` and calls `optimize_policy(**fields)`.
//!
//! Testing notes
//! -------------
//! - Core behavior is covered by unit tests in the inner modules and by the
//!   integration tests under `tests/`.

pub mod optimization;
pub mod policy;
pub mod utils;

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray1, PyArray2};

#[cfg(feature = "python-bindings")]
use pyo3::prelude::*;

#[cfg(feature = "python-bindings")]
use crate::{
    policy::{
        core::{decision::DecisionVector, params::PolicyParams, surface::CostSurface},
        optimizer::PolicyOptimizer,
        result::OptimizationResult,
    },
    utils::{extract_policy_options, extract_solver_options},
};

/// OptimizationResult — Python-facing view of one policy optimization.
///
/// Purpose
/// -------
/// Expose the headline scalars, status, and cost breakdowns of an
/// [`OptimizationResult`] as read-only Python properties.
///
/// Notes
/// -----
/// - Instances are created by `optimize_policy`; Rust callers use
///   [`OptimizationResult`] directly.
/// - `str(result)` returns the two-decimal summary.
#[cfg(feature = "python-bindings")]
#[pyclass(name = "OptimizationResult", module = "inventory_policy")]
pub struct PyOptimizationResult {
    inner: OptimizationResult,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PyOptimizationResult {
    #[getter]
    pub fn initial_lot(&self) -> f64 {
        self.inner.initial_decision.lot_quantity
    }

    #[getter]
    pub fn initial_service_factor(&self) -> f64 {
        self.inner.initial_decision.service_factor
    }

    #[getter]
    pub fn initial_cost(&self) -> f64 {
        self.inner.initial_cost
    }

    #[getter]
    pub fn optimal_lot(&self) -> f64 {
        self.inner.optimal_decision.lot_quantity
    }

    #[getter]
    pub fn optimal_service_factor(&self) -> f64 {
        self.inner.optimal_decision.service_factor
    }

    #[getter]
    pub fn optimal_cost(&self) -> f64 {
        self.inner.optimal_cost
    }

    #[getter]
    pub fn cost_delta(&self) -> f64 {
        self.inner.cost_delta
    }

    #[getter]
    pub fn cost_delta_pct(&self) -> f64 {
        self.inner.cost_delta_pct
    }

    #[getter]
    pub fn converged(&self) -> bool {
        self.inner.converged()
    }

    #[getter]
    pub fn status(&self) -> String {
        self.inner.status.reason().to_string()
    }

    #[getter]
    pub fn iterations(&self) -> usize {
        self.inner.diagnostics.iterations
    }

    /// `(holding, ordering, safety_stock, shortage)` at the optimum.
    #[getter]
    pub fn optimal_breakdown(&self) -> (f64, f64, f64, f64) {
        let b = &self.inner.optimal_breakdown;
        (b.holding, b.ordering, b.safety_stock, b.shortage)
    }

    /// Names of the constraints active at the optimum.
    #[getter]
    pub fn active_constraints(&self) -> Vec<String> {
        self.inner.active_constraints().map(|s| s.kind.name().to_string()).collect()
    }

    pub fn __str__(&self) -> String {
        self.inner.to_string()
    }
}

/// CostSurface — cost grid for plotting, exposed as NumPy arrays.
#[cfg(feature = "python-bindings")]
#[pyclass(name = "CostSurface", module = "inventory_policy")]
pub struct PyCostSurface {
    inner: CostSurface,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PyCostSurface {
    #[getter]
    pub fn service_axis<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.inner.service_axis.clone().into_pyarray_bound(py)
    }

    #[getter]
    pub fn lot_axis<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.inner.lot_axis.clone().into_pyarray_bound(py)
    }

    /// `costs[i, j]` is the cost at `(lot_axis[i], service_axis[j])`.
    #[getter]
    pub fn costs<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray2<f64>> {
        self.inner.costs.clone().into_pyarray_bound(py)
    }
}

/// Optimize a replenishment policy from keyword arguments.
///
/// Returns `(OptimizationResult, CostSurface)`. Raises `ValueError` for
/// domain, feasibility, configuration, and solver errors; non-convergence is
/// reported through `OptimizationResult.converged`.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (
    order_cost = 40.0, holding_rate = 0.084, capital_cost = 0.062,
    shortage_cost_factor = 500.0, unit_cost = 15.0, monthly_demand = 20.0,
    lead_time = 180.0, demand_std_dev = 3.0, lead_time_std_dev = 10.0,
    max_lot = 240.0, min_lot = 100.0, lot_multiple = 20.0, max_service_factor = 3.0,
    initial_lot = 140.0, initial_service_factor = 1.95, grid_resolution = 50,
    lot_multiple_policy = None, interior_margin = 1e-3, tol_grad = Some(1e-6),
    max_iter = Some(100), subproblem = None, verbose = false
))]
#[allow(clippy::too_many_arguments)]
pub fn optimize_policy(
    order_cost: f64, holding_rate: f64, capital_cost: f64, shortage_cost_factor: f64,
    unit_cost: f64, monthly_demand: f64, lead_time: f64, demand_std_dev: f64,
    lead_time_std_dev: f64, max_lot: f64, min_lot: f64, lot_multiple: f64,
    max_service_factor: f64, initial_lot: f64, initial_service_factor: f64,
    grid_resolution: usize, lot_multiple_policy: Option<&str>, interior_margin: f64,
    tol_grad: Option<f64>, max_iter: Option<usize>, subproblem: Option<&str>, verbose: bool,
) -> PyResult<(PyOptimizationResult, PyCostSurface)> {
    let params = PolicyParams {
        order_cost,
        holding_rate,
        capital_cost,
        shortage_cost_factor,
        unit_cost,
        monthly_demand,
        lead_time,
        demand_std_dev,
        lead_time_std_dev,
        max_lot,
        min_lot,
        lot_multiple,
        max_service_factor,
    };
    let solver = extract_solver_options(tol_grad, max_iter, subproblem, verbose)?;
    let options =
        extract_policy_options(grid_resolution, lot_multiple_policy, interior_margin, solver)?;
    let initial = DecisionVector::new(initial_lot, initial_service_factor);

    let (result, surface) = PolicyOptimizer::new(params, options).optimize(initial)?;
    Ok((PyOptimizationResult { inner: result }, PyCostSurface { inner: surface }))
}

/// _inventory_policy — PyO3 module initializer for the Python extension.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _inventory_policy<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(optimize_policy, m)?)?;
    m.add_class::<PyOptimizationResult>()?;
    m.add_class::<PyCostSurface>()?;
    Ok(())
}
