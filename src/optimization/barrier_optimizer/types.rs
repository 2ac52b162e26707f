//! barrier_optimizer::types — shared numeric aliases and solver wiring.
//!
//! Purpose
//! -------
//! Centralize the numeric types and trust-region solver aliases used by the
//! barrier optimizer so the rest of the layer stays agnostic to `ndarray`
//! and Argmin generics.
//!
//! Conventions
//! -----------
//! - `Theta`, `Grad` are column vectors of length `n` (free parameters).
//! - `Hessian` is a dense `n × n` matrix; `Jacobian` is `m × n` with one row
//!   per inequality constraint.
//! - The trust-region aliases assume Argmin's `(Subproblem, Float)` form
//!   as of the pinned Argmin version.
use argmin::solver::trustregion::{CauchyPoint, Steihaug, TrustRegion};
use ndarray::{Array1, Array2};
use std::collections::HashMap;

/// Parameter vector `x` searched by the optimizer.
pub type Theta = Array1<f64>;

/// Gradient vector, same shape as `Theta`.
pub type Grad = Array1<f64>;

/// Dense Hessian matrix; `n × n` for `n = Theta.len()`.
pub type Hessian = Array2<f64>;

/// Constraint Jacobian; `m × n` for `m` inequality constraints.
pub type Jacobian = Array2<f64>;

/// Scalar objective value.
pub type Cost = f64;

/// Function-evaluation counters as reported by the solver.
///
/// Maps counter names (e.g., `"cost_count"`) to counts, summed over all
/// barrier stages.
pub type FnEvalMap = HashMap<String, u64>;

/// Default per-stage iteration cap for the trust-region solver.
pub const DEFAULT_STAGE_MAX_ITER: usize = 100;

/// Default iteration cap for the Steihaug CG subproblem.
pub const DEFAULT_SUBPROBLEM_MAX_ITER: u64 = 20;

/// Steihaug truncated-CG subproblem specialized to this crate's numeric types.
pub type SteihaugCG = Steihaug<Theta, Cost>;

/// Trust region driven by the Steihaug subproblem.
pub type TrustRegionSteihaug = TrustRegion<SteihaugCG, Cost>;

/// Trust region driven by the Cauchy point subproblem.
pub type TrustRegionCauchy = TrustRegion<CauchyPoint<Cost>, Cost>;
