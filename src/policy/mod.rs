//! policy — replenishment policy optimization (lot size and service factor).
//!
//! Purpose
//! -------
//! Choose the lot quantity `Q` and safety-stock service factor `z` that
//! minimize a closed-form replenishment cost subject to box constraints,
//! and report how much the optimum saves relative to a starting policy.
//!
//! Key behaviors
//! -------------
//! - [`core`] holds the validated parameters, the decision vector, the cost
//!   model with analytic derivatives, the constraint functions, the cost
//!   surface, and run options.
//! - [`optimizer::PolicyOptimizer`] validates inputs, evaluates the cost
//!   surface, solves the constrained problem with the log-barrier
//!   trust-region method, optionally snaps the lot to a multiple, and
//!   assembles an [`result::OptimizationResult`].
//! - [`errors::PolicyError`] classifies every failure as a domain,
//!   constraint-infeasible, configuration, or solver error.
//!
//! Invariants & assumptions
//! ------------------------
//! - Infeasible bounds are detected before any cost evaluation or solver
//!   work.
//! - The returned optimum always satisfies the box constraints; failure to
//!   verify optimality is reported as
//!   [`SolveStatus::NotConverged`](result::SolveStatus), never as an error.
//! - The cost surface and the solver evaluate the same function.
//!
//! Conventions
//! -----------
//! - Coordinate `0` is the lot quantity and `1` the service factor.
//! - Costs are in the monetary unit of `unit_cost` per planning period.
//!
//! Downstream usage
//! ----------------
//! - Most callers use the free function [`optimizer::optimize`] with
//!   [`PolicyParams::default`](core::params::PolicyParams) style inputs, or
//!   construct a [`PolicyOptimizer`](optimizer::PolicyOptimizer) with custom
//!   [`PolicyOptions`](core::options::PolicyOptions).
//! - The Python bindings wrap the same entry point.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each submodule; end-to-end scenarios are in
//!   `tests/integration_policy_pipeline.rs`.

pub mod core;
pub mod errors;
pub mod optimizer;
pub mod result;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::core::{
    constraints::{ConstraintKind, ConstraintSet, ConstraintStatus},
    cost::{CostBreakdown, CostModel},
    decision::DecisionVector,
    options::{LotMultiplePolicy, PolicyOptions},
    params::PolicyParams,
    surface::CostSurface,
};
pub use self::errors::{ErrorCategory, PolicyError, PolicyResult};
pub use self::optimizer::{PolicyOptimizer, optimize};
pub use self::result::{OptimizationResult, SolveStatus, SolverDiagnostics};

pub mod prelude {
    pub use super::core::{
        constraints::{ConstraintKind, ConstraintSet, ConstraintStatus},
        cost::{CostBreakdown, CostModel},
        decision::DecisionVector,
        options::{LotMultiplePolicy, PolicyOptions},
        params::PolicyParams,
        surface::CostSurface,
    };
    pub use super::errors::{ErrorCategory, PolicyError, PolicyResult};
    pub use super::optimizer::{PolicyOptimizer, optimize};
    pub use super::result::{OptimizationResult, SolveStatus, SolverDiagnostics};
}
