//! barrier_optimizer — argmin-powered log-barrier optimizer for problems
//! with smooth inequality constraints.
//!
//! Purpose
//! -------
//! Provide a constrained minimizer on top of Argmin's unconstrained trust
//! region. Callers implement a single trait, [`ConstrainedObjective`], and
//! invoke [`minimize`] to solve `min f(x)` subject to `c_i(x) ≥ 0`.
//!
//! Key behaviors
//! -------------
//! - Convert the constrained problem into a sequence of barrier problems
//!   `φ_μ(x) = f(x) − μ Σ ln c_i(x)` via [`adapter::BarrierAdapter`].
//! - Drive each stage with a trust region built in [`builders`] and run by
//!   [`run::run_trust_region`], warm-starting from the previous stage.
//! - Fall back to the finite-difference helpers in [`finite_diff`] for any
//!   derivative the objective does not supply.
//! - Normalize results into a [`SolveOutcome`] carrying the final point,
//!   objective value, barrier multipliers and diagnostics.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every iterate is strictly feasible: trial points outside the interior
//!   receive cost `+∞` and are rejected by the ratio test.
//! - The start point must satisfy `c_i(x₀) > 0` for all `i`; this is checked
//!   before any solver work is done.
//! - Configuration types ([`Tolerances`], [`BarrierSchedule`],
//!   [`TrustRegionConfig`]) are validated on construction.
//!
//! Conventions
//! -----------
//! - Constraints are always written as `c_i(x) ≥ 0`.
//! - [`ConstrainedObjective::value`] is the raw objective; reported values
//!   never include the barrier term.
//! - Errors bubble up as [`OptResult<T>`](crate::optimization::errors::OptResult);
//!   the layer never intentionally panics.
//!
//! Testing notes
//! -------------
//! - Unit tests in submodules cover barrier evaluation and derivative
//!   agreement in [`adapter`], solver construction in [`builders`],
//!   finite-difference fallbacks in [`finite_diff`], option validation in
//!   [`traits`] and [`validation`], and end-to-end solves in [`api`].

pub mod adapter;
pub mod api;
pub mod builders;
pub mod finite_diff;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::minimize;
pub use self::traits::{
    BarrierSchedule, ConstrainedObjective, SolveOutcome, SolverOptions, Subproblem, Tolerances,
    TrustRegionConfig,
};
pub use self::types::{Cost, FnEvalMap, Grad, Hessian, Jacobian, Theta};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use inventory_policy::optimization::barrier_optimizer::prelude::*;
//
// to import the main optimizer surface in a single line.

pub mod prelude {
    pub use super::api::minimize;
    pub use super::traits::{
        BarrierSchedule, ConstrainedObjective, SolveOutcome, SolverOptions, Subproblem,
        Tolerances, TrustRegionConfig,
    };
    pub use super::types::{Cost, Grad, Hessian, Jacobian, Theta};
}
