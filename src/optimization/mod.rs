//! optimization — constrained minimization stack and unified error surface.
//!
//! Purpose
//! -------
//! Provide a problem-agnostic optimization layer: an Argmin-backed
//! log-barrier trust-region minimizer for smooth objectives with inequality
//! constraints, plus a single error/result surface. Callers implement one
//! trait, pick options, and obtain the solution with diagnostics without
//! touching backend solver details.
//!
//! Key behaviors
//! -------------
//! - Expose [`barrier_optimizer::minimize`] for problems
//!   `min f(x)` s.t. `c_i(x) ≥ 0`, including configuration of the barrier
//!   schedule, the trust region, and stopping criteria.
//! - Normalize configuration issues, numerical failures, and backend solver
//!   errors into [`errors::OptError`] with the alias `OptResult<T>`.
//!
//! Invariants & assumptions
//! ------------------------
//! - The start point is strictly feasible; iterates never leave the
//!   interior of the constraint set.
//! - Invalid states are reported as `OptError`, not panics.
//!
//! Conventions
//! -----------
//! - Parameters, gradients, and Hessians use the `ndarray` aliases in
//!   [`barrier_optimizer::types`].
//! - Progress output is opt-in through `SolverOptions::verbose`.
//!
//! Downstream usage
//! ----------------
//! - The policy layer implements `ConstrainedObjective` for the reduced
//!   replenishment problem and converts `OptError` into its own error type.
//!
//! Testing notes
//! -------------
//! - `barrier_optimizer` submodules test solver wiring, barrier evaluation,
//!   and toy constrained problems; `errors` tests the backend conversions.

pub mod barrier_optimizer;
pub mod errors;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use inventory_policy::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::barrier_optimizer::prelude::*;
    pub use super::errors::{OptError, OptResult};
}
