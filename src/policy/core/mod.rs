//! policy::core — cost model, constraints, and supporting value types.
//!
//! Purpose
//! -------
//! Hold the pure, side-effect-free building blocks of the replenishment
//! problem: validated parameters, the decision vector, the closed-form cost
//! with its analytic derivatives, the constraint functions, the cost grid,
//! and run options. Nothing here runs a solver.
//!
//! Key behaviors
//! -------------
//! - [`params::PolicyParams`] validates finiteness and the feasibility of the
//!   constraint box.
//! - [`cost::CostModel`] evaluates the four-term cost, its breakdown,
//!   gradient and Hessian, and guards its domain.
//! - [`constraints::ConstraintSet`] evaluates and reports the box
//!   constraints and the optional lot-multiple equality.
//! - [`surface::CostSurface`] evaluates the cost on a regular grid.
//!
//! Conventions
//! -----------
//! - Decisions are `(lot_quantity, service_factor)`; coordinate index `0` is
//!   the lot and `1` the service factor everywhere in this module.
//! - Fallible operations return
//!   [`PolicyResult`](crate::policy::errors::PolicyResult).

pub mod constraints;
pub mod cost;
pub mod decision;
pub mod normal;
pub mod options;
pub mod params;
pub mod surface;
