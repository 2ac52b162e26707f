//! Outcome of one policy optimization run.
//!
//! [`OptimizationResult`] carries the six headline scalars (initial and
//! optimal decision and cost, the cost difference and its percentage), the
//! solve status, per-term cost breakdowns, a constraint activity report, and
//! solver diagnostics. It is built once by
//! [`OptimizationResult::new`] and never mutated.
//!
//! ## Percentage convention
//! `cost_delta_pct = cost_delta / initial_cost × 100`. When `initial_cost`
//! is zero the value is `0.0` if the delta is also zero and the IEEE result
//! of the division otherwise.
use crate::{
    optimization::barrier_optimizer::{traits::SolveOutcome, types::FnEvalMap},
    policy::core::{constraints::ConstraintStatus, cost::CostBreakdown, decision::DecisionVector},
};

/// Whether the run reached a verified optimum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveStatus {
    Converged { reason: String },
    NotConverged { reason: String },
}

impl SolveStatus {
    pub fn is_optimal(&self) -> bool {
        matches!(self, SolveStatus::Converged { .. })
    }

    pub fn reason(&self) -> &str {
        match self {
            SolveStatus::Converged { reason } | SolveStatus::NotConverged { reason } => reason,
        }
    }

    /// Status of a generic solver run.
    pub fn from_outcome(outcome: &SolveOutcome) -> Self {
        if outcome.converged {
            SolveStatus::Converged { reason: outcome.status.clone() }
        } else {
            SolveStatus::NotConverged { reason: outcome.status.clone() }
        }
    }
}

impl std::fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolveStatus::Converged { reason } => write!(f, "converged ({reason})"),
            SolveStatus::NotConverged { reason } => write!(f, "did not converge ({reason})"),
        }
    }
}

/// Counters and final state of the solver, summed over every solve of the
/// run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SolverDiagnostics {
    pub iterations: usize,
    pub barrier_stages: usize,
    pub fn_evals: FnEvalMap,
    /// Final barrier parameter of the solve that produced the optimum.
    pub barrier_param: Option<f64>,
    /// Barrier gradient norm of the solve that produced the optimum.
    pub grad_norm: Option<f64>,
}

impl SolverDiagnostics {
    pub fn from_outcome(outcome: &SolveOutcome) -> Self {
        Self {
            iterations: outcome.iterations,
            barrier_stages: outcome.stages,
            fn_evals: outcome.fn_evals.clone(),
            barrier_param: Some(outcome.barrier_param),
            grad_norm: outcome.grad_norm,
        }
    }

    /// Add `other`'s counters; final-state fields are taken from `other`.
    pub fn absorb(&mut self, other: SolverDiagnostics) {
        self.iterations += other.iterations;
        self.barrier_stages += other.barrier_stages;
        for (name, count) in other.fn_evals {
            *self.fn_evals.entry(name).or_insert(0) += count;
        }
        self.barrier_param = other.barrier_param;
        self.grad_norm = other.grad_norm;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationResult {
    pub initial_decision: DecisionVector,
    pub initial_cost: f64,
    pub optimal_decision: DecisionVector,
    pub optimal_cost: f64,
    /// `initial_cost − optimal_cost`
    pub cost_delta: f64,
    /// `cost_delta / initial_cost × 100`
    pub cost_delta_pct: f64,
    pub status: SolveStatus,
    pub initial_breakdown: CostBreakdown,
    pub optimal_breakdown: CostBreakdown,
    pub constraints: Vec<ConstraintStatus>,
    pub diagnostics: SolverDiagnostics,
    pub lot_multiple_enforced: bool,
}

impl OptimizationResult {
    /// Assemble a result and derive the cost deltas.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        initial_decision: DecisionVector, initial_breakdown: CostBreakdown,
        optimal_decision: DecisionVector, optimal_breakdown: CostBreakdown, status: SolveStatus,
        constraints: Vec<ConstraintStatus>, diagnostics: SolverDiagnostics,
        lot_multiple_enforced: bool,
    ) -> Self {
        let initial_cost = initial_breakdown.total();
        let optimal_cost = optimal_breakdown.total();
        let cost_delta = initial_cost - optimal_cost;
        Self {
            initial_decision,
            initial_cost,
            optimal_decision,
            optimal_cost,
            cost_delta,
            cost_delta_pct: delta_pct(cost_delta, initial_cost),
            status,
            initial_breakdown,
            optimal_breakdown,
            constraints,
            diagnostics,
            lot_multiple_enforced,
        }
    }

    pub fn converged(&self) -> bool {
        self.status.is_optimal()
    }

    /// Constraints flagged active at the optimum.
    pub fn active_constraints(&self) -> impl Iterator<Item = &ConstraintStatus> {
        self.constraints.iter().filter(|s| s.active)
    }
}

fn delta_pct(delta: f64, initial: f64) -> f64 {
    if initial == 0.0 && delta == 0.0 { 0.0 } else { delta / initial * 100.0 }
}

impl std::fmt::Display for OptimizationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.status.is_optimal() {
            writeln!(f, "Warning: optimizer did not converge: {}", self.status.reason())?;
        }
        writeln!(f, "Initial point")?;
        writeln!(f, "  lot quantity:    {:.2}", self.initial_decision.lot_quantity)?;
        writeln!(f, "  service factor:  {:.2}", self.initial_decision.service_factor)?;
        writeln!(f, "  cost:            {:.2}", self.initial_cost)?;
        writeln!(f, "Optimal point")?;
        writeln!(f, "  lot quantity:    {:.2}", self.optimal_decision.lot_quantity)?;
        writeln!(f, "  service factor:  {:.2}", self.optimal_decision.service_factor)?;
        writeln!(f, "  cost:            {:.2}", self.optimal_cost)?;
        writeln!(f, "Cost difference")?;
        writeln!(f, "  value:           {:.2}", self.cost_delta)?;
        write!(f, "  percentage:      {:.2}%", self.cost_delta_pct)
    }
}
