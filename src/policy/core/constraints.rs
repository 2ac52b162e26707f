//! Constraint functions of the replenishment problem.
//!
//! Each [`ConstraintKind`] maps a decision to a scalar. Inequality kinds are
//! satisfied when the value is `≥ 0` and equal `0` exactly on their
//! boundary. The lot-multiple kind is an equality on the residual
//! `lot_quantity mod lot_multiple`; it is off by default and switched on with
//! [`ConstraintSet::with_lot_multiple`].
use crate::policy::core::{
    decision::DecisionVector,
    params::{MIN_SERVICE_FACTOR, PolicyParams},
};

/// One constraint of the replenishment problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    /// `max_lot − lot_quantity ≥ 0`
    MaxLot,
    /// `max_service_factor − service_factor ≥ 0`
    MaxService,
    /// `lot_quantity − min_lot ≥ 0`
    MinLot,
    /// `service_factor − 1 ≥ 0`
    MinService,
    /// `lot_quantity mod lot_multiple = 0`
    LotMultiple,
}

impl ConstraintKind {
    /// The four box constraints, in reporting order.
    pub const INEQUALITIES: [ConstraintKind; 4] = [
        ConstraintKind::MaxLot,
        ConstraintKind::MaxService,
        ConstraintKind::MinLot,
        ConstraintKind::MinService,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ConstraintKind::MaxLot => "max_lot",
            ConstraintKind::MaxService => "max_service_factor",
            ConstraintKind::MinLot => "min_lot",
            ConstraintKind::MinService => "min_service_factor",
            ConstraintKind::LotMultiple => "lot_multiple",
        }
    }

    pub fn is_equality(&self) -> bool {
        matches!(self, ConstraintKind::LotMultiple)
    }

    /// Index of the decision coordinate the constraint acts on
    /// (`0` lot, `1` service factor).
    pub fn coordinate(&self) -> usize {
        match self {
            ConstraintKind::MaxLot | ConstraintKind::MinLot | ConstraintKind::LotMultiple => 0,
            ConstraintKind::MaxService | ConstraintKind::MinService => 1,
        }
    }

    /// Constraint value at `decision`.
    ///
    /// The lot-multiple residual uses `rem_euclid`, so it lies in
    /// `[0, lot_multiple)` for a positive step.
    pub fn evaluate(&self, decision: &DecisionVector, params: &PolicyParams) -> f64 {
        match self {
            ConstraintKind::MaxLot => params.max_lot - decision.lot_quantity,
            ConstraintKind::MaxService => params.max_service_factor - decision.service_factor,
            ConstraintKind::MinLot => decision.lot_quantity - params.min_lot,
            ConstraintKind::MinService => decision.service_factor - MIN_SERVICE_FACTOR,
            ConstraintKind::LotMultiple => decision.lot_quantity.rem_euclid(params.lot_multiple),
        }
    }

    /// Gradient with respect to `[lot_quantity, service_factor]`.
    ///
    /// Constant for every kind; the lot-multiple residual has slope 1 between
    /// multiples.
    pub fn gradient(&self) -> [f64; 2] {
        match self {
            ConstraintKind::MaxLot => [-1.0, 0.0],
            ConstraintKind::MaxService => [0.0, -1.0],
            ConstraintKind::MinLot | ConstraintKind::LotMultiple => [1.0, 0.0],
            ConstraintKind::MinService => [0.0, 1.0],
        }
    }

    /// Whether `decision` satisfies the constraint within `tol`.
    ///
    /// For the lot-multiple residual both `0` and values just below the step
    /// count as satisfied.
    pub fn is_satisfied(&self, decision: &DecisionVector, params: &PolicyParams, tol: f64) -> bool {
        let value = self.evaluate(decision, params);
        match self {
            ConstraintKind::LotMultiple => value.min(params.lot_multiple - value) <= tol,
            _ => value >= -tol,
        }
    }
}

impl std::fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Value and activity of one constraint at a decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstraintStatus {
    pub kind: ConstraintKind,
    pub value: f64,
    pub satisfied: bool,
    /// Inequality within `tol` of its boundary.
    pub active: bool,
}

/// The constraints in force for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintSet {
    kinds: Vec<ConstraintKind>,
}

impl Default for ConstraintSet {
    fn default() -> Self {
        Self { kinds: ConstraintKind::INEQUALITIES.to_vec() }
    }
}

impl ConstraintSet {
    /// Add the lot-multiple equality.
    pub fn with_lot_multiple(mut self) -> Self {
        if !self.kinds.contains(&ConstraintKind::LotMultiple) {
            self.kinds.push(ConstraintKind::LotMultiple);
        }
        self
    }

    pub fn kinds(&self) -> &[ConstraintKind] {
        &self.kinds
    }

    pub fn contains(&self, kind: ConstraintKind) -> bool {
        self.kinds.contains(&kind)
    }

    pub fn enforces_lot_multiple(&self) -> bool {
        self.contains(ConstraintKind::LotMultiple)
    }

    /// Inequality kinds acting on any of `coordinates`.
    pub fn inequalities_on<'a>(
        &'a self, coordinates: &'a [usize],
    ) -> impl Iterator<Item = ConstraintKind> + 'a {
        self.kinds
            .iter()
            .copied()
            .filter(move |k| !k.is_equality() && coordinates.contains(&k.coordinate()))
    }

    /// All constraints satisfied within `tol`.
    pub fn is_feasible(&self, decision: &DecisionVector, params: &PolicyParams, tol: f64) -> bool {
        self.kinds.iter().all(|k| k.is_satisfied(decision, params, tol))
    }

    /// Per-constraint values and activity at `decision`.
    pub fn report(
        &self, decision: &DecisionVector, params: &PolicyParams, tol: f64,
    ) -> Vec<ConstraintStatus> {
        self.kinds
            .iter()
            .map(|&kind| {
                let value = kind.evaluate(decision, params);
                let satisfied = kind.is_satisfied(decision, params, tol);
                let active = kind.is_equality() || value.abs() <= tol;
                ConstraintStatus { kind, value, satisfied, active }
            })
            .collect()
    }
}
