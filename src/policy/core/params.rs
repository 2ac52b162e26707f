//! Replenishment cost parameters and their validation.
//!
//! [`PolicyParams`] carries the thirteen caller-supplied scalars of one
//! optimization run. Construction is plain struct initialization; callers run
//! [`PolicyParams::validate`] for finiteness and
//! [`PolicyParams::check_feasible_region`] for the constraint box before
//! handing the parameters to the cost model or the optimizer.
//!
//! ## Units
//! - Demand is per month; lead time and its deviation are in the caller's
//!   own time unit and enter the safety-stock spread unchanged.
//! - `holding_rate` and `capital_cost` are fractional rates. `capital_cost`
//!   is carried for completeness but does not enter the cost.
use crate::policy::errors::{PolicyError, PolicyResult};

/// Caller-supplied inputs for one optimization run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolicyParams {
    /// Fixed cost per order placed.
    pub order_cost: f64,
    /// Fraction of unit cost charged for holding one unit.
    pub holding_rate: f64,
    /// Capital cost rate; not used by the cost model.
    pub capital_cost: f64,
    /// Multiplier on unit cost applied to the stockout probability.
    pub shortage_cost_factor: f64,
    /// Purchase cost per unit.
    pub unit_cost: f64,
    /// Mean demand per month.
    pub monthly_demand: f64,
    /// Mean replenishment lead time.
    pub lead_time: f64,
    /// Standard deviation of monthly demand.
    pub demand_std_dev: f64,
    /// Standard deviation of the lead time.
    pub lead_time_std_dev: f64,
    /// Upper bound on the lot quantity.
    pub max_lot: f64,
    /// Lower bound on the lot quantity.
    pub min_lot: f64,
    /// Step of admissible lots when lot multiples are enforced.
    pub lot_multiple: f64,
    /// Upper bound on the service factor (lower bound is 1).
    pub max_service_factor: f64,
}

/// Fixed lower bound of the service factor.
pub const MIN_SERVICE_FACTOR: f64 = 1.0;

impl Default for PolicyParams {
    fn default() -> Self {
        Self {
            order_cost: 40.0,
            holding_rate: 0.084,
            capital_cost: 0.062,
            shortage_cost_factor: 500.0,
            unit_cost: 15.0,
            monthly_demand: 20.0,
            lead_time: 180.0,
            demand_std_dev: 3.0,
            lead_time_std_dev: 10.0,
            max_lot: 240.0,
            min_lot: 100.0,
            lot_multiple: 20.0,
            max_service_factor: 3.0,
        }
    }
}

impl PolicyParams {
    /// Named view of all fields, in declaration order.
    pub fn fields(&self) -> [(&'static str, f64); 13] {
        [
            ("order_cost", self.order_cost),
            ("holding_rate", self.holding_rate),
            ("capital_cost", self.capital_cost),
            ("shortage_cost_factor", self.shortage_cost_factor),
            ("unit_cost", self.unit_cost),
            ("monthly_demand", self.monthly_demand),
            ("lead_time", self.lead_time),
            ("demand_std_dev", self.demand_std_dev),
            ("lead_time_std_dev", self.lead_time_std_dev),
            ("max_lot", self.max_lot),
            ("min_lot", self.min_lot),
            ("lot_multiple", self.lot_multiple),
            ("max_service_factor", self.max_service_factor),
        ]
    }

    /// Reject non-finite fields. Signs are not checked.
    ///
    /// # Errors
    /// [`PolicyError::NonFiniteParam`] naming the first offending field.
    pub fn validate(&self) -> PolicyResult<()> {
        match self.fields().into_iter().find(|(_, v)| !v.is_finite()) {
            Some((field, value)) => Err(PolicyError::NonFiniteParam { field, value }),
            None => Ok(()),
        }
    }

    /// Cheap feasibility checks of the constraint box.
    ///
    /// # Errors
    /// - [`PolicyError::InfeasibleLotBounds`] if `min_lot > max_lot`.
    /// - [`PolicyError::InfeasibleServiceBound`] if `max_service_factor < 1`.
    /// - [`PolicyError::NonPositiveMinLot`] if `min_lot ≤ 0`.
    pub fn check_feasible_region(&self) -> PolicyResult<()> {
        if self.min_lot > self.max_lot {
            return Err(PolicyError::InfeasibleLotBounds {
                min_lot: self.min_lot,
                max_lot: self.max_lot,
            });
        }
        if self.max_service_factor < MIN_SERVICE_FACTOR {
            return Err(PolicyError::InfeasibleServiceBound {
                max_service_factor: self.max_service_factor,
            });
        }
        if self.min_lot <= 0.0 {
            return Err(PolicyError::NonPositiveMinLot { value: self.min_lot });
        }
        Ok(())
    }

    /// Radicand of the safety-stock term:
    /// `lead_time + lead_time_std_dev² + demand_std_dev² + monthly_demand²`.
    pub fn safety_spread(&self) -> f64 {
        self.lead_time
            + self.lead_time_std_dev.powi(2)
            + self.demand_std_dev.powi(2)
            + self.monthly_demand.powi(2)
    }

    pub fn lot_width(&self) -> f64 {
        self.max_lot - self.min_lot
    }

    pub fn service_width(&self) -> f64 {
        self.max_service_factor - MIN_SERVICE_FACTOR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Reference defaults and the derived spread.
    // - Finiteness validation and feasibility checks, including their order.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Defaults reproduce the reference form and its spread
    // `180 + 100 + 9 + 400 = 689`.
    fn defaults_match_reference_form() {
        let params = PolicyParams::default();

        assert_eq!(params.safety_spread(), 689.0);
        assert_eq!(params.lot_width(), 140.0);
        assert_eq!(params.service_width(), 2.0);
        assert!(params.validate().is_ok());
        assert!(params.check_feasible_region().is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Non-finite fields are named in the error.
    //
    // Given
    // -----
    // - `unit_cost = NaN`.
    //
    // Expect
    // ------
    // - `NonFiniteParam { field: "unit_cost", .. }`.
    fn validate_names_non_finite_field() {
        let params = PolicyParams { unit_cost: f64::NAN, ..PolicyParams::default() };

        let err = params.validate().expect_err("NaN should be rejected");

        assert!(matches!(err, PolicyError::NonFiniteParam { field: "unit_cost", .. }));
    }

    #[test]
    // Purpose
    // -------
    // Swapped lot bounds are infeasible.
    //
    // Given
    // -----
    // - `min_lot = 300`, `max_lot = 100`.
    //
    // Expect
    // ------
    // - `InfeasibleLotBounds` in the constraint-infeasible category.
    fn swapped_lot_bounds_are_infeasible() {
        let params = PolicyParams { min_lot: 300.0, max_lot: 100.0, ..PolicyParams::default() };

        let err = params.check_feasible_region().expect_err("empty box");

        assert_eq!(err, PolicyError::InfeasibleLotBounds { min_lot: 300.0, max_lot: 100.0 });
        assert!(err.is_constraint_infeasible());
    }

    #[test]
    // Purpose
    // -------
    // The service bound and the minimum lot guard are both enforced.
    fn service_bound_and_min_lot_guard() {
        let low_z = PolicyParams { max_service_factor: 0.5, ..PolicyParams::default() };
        let zero_min = PolicyParams { min_lot: 0.0, ..PolicyParams::default() };

        assert!(matches!(
            low_z.check_feasible_region(),
            Err(PolicyError::InfeasibleServiceBound { .. })
        ));
        let err = zero_min.check_feasible_region().expect_err("min_lot = 0");
        assert_eq!(err, PolicyError::NonPositiveMinLot { value: 0.0 });
        assert!(err.is_domain());
    }
}
