//! Closed-form replenishment cost and its analytic derivatives.
//!
//! For a decision `(Q, z)` and parameters with `K = order_cost`,
//! `D = monthly_demand`, `u = unit_cost`, `h = holding_rate`,
//! `b = shortage_cost_factor` and spread
//! `S = lead_time + lead_time_std_dev² + demand_std_dev² + monthly_demand²`:
//!
//! ```text
//! cost(Q, z) = Q·u·h/2                 holding
//!            + K·D/(2Q)                ordering
//!            + z·√S·u                  safety stock
//!            + b·u·(1 − Φ(z))          shortage
//! ```
//!
//! Derivatives:
//!
//! ```text
//! ∂/∂Q   = u·h/2 − K·D/(2Q²)          ∂/∂z   = √S·u − b·u·φ(z)
//! ∂²/∂Q² = K·D/Q³                      ∂²/∂z² = b·u·z·φ(z)
//! ∂²/∂Q∂z = 0
//! ```
//!
//! The model is separable in `Q` and `z`. The safety-stock spread mixes the
//! mean lead time with squared deviations and the squared mean demand; it is
//! kept exactly as written.
//!
//! Every entry point checks its inputs: `Q ≤ 0` or non-finite is a
//! [`PolicyError::NonPositiveLot`], a non-finite `z` is a
//! [`PolicyError::NonFiniteDecision`], and a negative spread is a
//! [`PolicyError::NegativeSpread`]. No clamping is applied.
use crate::policy::{
    core::{
        decision::DecisionVector,
        normal::{standard_normal_pdf, standard_normal_sf},
        params::PolicyParams,
    },
    errors::{PolicyError, PolicyResult},
};

/// The four additive terms of the cost at one decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostBreakdown {
    pub holding: f64,
    pub ordering: f64,
    pub safety_stock: f64,
    pub shortage: f64,
}

impl CostBreakdown {
    /// Sum of the four terms.
    pub fn total(&self) -> f64 {
        self.holding + self.ordering + self.safety_stock + self.shortage
    }
}

/// Cost model bound to one set of parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostModel {
    params: PolicyParams,
}

impl CostModel {
    pub fn new(params: PolicyParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &PolicyParams {
        &self.params
    }

    /// Total cost at `decision`.
    ///
    /// # Errors
    /// Domain errors for invalid lots, service factors or spread, and
    /// [`PolicyError::NonFiniteCost`] if the sum overflows.
    pub fn cost(&self, decision: &DecisionVector) -> PolicyResult<f64> {
        let total = self.breakdown(decision)?.total();
        if !total.is_finite() {
            return Err(PolicyError::NonFiniteCost { value: total });
        }
        Ok(total)
    }

    /// Individual cost terms at `decision`.
    pub fn breakdown(&self, decision: &DecisionVector) -> PolicyResult<CostBreakdown> {
        let (q, z) = self.checked(decision)?;
        let p = &self.params;
        let root = self.spread_root()?;
        Ok(CostBreakdown {
            holding: q * p.unit_cost * p.holding_rate / 2.0,
            ordering: p.order_cost * p.monthly_demand / (2.0 * q),
            safety_stock: z * root * p.unit_cost,
            shortage: p.shortage_cost_factor * p.unit_cost * standard_normal_sf(z),
        })
    }

    /// Analytic gradient `[∂/∂Q, ∂/∂z]`.
    pub fn gradient(&self, decision: &DecisionVector) -> PolicyResult<[f64; 2]> {
        let (q, z) = self.checked(decision)?;
        let p = &self.params;
        let root = self.spread_root()?;
        let d_lot = p.unit_cost * p.holding_rate / 2.0
            - p.order_cost * p.monthly_demand / (2.0 * q * q);
        let d_service = root * p.unit_cost
            - p.shortage_cost_factor * p.unit_cost * standard_normal_pdf(z);
        Ok([d_lot, d_service])
    }

    /// Analytic Hessian; the off-diagonal entries are zero.
    pub fn hessian(&self, decision: &DecisionVector) -> PolicyResult<[[f64; 2]; 2]> {
        let (q, z) = self.checked(decision)?;
        self.spread_root()?;
        let p = &self.params;
        let d_lot_lot = p.order_cost * p.monthly_demand / (q * q * q);
        let d_service_service =
            p.shortage_cost_factor * p.unit_cost * z * standard_normal_pdf(z);
        Ok([[d_lot_lot, 0.0], [0.0, d_service_service]])
    }

    // ---- Helper Methods ----

    fn checked(&self, decision: &DecisionVector) -> PolicyResult<(f64, f64)> {
        let q = decision.lot_quantity;
        if !q.is_finite() || q <= 0.0 {
            return Err(PolicyError::NonPositiveLot { value: q });
        }
        let z = decision.service_factor;
        if !z.is_finite() {
            return Err(PolicyError::NonFiniteDecision { field: "service_factor", value: z });
        }
        Ok((q, z))
    }

    fn spread_root(&self) -> PolicyResult<f64> {
        let spread = self.params.safety_spread();
        if spread < 0.0 {
            return Err(PolicyError::NegativeSpread { value: spread });
        }
        Ok(spread.sqrt())
    }
}

/// Total cost at `decision` for `params`.
pub fn cost(decision: &DecisionVector, params: &PolicyParams) -> PolicyResult<f64> {
    CostModel::new(*params).cost(decision)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use finitediff::FiniteDiff;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The reference cost at the default seed and its breakdown.
    // - Domain guards for the lot and the spread.
    // - Monotonicity in the shortage factor and the z trade-off.
    // - Agreement of the analytic derivatives with `finitediff`.
    // -------------------------------------------------------------------------

    fn reference_model() -> CostModel {
        CostModel::new(PolicyParams::default())
    }

    #[test]
    // Purpose
    // -------
    // The default seed reproduces the hand-computed reference cost.
    //
    // Given
    // -----
    // - Reference parameters, decision `(140, 1.95)`.
    //
    // Expect
    // ------
    // - holding 88.2, ordering 800/280, safety 1.95·√689·15.
    // - Total ≈ 1050.7 and equal to the sum of the breakdown.
    fn reference_seed_cost_matches_hand_computation() {
        // Arrange
        let model = reference_model();
        let seed = DecisionVector::DEFAULT_SEED;

        // Act
        let parts = model.breakdown(&seed).expect("valid decision");
        let total = model.cost(&seed).expect("valid decision");

        // Assert
        assert_abs_diff_eq!(parts.holding, 88.2, epsilon = 1e-10);
        assert_abs_diff_eq!(parts.ordering, 800.0 / 280.0, epsilon = 1e-12);
        assert_abs_diff_eq!(parts.safety_stock, 1.95 * 689f64.sqrt() * 15.0, epsilon = 1e-10);
        assert_abs_diff_eq!(parts.shortage, 7500.0 * 0.025_588, epsilon = 0.01);
        assert_eq!(total, parts.total());
        assert_abs_diff_eq!(total, 1050.7, epsilon = 0.1);
    }

    #[test]
    // Purpose
    // -------
    // A zero lot is a domain error, never ±∞.
    fn zero_lot_is_domain_error() {
        let model = reference_model();

        let err = model.cost(&DecisionVector::new(0.0, 2.0)).expect_err("zero lot");

        assert_eq!(err, PolicyError::NonPositiveLot { value: 0.0 });
        assert!(err.is_domain());
    }

    #[test]
    // Purpose
    // -------
    // A negative radicand is reported instead of producing NaN.
    //
    // Given
    // -----
    // - `lead_time = -1000` so the spread is `-491`.
    fn negative_spread_is_domain_error() {
        let params = PolicyParams { lead_time: -1000.0, ..PolicyParams::default() };

        let err = cost(&DecisionVector::new(100.0, 2.0), &params).expect_err("negative spread");

        assert_eq!(err, PolicyError::NegativeSpread { value: -491.0 });
    }

    #[test]
    // Purpose
    // -------
    // Every term is finite and non-negative on valid inputs, and the total
    // is non-decreasing in the shortage factor.
    fn terms_non_negative_and_monotone_in_shortage_factor() {
        let decision = DecisionVector::new(150.0, 1.2);
        let mut previous = f64::NEG_INFINITY;
        for factor in [0.0, 10.0, 500.0, 5000.0] {
            let params = PolicyParams { shortage_cost_factor: factor, ..PolicyParams::default() };
            let model = CostModel::new(params);
            let parts = model.breakdown(&decision).expect("valid decision");
            for term in [parts.holding, parts.ordering, parts.safety_stock, parts.shortage] {
                assert!(term.is_finite() && term >= 0.0);
            }
            let total = model.cost(&decision).expect("valid decision");
            assert!(total >= previous);
            previous = total;
        }
    }

    #[test]
    // Purpose
    // -------
    // Raising `z` buys safety stock and sells shortage risk.
    //
    // Expect
    // ------
    // - Forward differences of the safety term are positive and of the
    //   shortage term negative near `max_service_factor`.
    fn service_factor_trades_safety_stock_for_shortage() {
        let model = reference_model();
        let h = 1e-4;
        let below = model.breakdown(&DecisionVector::new(120.0, 3.0 - 2.0 * h)).expect("valid");
        let near = model.breakdown(&DecisionVector::new(120.0, 3.0 - h)).expect("valid");

        assert!(near.safety_stock - below.safety_stock > 0.0);
        assert!(near.shortage - below.shortage < 0.0);
    }

    #[test]
    // Purpose
    // -------
    // Analytic gradient and Hessian agree with central differences.
    //
    // Given
    // -----
    // - Several decisions spread over the reference box.
    //
    // Expect
    // ------
    // - Gradient within `1e-4`, Hessian within `1e-3` of `finitediff`.
    fn analytic_derivatives_match_finite_differences() {
        let model = reference_model();
        let f = |x: &ndarray::Array1<f64>| {
            model.cost(&DecisionVector::new(x[0], x[1])).unwrap_or(f64::NAN)
        };
        let g = |x: &ndarray::Array1<f64>| {
            let [a, b] = model.gradient(&DecisionVector::new(x[0], x[1])).expect("valid");
            array![a, b]
        };
        for (q, z) in [(100.0, 1.0), (140.0, 1.95), (230.0, 2.8)] {
            let x = array![q, z];
            let grad = model.gradient(&DecisionVector::new(q, z)).expect("valid");
            let hess = model.hessian(&DecisionVector::new(q, z)).expect("valid");

            let fd_grad = x.central_diff(&f);
            let fd_hess = x.central_hessian(&g);

            assert_abs_diff_eq!(grad[0], fd_grad[0], epsilon = 1e-4);
            assert_abs_diff_eq!(grad[1], fd_grad[1], epsilon = 1e-4);
            for i in 0..2 {
                for j in 0..2 {
                    assert_abs_diff_eq!(hess[i][j], fd_hess[[i, j]], epsilon = 1e-3);
                }
            }
        }
    }
}
