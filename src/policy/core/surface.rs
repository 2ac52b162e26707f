//! Cost evaluated on a regular grid for visualization.
//!
//! The grid spans `[0.1, max_service_factor] × [min_lot, max_lot]` with the
//! same resolution on both axes. Rows follow the lot axis and columns the
//! service axis. Cells are computed with [`CostModel::cost`], the function
//! the optimizer minimizes, so a cell and a solver evaluation at the same
//! point are bit-identical. The grid is diagnostic only and never steers the
//! search.
use crate::policy::{
    core::{cost::CostModel, decision::DecisionVector},
    errors::{PolicyError, PolicyResult},
};
use ndarray::{Array1, Array2};

/// Lower end of the service axis.
pub const SURFACE_MIN_SERVICE: f64 = 0.1;

/// Default number of points per axis.
pub const DEFAULT_GRID_RESOLUTION: usize = 50;

#[derive(Debug, Clone, PartialEq)]
pub struct CostSurface {
    pub service_axis: Array1<f64>,
    pub lot_axis: Array1<f64>,
    /// `costs[[i, j]] = cost(lot_axis[i], service_axis[j])`.
    pub costs: Array2<f64>,
}

impl CostSurface {
    /// Evaluate `model` on a `resolution × resolution` grid.
    ///
    /// # Errors
    /// - [`PolicyError::InvalidGridResolution`] if `resolution < 2`.
    /// - Propagates cost-model errors (e.g. `min_lot ≤ 0`).
    pub fn evaluate(model: &CostModel, resolution: usize) -> PolicyResult<Self> {
        if resolution < 2 {
            return Err(PolicyError::InvalidGridResolution { resolution });
        }
        let params = model.params();
        let service_axis =
            Array1::linspace(SURFACE_MIN_SERVICE, params.max_service_factor, resolution);
        let lot_axis = Array1::linspace(params.min_lot, params.max_lot, resolution);

        let mut costs = Array2::<f64>::zeros((resolution, resolution));
        for (i, &lot) in lot_axis.iter().enumerate() {
            for (j, &service) in service_axis.iter().enumerate() {
                costs[[i, j]] = model.cost(&DecisionVector::new(lot, service))?;
            }
        }
        Ok(Self { service_axis, lot_axis, costs })
    }

    pub fn resolution(&self) -> usize {
        self.lot_axis.len()
    }

    /// Cost at row `i` (lot) and column `j` (service), if in range.
    pub fn cost_at(&self, i: usize, j: usize) -> Option<f64> {
        self.costs.get([i, j]).copied()
    }

    /// Cheapest cell as `(i, j, cost)`.
    pub fn min_cell(&self) -> Option<(usize, usize, f64)> {
        self.costs.indexed_iter().fold(None, |best, ((i, j), &c)| match best {
            Some((_, _, b)) if b <= c => best,
            _ => Some((i, j, c)),
        })
    }

    /// Decision at grid cell `(i, j)`, if in range.
    pub fn decision_at(&self, i: usize, j: usize) -> Option<DecisionVector> {
        Some(DecisionVector::new(*self.lot_axis.get(i)?, *self.service_axis.get(j)?))
    }
}
