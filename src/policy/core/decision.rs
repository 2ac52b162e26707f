//! The two-dimensional decision searched by the optimizer.
use crate::{
    optimization::barrier_optimizer::types::Theta,
    policy::errors::{PolicyError, PolicyResult},
};
use ndarray::array;

/// Order lot quantity and safety-stock service factor.
///
/// Converts to and from the solver's [`Theta`] with layout
/// `[lot_quantity, service_factor]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionVector {
    pub lot_quantity: f64,
    pub service_factor: f64,
}

impl DecisionVector {
    /// Reference starting point `(140, 1.95)`.
    pub const DEFAULT_SEED: DecisionVector =
        DecisionVector { lot_quantity: 140.0, service_factor: 1.95 };

    pub const fn new(lot_quantity: f64, service_factor: f64) -> Self {
        Self { lot_quantity, service_factor }
    }

    /// Coordinate by index: `0` is the lot, anything else the service factor.
    pub fn coordinate(&self, index: usize) -> f64 {
        if index == 0 { self.lot_quantity } else { self.service_factor }
    }

    /// Copy with coordinate `index` replaced.
    pub fn with_coordinate(mut self, index: usize, value: f64) -> Self {
        if index == 0 {
            self.lot_quantity = value;
        } else {
            self.service_factor = value;
        }
        self
    }

    /// Reject NaN/±inf coordinates.
    ///
    /// # Errors
    /// [`PolicyError::NonFiniteDecision`] naming the offending field.
    pub fn validate(&self) -> PolicyResult<()> {
        if !self.lot_quantity.is_finite() {
            return Err(PolicyError::NonFiniteDecision {
                field: "lot_quantity",
                value: self.lot_quantity,
            });
        }
        if !self.service_factor.is_finite() {
            return Err(PolicyError::NonFiniteDecision {
                field: "service_factor",
                value: self.service_factor,
            });
        }
        Ok(())
    }

    pub fn to_theta(&self) -> Theta {
        array![self.lot_quantity, self.service_factor]
    }

    /// Build from a length-2 `Theta`; returns `None` for any other length.
    pub fn from_theta(theta: &Theta) -> Option<Self> {
        match theta.as_slice() {
            Some(&[lot_quantity, service_factor]) => Some(Self { lot_quantity, service_factor }),
            _ => None,
        }
    }
}

impl Default for DecisionVector {
    fn default() -> Self {
        Self::DEFAULT_SEED
    }
}

impl From<(f64, f64)> for DecisionVector {
    fn from((lot_quantity, service_factor): (f64, f64)) -> Self {
        Self { lot_quantity, service_factor }
    }
}
