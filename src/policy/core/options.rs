//! Run-level options for the policy optimizer.
//!
//! [`PolicyOptions`] bundles the grid resolution, the lot-multiple policy,
//! the interior margin used to seed the barrier method, and the generic
//! [`SolverOptions`]. [`PolicyOptions::new`] validates the policy-specific
//! fields; solver options are validated by their own constructors.
use crate::{
    optimization::barrier_optimizer::traits::SolverOptions,
    policy::{
        core::surface::DEFAULT_GRID_RESOLUTION,
        errors::{PolicyError, PolicyResult},
    },
};
use std::str::FromStr;

/// Default relative margin between the seed and the box boundary.
pub const DEFAULT_INTERIOR_MARGIN: f64 = 1e-3;

/// Whether the lot must be a multiple of `lot_multiple`.
///
/// Parsing accepts case-insensitive `"ignore"` and `"enforce"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LotMultiplePolicy {
    #[default]
    Ignore,
    Enforce,
}

impl FromStr for LotMultiplePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ignore" => Ok(LotMultiplePolicy::Ignore),
            "enforce" => Ok(LotMultiplePolicy::Enforce),
            _ => Err(format!(
                "Invalid lot multiple policy '{s}'. Valid options are 'ignore' or 'enforce'."
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolicyOptions {
    /// Points per axis of the cost surface.
    pub grid_resolution: usize,
    pub lot_multiple: LotMultiplePolicy,
    /// Fraction of each box width kept between the seed and the boundary.
    pub interior_margin: f64,
    pub solver: SolverOptions,
}

impl Default for PolicyOptions {
    fn default() -> Self {
        Self {
            grid_resolution: DEFAULT_GRID_RESOLUTION,
            lot_multiple: LotMultiplePolicy::Ignore,
            interior_margin: DEFAULT_INTERIOR_MARGIN,
            solver: SolverOptions::default(),
        }
    }
}

impl PolicyOptions {
    /// Construct validated options.
    ///
    /// # Errors
    /// See [`PolicyOptions::validate`].
    pub fn new(
        grid_resolution: usize, lot_multiple: LotMultiplePolicy, interior_margin: f64,
        solver: SolverOptions,
    ) -> PolicyResult<Self> {
        let options = Self { grid_resolution, lot_multiple, interior_margin, solver };
        options.validate()?;
        Ok(options)
    }

    /// # Errors
    /// - [`PolicyError::InvalidGridResolution`] if `grid_resolution < 2`.
    /// - [`PolicyError::InvalidInteriorMargin`] unless
    ///   `0 < interior_margin < 0.5`.
    pub fn validate(&self) -> PolicyResult<()> {
        if self.grid_resolution < 2 {
            return Err(PolicyError::InvalidGridResolution { resolution: self.grid_resolution });
        }
        let m = self.interior_margin;
        if !m.is_finite() || m <= 0.0 || m >= 0.5 {
            return Err(PolicyError::InvalidInteriorMargin { value: m });
        }
        Ok(())
    }

    pub fn enforces_lot_multiple(&self) -> bool {
        self.lot_multiple == LotMultiplePolicy::Enforce
    }
}
