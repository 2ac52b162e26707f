//! barrier_optimizer::builders — trust-region solver construction helpers.
//!
//! Purpose
//! -------
//! Provide small, focused builders for the trust-region solvers used in each
//! barrier stage. These helpers hide Argmin's generic wiring and apply the
//! crate-level [`TrustRegionConfig`] so the stage loop can request a
//! configured solver without touching Argmin-specific types.
//!
//! Key behaviors
//! -------------
//! - Construct a trust region with either the Steihaug truncated-CG or the
//!   Cauchy point subproblem.
//! - Apply radius, maximum radius, and acceptance threshold through a shared
//!   configuration helper.
//! - Leave the initial parameter vector and iteration caps to the runner.
//!
//! Conventions
//! -----------
//! - Builders are side-effect free and cheap; a fresh solver is built for
//!   every barrier stage.
//! - Argmin configuration errors surface as [`OptError`](crate::optimization::errors::OptError)
//!   via the crate's `From<argmin::core::Error>` conversion.
use argmin::solver::trustregion::{CauchyPoint, TrustRegion};

use crate::optimization::{
    errors::OptResult,
    barrier_optimizer::{
        traits::TrustRegionConfig,
        types::{Cost, SteihaugCG, TrustRegionCauchy, TrustRegionSteihaug},
    },
};

/// Construct a trust region with the Steihaug subproblem.
///
/// The Steihaug CG iteration cap comes from
/// `config.subproblem_max_iter`.
///
/// # Errors
/// Returns an error if Argmin rejects any radius or threshold setting.
pub fn build_trust_region_steihaug(config: &TrustRegionConfig) -> OptResult<TrustRegionSteihaug> {
    let steihaug = SteihaugCG::new().with_max_iters(config.subproblem_max_iter);
    configure_trust_region(TrustRegion::new(steihaug), config)
}

/// Construct a trust region with the Cauchy point subproblem.
///
/// # Errors
/// Returns an error if Argmin rejects any radius or threshold setting.
pub fn build_trust_region_cauchy(config: &TrustRegionConfig) -> OptResult<TrustRegionCauchy> {
    configure_trust_region(TrustRegion::new(CauchyPoint::new()), config)
}

/// Apply radius settings and the acceptance threshold to a trust region,
/// regardless of its subproblem type.
///
/// # Errors
/// Propagates Argmin's validation of `radius`, `max_radius` and `eta`.
pub fn configure_trust_region<R>(
    solver: TrustRegion<R, Cost>, config: &TrustRegionConfig,
) -> OptResult<TrustRegion<R, Cost>> {
    let solver = solver
        .with_radius(config.radius)?
        .with_max_radius(config.max_radius)?
        .with_eta(config.eta)?;
    Ok(solver)
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Construction of both trust-region variants from default settings.
    // - Acceptance of non-default but valid radius settings.
    //
    // They intentionally DO NOT cover:
    // - Executor behavior, which is tested through `minimize`.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Default settings produce a Steihaug trust region.
    //
    // Expect
    // ------
    // - `build_trust_region_steihaug` returns `Ok(_)`.
    fn build_trust_region_steihaug_accepts_defaults() {
        // Arrange
        let config = TrustRegionConfig::default();

        // Act
        let solver = build_trust_region_steihaug(&config);

        // Assert
        assert!(solver.is_ok(), "Default trust-region settings should be accepted");
    }

    #[test]
    // Purpose
    // -------
    // Default settings produce a Cauchy point trust region.
    //
    // Expect
    // ------
    // - `build_trust_region_cauchy` returns `Ok(_)`.
    fn build_trust_region_cauchy_accepts_defaults() {
        let config = TrustRegionConfig::default();

        let solver = build_trust_region_cauchy(&config);

        assert!(solver.is_ok(), "Default trust-region settings should be accepted");
    }

    #[test]
    // Purpose
    // -------
    // Custom radii pass through `configure_trust_region`.
    //
    // Given
    // -----
    // - `radius = 5`, `max_radius = 50`, `eta = 0.1`, `subproblem_max_iter = 3`.
    //
    // Expect
    // ------
    // - Both builders return `Ok(_)`.
    fn configure_trust_region_applies_custom_radii() {
        let config = TrustRegionConfig::new(5.0, 50.0, 0.1, 3).expect("valid config");

        assert!(build_trust_region_steihaug(&config).is_ok());
        assert!(build_trust_region_cauchy(&config).is_ok());
    }
}
