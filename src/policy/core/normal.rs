//! Standard normal CDF and PDF used by the shortage term.
use statrs::{consts::SQRT_2PI, function::erf::erfc};
use std::f64::consts::SQRT_2;

/// Φ(z) = erfc(−z/√2) / 2.
///
/// The complementary error function keeps full relative precision in the
/// lower tail.
pub fn standard_normal_cdf(z: f64) -> f64 {
    0.5 * erfc(-z / SQRT_2)
}

/// 1 − Φ(z) = erfc(z/√2) / 2, accurate in the upper tail.
pub fn standard_normal_sf(z: f64) -> f64 {
    0.5 * erfc(z / SQRT_2)
}

/// φ(z) = exp(−z²/2) / √(2π).
pub fn standard_normal_pdf(z: f64) -> f64 {
    (-0.5 * z * z).exp() / SQRT_2PI
}
