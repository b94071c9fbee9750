//! Geometry helpers relating headings, curvatures and lateral derivatives
//! along the reference path.
//!
//! In all functions `l` is the lateral offset from the reference path, `dl`
//! and `ddl` its first and second derivatives with respect to arc length.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use std::cmp::Ordering;

// Internal
use super::KAPPA_DENOMINATOR_EPSILON;
use util::maths::{compare, normalize_angle};

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Heading of a point offset from the reference path, normalised into
/// (-pi, pi].
pub fn calculate_theta(rtheta: f64, rkappa: f64, l: f64, dl: f64) -> f64 {
    normalize_angle(rtheta + dl.atan2(1.0 - l * rkappa))
}

/// Curvature of a curve offset from the reference path.
///
/// If `dl^2 + (1 - l*rkappa)^2` is within [`KAPPA_DENOMINATOR_EPSILON`] of
/// zero the curvature is undefined and `0.0` is returned. NaN inputs give a
/// NaN curvature.
pub fn calculate_kappa(rkappa: f64, rdkappa: f64, l: f64, dl: f64, ddl: f64) -> f64 {
    let one_minus_kappa_r_l = 1.0 - l * rkappa;
    let base = dl * dl + one_minus_kappa_r_l * one_minus_kappa_r_l;

    if base.is_nan() {
        return std::f64::NAN;
    }

    if compare(base, 0.0, KAPPA_DENOMINATOR_EPSILON) == Ordering::Equal {
        return 0.0;
    }

    let denominator = base.powf(1.5);
    let numerator = rkappa + ddl
        - 2.0 * l * rkappa * rkappa
        - l * ddl * rkappa
        + l * l * rkappa * rkappa * rkappa
        + l * dl * rdkappa
        + 2.0 * dl * dl * rkappa;

    numerator / denominator
}

/// Offset a reference point perpendicular to the reference heading by `l`.
pub fn calculate_cartesian_point(rtheta: f64, rpoint: &Vector2<f64>, l: f64) -> Vector2<f64> {
    Vector2::new(rpoint[0] - l * rtheta.sin(), rpoint[1] + l * rtheta.cos())
}

/// First derivative of the lateral offset for a given heading.
pub fn calculate_lateral_derivative(rtheta: f64, theta: f64, l: f64, rkappa: f64) -> f64 {
    (1.0 - rkappa * l) * (theta - rtheta).tan()
}

/// Second derivative of the lateral offset for a given heading and
/// curvature.
///
/// Near singular inputs (heading difference approaching +/- pi/2) are not
/// guarded against.
pub fn calculate_second_order_lateral_derivative(
    rtheta: f64,
    theta: f64,
    rkappa: f64,
    kappa: f64,
    rdkappa: f64,
    l: f64,
) -> f64 {
    let dl = calculate_lateral_derivative(rtheta, theta, l, rkappa);
    let theta_diff = theta - rtheta;
    let cos_theta_diff = theta_diff.cos();

    -(rdkappa * l + rkappa * dl) * theta_diff.tan()
        + (1.0 - rkappa * l) / (cos_theta_diff * cos_theta_diff)
            * (kappa * (1.0 - rkappa * l) / cos_theta_diff - rkappa)
}
