//! Cartesian to Frenet and Frenet to Cartesian transforms

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{error, trace};

// Internal
use super::*;
use util::maths::normalize_angle;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Convert a Cartesian state into the Frenet frame of the reference point.
///
/// The reference point must already be the projection of the state onto the
/// reference path, the arc length of the result is taken directly from it.
///
/// No check is made on the singular configurations (heading deviation
/// approaching +/- pi/2, or the lateral offset approaching the radius of
/// curvature of the reference). Those produce large or infinite results and
/// it is the caller's responsibility to avoid them.
pub fn cartesian_to_frenet(
    ref_point: &RefPoint,
    state: &CartesianState,
) -> (SCondition, DCondition) {
    let rtheta = ref_point.theta_rad;
    let rkappa = ref_point.kappa_m;

    let dx = state.x_m - ref_point.x_m;
    let dy = state.y_m - ref_point.y_m;

    let cos_theta_r = rtheta.cos();
    let sin_theta_r = rtheta.sin();

    // The sign of the offset is the side of the reference direction the point
    // is on, left is positive.
    let cross_rd_nd = cos_theta_r * dy - sin_theta_r * dx;
    let d0 = dx.hypot(dy).copysign(cross_rd_nd);

    let delta_theta = state.theta_rad - rtheta;
    let tan_delta_theta = delta_theta.tan();
    let cos_delta_theta = delta_theta.cos();

    let one_minus_kappa_r_d = 1.0 - rkappa * d0;
    let d1 = one_minus_kappa_r_d * tan_delta_theta;

    let kappa_r_d_prime = ref_point.dkappa_m2 * d0 + rkappa * d1;

    let d2 = -kappa_r_d_prime * tan_delta_theta
        + one_minus_kappa_r_d / cos_delta_theta / cos_delta_theta
            * (state.kappa_m * one_minus_kappa_r_d / cos_delta_theta - rkappa);

    let s0 = ref_point.s_m;
    let s1 = state.v_ms * cos_delta_theta / one_minus_kappa_r_d;

    let delta_theta_prime = one_minus_kappa_r_d / cos_delta_theta * state.kappa_m - rkappa;
    let s2 = (state.a_mss * cos_delta_theta
        - s1 * s1 * (d1 * delta_theta_prime - kappa_r_d_prime))
        / one_minus_kappa_r_d;

    trace!(
        "Cartesian -> Frenet at s = {}: s_cond = [{}, {}, {}], d_cond = [{}, {}, {}]",
        s0,
        s0,
        s1,
        s2,
        d0,
        d1,
        d2
    );

    ([s0, s1, s2], [d0, d1, d2])
}

/// Convert a Frenet state into the Cartesian frame.
///
/// The arc length of the reference point must match `s_condition[0]` to
/// within [`ARC_LENGTH_TOLERANCE_M`], otherwise
/// [`FrameConvError::ArcLengthMismatch`] is returned. This indicates the
/// caller has supplied the wrong reference point and is not recoverable.
///
/// The returned heading is normalised into (-pi, pi] and the speed is never
/// negative.
pub fn frenet_to_cartesian(
    ref_point: &RefPoint,
    s_condition: &SCondition,
    d_condition: &DCondition,
) -> Result<CartesianState, FrameConvError> {
    if !((ref_point.s_m - s_condition[0]).abs() < ARC_LENGTH_TOLERANCE_M) {
        error!(
            "The reference point s ({}) and s_condition[0] ({}) don't match",
            ref_point.s_m, s_condition[0]
        );
        return Err(FrameConvError::ArcLengthMismatch {
            ref_s_m: ref_point.s_m,
            cond_s_m: s_condition[0],
        });
    }

    let rtheta = ref_point.theta_rad;
    let rkappa = ref_point.kappa_m;

    let position_m = calculate_cartesian_point(rtheta, &ref_point.position_m(), d_condition[0]);

    let one_minus_kappa_r_d = 1.0 - rkappa * d_condition[0];

    let tan_delta_theta = d_condition[1] / one_minus_kappa_r_d;
    let delta_theta = d_condition[1].atan2(one_minus_kappa_r_d);
    let cos_delta_theta = delta_theta.cos();

    let theta_rad = normalize_angle(delta_theta + rtheta);

    let kappa_r_d_prime = ref_point.dkappa_m2 * d_condition[0] + rkappa * d_condition[1];

    // Multiply by cos^2 before dividing by one_minus_kappa_r_d
    let kappa_m = (((d_condition[2] + kappa_r_d_prime * tan_delta_theta)
        * cos_delta_theta
        * cos_delta_theta)
        / one_minus_kappa_r_d
        + rkappa)
        * cos_delta_theta
        / one_minus_kappa_r_d;

    let d_dot = d_condition[1] * s_condition[1];
    let v_ms = (one_minus_kappa_r_d * one_minus_kappa_r_d * s_condition[1] * s_condition[1]
        + d_dot * d_dot)
        .sqrt();

    let delta_theta_prime = one_minus_kappa_r_d / cos_delta_theta * kappa_m - rkappa;

    let a_mss = s_condition[2] * one_minus_kappa_r_d / cos_delta_theta
        + s_condition[1] * s_condition[1] / cos_delta_theta
            * (d_condition[1] * delta_theta_prime - kappa_r_d_prime);

    Ok(CartesianState {
        x_m: position_m[0],
        y_m: position_m[1],
        theta_rad,
        kappa_m,
        v_ms,
        a_mss,
    })
}
