//! # Cartesian/Frenet conversion module
//!
//! Converts between the global Cartesian frame (position, heading, curvature,
//! speed and acceleration) and the Frenet frame of a reference path (arc
//! length `s` and signed lateral offset `d`, each with their first and second
//! derivatives).
//!
//! All functions in this module are pure: they hold no state, perform no
//! allocation and may be called concurrently from any number of threads.
//!
//! Lateral derivatives in a [`DCondition`] are taken with respect to the arc
//! length `s`, not time. The lateral offset is positive to the left of the
//! reference direction of travel.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod cartesian_frenet;
mod geometry;

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use cartesian_frenet::{cartesian_to_frenet, frenet_to_cartesian};
pub use geometry::{
    calculate_cartesian_point, calculate_kappa, calculate_lateral_derivative,
    calculate_second_order_lateral_derivative, calculate_theta,
};

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Maximum allowed difference between the reference point's arc length and
/// the longitudinal condition's arc length when converting to Cartesian.
pub const ARC_LENGTH_TOLERANCE_M: f64 = 1.0e-6;

/// Tolerance under which the curvature denominator base is considered zero.
pub const KAPPA_DENOMINATOR_EPSILON: f64 = 1.0e-8;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Longitudinal Frenet condition `[s, s', s'']`.
pub type SCondition = [f64; 3];

/// Lateral Frenet condition `[d, d', d'']`, derivatives with respect to `s`.
pub type DCondition = [f64; 3];

/// A point on the reference path.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RefPoint {
    /// Arc length along the path
    pub s_m: f64,

    /// Position X
    pub x_m: f64,

    /// Position Y
    pub y_m: f64,

    /// Heading (angle to the +ve x axis)
    pub theta_rad: f64,

    /// Curvature
    pub kappa_m: f64,

    /// Derivative of the curvature with respect to arc length
    pub dkappa_m2: f64,
}

/// A vehicle state in the Cartesian frame.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CartesianState {
    pub x_m: f64,

    pub y_m: f64,

    /// Heading (angle to the +ve x axis)
    pub theta_rad: f64,

    /// Curvature of the vehicle's trajectory
    pub kappa_m: f64,

    /// Signed speed along the heading
    pub v_ms: f64,

    /// Signed acceleration along the heading
    pub a_mss: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors which can occur during a conversion.
///
/// These indicate a bug in the caller rather than a transient condition and
/// must not be retried.
#[derive(Debug, Copy, Clone, PartialEq, thiserror::Error)]
pub enum FrameConvError {
    #[error(
        "The reference point s ({ref_s_m}) and s_condition[0] ({cond_s_m}) don't match"
    )]
    ArcLengthMismatch { ref_s_m: f64, cond_s_m: f64 },
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl RefPoint {
    pub fn new(
        s_m: f64,
        x_m: f64,
        y_m: f64,
        theta_rad: f64,
        kappa_m: f64,
        dkappa_m2: f64,
    ) -> Self {
        Self {
            s_m,
            x_m,
            y_m,
            theta_rad,
            kappa_m,
            dkappa_m2,
        }
    }

    /// Position of the point as a vector.
    pub fn position_m(&self) -> nalgebra::Vector2<f64> {
        nalgebra::Vector2::new(self.x_m, self.y_m)
    }
}

impl CartesianState {
    pub fn new(x_m: f64, y_m: f64, theta_rad: f64, kappa_m: f64, v_ms: f64, a_mss: f64) -> Self {
        Self {
            x_m,
            y_m,
            theta_rad,
            kappa_m,
            v_ms,
            a_mss,
        }
    }
}
