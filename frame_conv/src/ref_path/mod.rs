//! # Reference path module
//!
//! Reference paths supply the reference points which Cartesian/Frenet
//! conversions are anchored on. Any source of reference points can be used
//! through the [`RefPathProvider`] trait, [`DiscreteRefPath`] is the provider
//! built from a sequence of points.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod profile;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;
use nalgebra::Vector2;
use serde::Serialize;
use std::cmp::Ordering;

// Internal
use crate::{conv::RefPoint, path_search::Pose2};
use util::maths::{clamp, lin_map, normalize_angle};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Upper bound on the bisection steps used to find a point on the normal.
const MAX_NORMAL_SEARCH_ITERS: usize = 128;

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// Provides reference points along a reference path.
///
/// Implementors must return internally consistent points, i.e. the heading,
/// curvature and curvature derivative must be the actual derivatives of the
/// path at the queried arc length. This is not checked by the conversions.
pub trait RefPathProvider {
    /// Get the reference point at the given arc length.
    fn ref_point_at(&self, s_m: f64) -> Result<RefPoint, RefPathError>;
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A reference path made from a sequence of points, interpolated linearly
/// between them.
#[derive(Debug, Clone, Serialize)]
pub struct DiscreteRefPath {
    points: Vec<RefPoint>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RefPathError {
    #[error("At least two distinct waypoints are required to build a path, found {0}")]
    NotEnoughPoints(usize),

    #[error("Waypoint {0} is not finite")]
    NonFiniteWaypoint(usize),

    #[error("Path point {0} has a degenerate finite difference, does the path double back on itself?")]
    DegenerateDifference(usize),

    #[error("Attempted to create a reference path from an empty sequence")]
    EmptySequence,

    #[error("The arc length of point {0} is less than the previous point's")]
    NonMonotonicArcLength(usize),

    #[error("Arc length {s_m} is outside of the path ({start_m} to {end_m})")]
    OutOfRange { s_m: f64, start_m: f64, end_m: f64 },
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl DiscreteRefPath {
    /// Create a path from already computed reference points.
    ///
    /// The points must be in order of non-decreasing arc length.
    pub fn from_points(points: Vec<RefPoint>) -> Result<Self, RefPathError> {
        if points.is_empty() {
            return Err(RefPathError::EmptySequence);
        }

        for i in 1..points.len() {
            if !(points[i].s_m >= points[i - 1].s_m) {
                return Err(RefPathError::NonMonotonicArcLength(i));
            }
        }

        Ok(Self { points })
    }

    /// Create a path from waypoints, computing the heading, curvature and
    /// curvature derivative at each point.
    pub fn from_waypoints(waypoints_m: &[Vector2<f64>]) -> Result<Self, RefPathError> {
        let points = profile::compute_path_profile(waypoints_m)?;

        debug!(
            "Built reference path with {} points, {:.3} m long",
            points.len(),
            points.last().map(|p| p.s_m).unwrap_or(0.0)
        );

        Ok(Self { points })
    }

    /// Create a path from the positions of a sequence of poses, such as the
    /// output of a [`crate::path_search::PathSearch`].
    pub fn from_poses(poses: &[Pose2]) -> Result<Self, RefPathError> {
        let waypoints_m: Vec<Vector2<f64>> = poses.iter().map(|p| p.position_m()).collect();
        Self::from_waypoints(&waypoints_m)
    }

    /// The points making up the path.
    pub fn points(&self) -> &[RefPoint] {
        &self.points
    }

    /// Total length of the path.
    pub fn length(&self) -> f64 {
        // Points can never be empty
        self.points[self.points.len() - 1].s_m - self.points[0].s_m
    }

    /// Find the reference point which is the projection of the given position
    /// onto the path.
    ///
    /// The closest point of the path is found, then the segments either side
    /// of it are searched for the point whose normal passes through the
    /// position, keeping the closest. The position then lies exactly on the
    /// matched point's normal, so converting it to Frenet and back reproduces
    /// it.
    ///
    /// Positions beyond the ends of the path have no such point, they are
    /// projected onto the segments and clamped to them instead.
    pub fn match_to_path(&self, x_m: f64, y_m: f64) -> RefPoint {
        let position_m = Vector2::new(x_m, y_m);

        let mut index_min = 0;
        let mut dist_sq_min = std::f64::INFINITY;
        for (i, p) in self.points.iter().enumerate() {
            let dist_sq = (p.position_m() - position_m).norm_squared();
            if dist_sq < dist_sq_min {
                dist_sq_min = dist_sq;
                index_min = i;
            }
        }

        let index_start = index_min.saturating_sub(1);
        let index_end = (index_min + 1).min(self.points.len() - 1);

        let dist_sq_to = |p: &RefPoint| (p.position_m() - position_m).norm_squared();

        let on_normal = (index_start..index_end)
            .filter_map(|i| project_along_normal(&self.points[i], &self.points[i + 1], &position_m))
            .min_by(|a, b| dist_sq_to(a).partial_cmp(&dist_sq_to(b)).unwrap_or(Ordering::Equal));

        if let Some(p) = on_normal {
            return p;
        }

        let mut best = self.points[index_min];
        let mut best_dist_sq = dist_sq_min;

        for i in index_start..index_end {
            let projected = project_onto_segment(&self.points[i], &self.points[i + 1], &position_m);
            let dist_sq = (projected.position_m() - position_m).norm_squared();
            if dist_sq < best_dist_sq {
                best_dist_sq = dist_sq;
                best = projected;
            }
        }

        best
    }

    /// Index of the last point whose arc length is not greater than `s_m`,
    /// bounded so that it always has a following point where possible.
    fn segment_index(&self, s_m: f64) -> usize {
        let upper = self.points.partition_point(|p| p.s_m <= s_m);
        upper.saturating_sub(1).min(self.points.len().saturating_sub(2))
    }
}

impl RefPathProvider for DiscreteRefPath {
    fn ref_point_at(&self, s_m: f64) -> Result<RefPoint, RefPathError> {
        let start_m = self.points[0].s_m;
        let end_m = self.points[self.points.len() - 1].s_m;

        if !(s_m >= start_m && s_m <= end_m) {
            return Err(RefPathError::OutOfRange {
                s_m,
                start_m,
                end_m,
            });
        }

        if self.points.len() == 1 {
            return Ok(self.points[0]);
        }

        let i = self.segment_index(s_m);
        Ok(interpolate(&self.points[i], &self.points[i + 1], s_m))
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Find the point between two reference points whose normal passes through
/// the position, i.e. where the displacement to the position is orthogonal to
/// the interpolated heading.
///
/// Returns `None` if there is no such point within the segment.
fn project_along_normal(
    p0: &RefPoint,
    p1: &RefPoint,
    position_m: &Vector2<f64>,
) -> Option<RefPoint> {
    if !(p1.s_m - p0.s_m > std::f64::EPSILON) {
        return None;
    }

    // Distance of the position ahead of the point along its heading
    let ahead_m = |r: &RefPoint| {
        (position_m - r.position_m()).dot(&Vector2::new(r.theta_rad.cos(), r.theta_rad.sin()))
    };

    let mut s_lo_m = p0.s_m;
    let mut s_hi_m = p1.s_m;
    let ahead_lo_m = ahead_m(p0);
    let ahead_hi_m = ahead_m(p1);

    if ahead_lo_m == 0.0 {
        return Some(*p0);
    }
    if ahead_hi_m == 0.0 {
        return Some(*p1);
    }
    if ahead_lo_m.signum() == ahead_hi_m.signum() {
        return None;
    }

    // Bisect until the bracket can't be split any further
    for _ in 0..MAX_NORMAL_SEARCH_ITERS {
        let s_mid_m = 0.5 * (s_lo_m + s_hi_m);
        if s_mid_m <= s_lo_m || s_mid_m >= s_hi_m {
            break;
        }

        if ahead_m(&interpolate(p0, p1, s_mid_m)).signum() == ahead_lo_m.signum() {
            s_lo_m = s_mid_m;
        } else {
            s_hi_m = s_mid_m;
        }
    }

    Some(interpolate(p0, p1, 0.5 * (s_lo_m + s_hi_m)))
}

/// Project a position onto the segment between two points, clamping to the
/// ends of the segment.
fn project_onto_segment(p0: &RefPoint, p1: &RefPoint, position_m: &Vector2<f64>) -> RefPoint {
    let v0 = position_m - p0.position_m();
    let v1 = p1.position_m() - p0.position_m();
    let v1_norm = v1.norm();

    if v1_norm <= std::f64::EPSILON {
        return *p0;
    }

    // The segment's arc length can differ from its chord length for points
    // which weren't built from waypoints, so scale the projection onto it
    let t = clamp(&(v0.dot(&v1) / (v1_norm * v1_norm)), &0.0, &1.0);
    let s_m = p0.s_m + t * (p1.s_m - p0.s_m);

    interpolate(p0, p1, s_m)
}

/// Linearly interpolate between two reference points at the given arc length.
///
/// Heading is interpolated along the shortest angular distance.
fn interpolate(p0: &RefPoint, p1: &RefPoint, s_m: f64) -> RefPoint {
    if p1.s_m - p0.s_m <= std::f64::EPSILON {
        return *p0;
    }

    let s_range = (p0.s_m, p1.s_m);

    RefPoint {
        s_m,
        x_m: lin_map(s_range, (p0.x_m, p1.x_m), s_m),
        y_m: lin_map(s_range, (p0.y_m, p1.y_m), s_m),
        theta_rad: slerp(p0.theta_rad, p1.theta_rad, (s_m - p0.s_m) / (p1.s_m - p0.s_m)),
        kappa_m: lin_map(s_range, (p0.kappa_m, p1.kappa_m), s_m),
        dkappa_m2: lin_map(s_range, (p0.dkappa_m2, p1.dkappa_m2), s_m),
    }
}

/// Interpolate between two angles along the shortest angular distance.
fn slerp(a0: f64, a1: f64, t: f64) -> f64 {
    let a0 = normalize_angle(a0);
    let d = normalize_angle(normalize_angle(a1) - a0);
    normalize_angle(a0 + t * d)
}
