//! Path profile calculation
//!
//! Computes the arc length, heading, curvature and curvature derivative of a
//! sequence of waypoints using finite differences.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::Vector2;

use super::RefPathError;
use crate::conv::RefPoint;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Smallest norm of the position derivative for which a heading and curvature
/// can be computed. Smaller values occur where the path doubles back on itself.
const MIN_FIRST_DERIV_NORM: f64 = 1e-6;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Compute the reference points for the given waypoints.
///
/// Consecutive duplicate waypoints are removed first as they have no defined
/// heading. At least two distinct waypoints are required, and the path must
/// not double back on itself (a cusp), since the differences there vanish.
pub(crate) fn compute_path_profile(waypoints_m: &[Vector2<f64>]) -> Result<Vec<RefPoint>, RefPathError> {
    let mut points_m: Vec<Vector2<f64>> = Vec::with_capacity(waypoints_m.len());
    for (i, p) in waypoints_m.iter().enumerate() {
        if !(p[0].is_finite() && p[1].is_finite()) {
            return Err(RefPathError::NonFiniteWaypoint(i));
        }
        match points_m.last() {
            Some(last) if (p - last).norm() <= std::f64::EPSILON => continue,
            _ => points_m.push(*p),
        }
    }

    let n = points_m.len();
    if n < 2 {
        return Err(RefPathError::NotEnoughPoints(n));
    }

    // Cumulative arc length
    let mut s_m = Vec::with_capacity(n);
    s_m.push(0.0);
    for i in 1..n {
        s_m.push(s_m[i - 1] + (points_m[i] - points_m[i - 1]).norm());
    }

    // First and second derivatives of position with respect to arc length
    let first_derivs: Vec<Vector2<f64>> = (0..n)
        .map(|i| {
            let (lo, hi) = neighbours(n, i);
            let d1 = (points_m[hi] - points_m[lo]) / (s_m[hi] - s_m[lo]);
            if d1.norm() < MIN_FIRST_DERIV_NORM {
                Err(RefPathError::DegenerateDifference(i))
            } else {
                Ok(d1)
            }
        })
        .collect::<Result<_, _>>()?;
    let second_derivs: Vec<Vector2<f64>> = (0..n)
        .map(|i| {
            let (lo, hi) = neighbours(n, i);
            (first_derivs[hi] - first_derivs[lo]) / (s_m[hi] - s_m[lo])
        })
        .collect();

    let kappas_m: Vec<f64> = first_derivs
        .iter()
        .zip(second_derivs.iter())
        .map(|(d1, d2)| {
            let norm = d1.norm();
            (d1[0] * d2[1] - d1[1] * d2[0]) / (norm * norm * norm)
        })
        .collect();

    let dkappas_m2: Vec<f64> = (0..n)
        .map(|i| {
            let (lo, hi) = neighbours(n, i);
            (kappas_m[hi] - kappas_m[lo]) / (s_m[hi] - s_m[lo])
        })
        .collect();

    if let Some(i) = (0..n).find(|&i| !(kappas_m[i].is_finite() && dkappas_m2[i].is_finite())) {
        return Err(RefPathError::DegenerateDifference(i));
    }

    // Heading from the (central where possible) difference of the points
    let headings_rad: Vec<f64> = (0..n)
        .map(|i| {
            let delta = diff(&points_m, i);
            delta[1].atan2(delta[0])
        })
        .collect();

    Ok((0..n)
        .map(|i| RefPoint {
            s_m: s_m[i],
            x_m: points_m[i][0],
            y_m: points_m[i][1],
            theta_rad: headings_rad[i],
            kappa_m: kappas_m[i],
            dkappa_m2: dkappas_m2[i],
        })
        .collect())
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Indices of the points used for the difference at `i`: one sided at the
/// ends, central elsewhere.
fn neighbours(n: usize, i: usize) -> (usize, usize) {
    if i == 0 {
        (0, 1)
    } else if i == n - 1 {
        (n - 2, n - 1)
    } else {
        (i - 1, i + 1)
    }
}

fn diff(points_m: &[Vector2<f64>], i: usize) -> Vector2<f64> {
    let (lo, hi) = neighbours(points_m.len(), i);
    points_m[hi] - points_m[lo]
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;
    use util::maths::normalize_angle;

    #[test]
    fn test_profile_straight() {
        let waypoints_m: Vec<Vector2<f64>> = (0..5)
            .map(|i| Vector2::new(i as f64, 2.0 * i as f64))
            .collect();

        let points = compute_path_profile(&waypoints_m).unwrap();

        assert_eq!(points.len(), 5);
        for (i, p) in points.iter().enumerate() {
            assert_abs_diff_eq!(p.s_m, i as f64 * 5f64.sqrt(), epsilon = 1e-12);
            assert_abs_diff_eq!(p.theta_rad, 2f64.atan2(1.0), epsilon = 1e-12);
            assert_abs_diff_eq!(p.kappa_m, 0.0, epsilon = 1e-12);
            assert_abs_diff_eq!(p.dkappa_m2, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_profile_circle() {
        let radius_m = 10.0;
        let step_rad = 0.01;
        let n = 100;

        let waypoints_m: Vec<Vector2<f64>> = (0..n)
            .map(|i| {
                let phi = i as f64 * step_rad;
                Vector2::new(radius_m * phi.cos(), radius_m * phi.sin())
            })
            .collect();

        let points = compute_path_profile(&waypoints_m).unwrap();
        let chord_m = 2.0 * radius_m * (step_rad / 2.0).sin();

        for i in 2..(n - 2) {
            let phi = i as f64 * step_rad;
            assert_abs_diff_eq!(points[i].s_m, i as f64 * chord_m, epsilon = 1e-9);
            assert_abs_diff_eq!(
                points[i].theta_rad,
                normalize_angle(phi + std::f64::consts::FRAC_PI_2),
                epsilon = 1e-9
            );
            assert_abs_diff_eq!(points[i].kappa_m, 1.0 / radius_m, epsilon = 1e-6);
        }
        for i in 3..(n - 3) {
            assert_abs_diff_eq!(points[i].dkappa_m2, 0.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_profile_duplicates() {
        let waypoints_m = vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(0.0, 0.0),
            Vector2::new(1.0, 0.0),
            Vector2::new(1.0, 0.0),
            Vector2::new(2.0, 0.0),
        ];

        let points = compute_path_profile(&waypoints_m).unwrap();
        assert_eq!(points.len(), 3);
        assert_abs_diff_eq!(points[2].s_m, 2.0);
    }

    #[test]
    fn test_profile_not_enough_points() {
        assert!(matches!(
            compute_path_profile(&[]),
            Err(RefPathError::NotEnoughPoints(0))
        ));
        assert!(matches!(
            compute_path_profile(&[Vector2::new(1.0, 1.0), Vector2::new(1.0, 1.0)]),
            Err(RefPathError::NotEnoughPoints(1))
        ));
        assert!(matches!(
            compute_path_profile(&[Vector2::new(0.0, 0.0), Vector2::new(f64::NAN, 1.0)]),
            Err(RefPathError::NonFiniteWaypoint(1))
        ));
    }

    #[test]
    fn test_profile_cusp() {
        // Out to (2, 0) and straight back, the central difference at the turn
        // is zero
        let waypoints_m: Vec<Vector2<f64>> = [0.0, 1.0, 2.0, 1.0, 0.0]
            .iter()
            .map(|&x| Vector2::new(x, 0.0))
            .collect();

        assert_eq!(
            compute_path_profile(&waypoints_m).unwrap_err(),
            RefPathError::DegenerateDifference(2)
        );

        // A tight but not reversing turn is still accepted
        let waypoints_m = vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(1.0, 0.0),
            Vector2::new(2.0, 0.0),
            Vector2::new(1.0, 0.5),
            Vector2::new(0.0, 0.5),
        ];
        let points = compute_path_profile(&waypoints_m).unwrap();
        assert!(points
            .iter()
            .all(|p| p.theta_rad.is_finite() && p.kappa_m.is_finite() && p.dkappa_m2.is_finite()));
    }
}
