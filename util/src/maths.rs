//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;
use std::cmp::Ordering;

/// Map a value from one range into another.
pub fn lin_map<T>(source_range: (T, T), target_range: (T, T), value: T) -> T
where
    T: Float
{
    target_range.0
        + ((value - source_range.0)
        * (target_range.1 - target_range.0)
        / (source_range.1 - source_range.0))
}

pub fn clamp<T>(value: &T, min: &T, max: &T) -> T
where
    T: Float
{
    let mut ret = *value;

    if ret > *max {
        ret = *max
    }
    if ret < *min {
        ret = *min
    }

    ret
}

/// Compare two values, treating them as equal if they are strictly less than
/// `epsilon` apart.
///
/// Outside of the tolerance band the ordinary ordering of the values is
/// returned. A NaN input has no ordering and compares as `Equal`, callers
/// which must not treat NaN as equal have to check for it first.
pub fn compare<T>(a: T, b: T, epsilon: T) -> Ordering
where
    T: Float
{
    if (a - b).abs() < epsilon {
        Ordering::Equal
    }
    else if a < b {
        Ordering::Less
    }
    else if a > b {
        Ordering::Greater
    }
    else {
        Ordering::Equal
    }
}

/// Normalise an angle into the range (-pi, pi].
pub fn normalize_angle<T>(angle: T) -> T
where
    T: Float
{
    let pi_t: T = T::from(std::f64::consts::PI).unwrap();
    let tau_t: T = T::from(std::f64::consts::TAU).unwrap();

    let a = rem_euclid(angle + pi_t, tau_t) - pi_t;

    // rem_euclid gives [0, 2pi] so -pi is the only value to fold over
    if a <= -pi_t {
        a + tau_t
    }
    else {
        a
    }
}

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
///
/// This function is taken from the std library as num is missing it.
///
/// In particular, the return value `r` satisfies `0.0 <= r < rhs.abs()` in
/// most cases. However, due to a floating point round-off error it can
/// result in `r == rhs.abs()`, violating the mathematical definition, if
/// `self` is much smaller than `rhs.abs()` in magnitude and `self < 0.0`.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float
{
    let r = lhs % rhs;
    if r < T::zero() { r + rhs.abs() } else { r }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;

    const PI: f64 = std::f64::consts::PI;
    const TAU: f64 = std::f64::consts::TAU;

    #[test]
    fn test_normalize_angle() {
        assert_abs_diff_eq!(normalize_angle(0f64), 0f64, epsilon = 1e-12);
        assert_abs_diff_eq!(normalize_angle(1f64), 1f64, epsilon = 1e-12);
        assert_abs_diff_eq!(normalize_angle(-1f64), -1f64, epsilon = 1e-12);
        assert_abs_diff_eq!(normalize_angle(PI), PI);
        assert_abs_diff_eq!(normalize_angle(-PI), PI);
        assert_abs_diff_eq!(normalize_angle(1.5 * PI), -0.5 * PI, epsilon = 1e-12);
        assert_abs_diff_eq!(normalize_angle(-1.5 * PI), 0.5 * PI, epsilon = 1e-12);
        assert_abs_diff_eq!(normalize_angle(3.0 * TAU + 0.25), 0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(normalize_angle(-5.0 * TAU - 0.25), -0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_normalize_angle_range() {
        let mut angle = -50f64;
        while angle < 50f64 {
            let n = normalize_angle(angle);
            assert!(n > -PI && n <= PI, "{} normalised to {}", angle, n);
            angle += 0.037;
        }
    }

    #[test]
    fn test_compare() {
        assert_eq!(compare(1.0, 1.0, 1e-8), Ordering::Equal);
        assert_eq!(compare(1.0 + 1e-9, 1.0, 1e-8), Ordering::Equal);
        assert_eq!(compare(1.0 - 1e-9, 1.0, 1e-8), Ordering::Equal);
        assert_eq!(compare(1.0 + 1e-6, 1.0, 1e-8), Ordering::Greater);
        assert_eq!(compare(1.0 - 1e-6, 1.0, 1e-8), Ordering::Less);
        assert_eq!(compare(1e-9, 0.0, 1e-8), Ordering::Equal);

        // The band is open, values exactly epsilon apart are not equal
        assert_eq!(compare(1.5, 1.0, 0.5), Ordering::Greater);
        assert_eq!(compare(0.5, 1.0, 0.5), Ordering::Less);

        assert_eq!(compare(f64::NAN, 1.0, 1e-8), Ordering::Equal);
    }

    #[test]
    fn test_lin_map_and_clamp() {
        assert_abs_diff_eq!(lin_map((0f64, 1f64), (0f64, 10f64), 0.5), 5.0);
        assert_abs_diff_eq!(clamp(&2f64, &-1f64, &1f64), 1.0);
        assert_abs_diff_eq!(clamp(&-2f64, &-1f64, &1f64), -1.0);
        assert_abs_diff_eq!(clamp(&0.5f64, &-1f64, &1f64), 0.5);
    }
}
