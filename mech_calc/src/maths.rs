//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::Vector2;
use num_traits::Float;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Clamp a value into the range `[min, max]`.
pub fn clamp<T>(value: &T, min: &T, max: &T) -> T
where
    T: Float,
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

/// Arccosine with the argument clamped into `[-1, 1]`.
///
/// Dot products of unit vectors can land minutely outside the valid domain
/// through floating point rounding, which would turn the plain `acos` into a
/// NaN. Clamping first keeps borderline inputs out of the error path.
pub fn acos_clamped<T>(value: T) -> T
where
    T: Float,
{
    clamp(&value, &T::from(-1.0).unwrap(), &T::from(1.0).unwrap()).acos()
}

/// Wrap an angle in radians into `[-pi, pi]`.
pub fn wrap_pi<T>(angle_rad: T) -> T
where
    T: Float,
{
    let pi_t = T::from(std::f64::consts::PI).unwrap();
    let tau_t = T::from(std::f64::consts::TAU).unwrap();

    let mut a = (angle_rad + pi_t) % tau_t;
    if a < T::from(0.0).unwrap() {
        a = a + tau_t;
    }

    a - pi_t
}

/// Rotate a 2D vector by 90 degrees anticlockwise.
pub fn perp(v: &Vector2<f64>) -> Vector2<f64> {
    Vector2::new(-v[1], v[0])
}

/// Unsigned angle in radians between two 2D vectors.
///
/// Returns `None` if either vector has a near-zero length, in which case the
/// angle is undefined.
pub fn angle_between(a: &Vector2<f64>, b: &Vector2<f64>) -> Option<f64> {
    let norm_prod = a.norm() * b.norm();

    if norm_prod < 1e-12 {
        return None;
    }

    Some(acos_clamped(a.dot(b) / norm_prod))
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    const PI: f64 = std::f64::consts::PI;

    #[test]
    fn test_acos_clamped() {
        // Values just outside the domain must not produce NaN
        assert_eq!(acos_clamped(1.0 + 1e-15), 0.0);
        assert_eq!(acos_clamped(-1.0 - 1e-15), PI);
        assert!((acos_clamped(0.0) - PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_wrap_pi() {
        assert!((wrap_pi(3.0 * PI) - PI).abs() < 1e-9 || (wrap_pi(3.0 * PI) + PI).abs() < 1e-9);
        assert!((wrap_pi(-1.5 * PI) - 0.5 * PI).abs() < 1e-9);
        assert!((wrap_pi(0.25) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_angle_between() {
        let x = Vector2::new(1.0, 0.0);
        let y = Vector2::new(0.0, 2.0);

        assert!((angle_between(&x, &y).unwrap() - PI / 2.0).abs() < 1e-12);
        assert!((angle_between(&x, &-x).unwrap() - PI).abs() < 1e-12);
        assert!(angle_between(&x, &Vector2::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn test_perp() {
        let v = perp(&Vector2::new(1.0, 0.0));
        assert_eq!(v, Vector2::new(0.0, 1.0));
    }
}
