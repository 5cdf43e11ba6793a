//! Vector and rotation helpers shared by the reconstruction stages.
//!
//! The local frame convention is `+Z` forward, `+Y` up and `+X` right, with `+Y`
//! as the global up direction of the working reference frame.

use crate::constants::EPSILON;
use nalgebra::{Unit, UnitQuaternion, Vector3};

/// Global up axis of the working reference frame
#[must_use]
pub fn global_up() -> Vector3<f32> {
    Vector3::y()
}

/// Normalize `v`, returning the zero vector when it is too short to have a direction
#[must_use]
pub fn normalize_or_zero(v: &Vector3<f32>) -> Vector3<f32> {
    v.try_normalize(EPSILON).unwrap_or_else(Vector3::zeros)
}

/// Whether `v` is shorter than [`EPSILON`]
#[must_use]
pub fn is_zero(v: &Vector3<f32>) -> bool {
    v.norm() < EPSILON
}

/// Linear interpolation with `t` clamped to `[0, 1]`
#[must_use]
pub fn lerp(a: &Vector3<f32>, b: &Vector3<f32>, t: f32) -> Vector3<f32> {
    a.lerp(b, t.clamp(0.0, 1.0))
}

/// Where `value` sits inside `[minimum, maximum]`, clamped to `[0, 1]`
#[must_use]
pub fn percentage(value: f32, minimum: f32, maximum: f32) -> f32 {
    let shifted = (value - minimum).max(0.0);
    (shifted / (maximum - minimum)).clamp(0.0, 1.0)
}

/// Unit normal of the plane through `a`, `b`, `c` (winding `a -> b -> c`)
#[must_use]
pub fn plane_normal(a: &Vector3<f32>, b: &Vector3<f32>, c: &Vector3<f32>) -> Vector3<f32> {
    normalize_or_zero(&(b - a).cross(&(c - a)))
}

/// `1.0` for non-negative values, `-1.0` otherwise
#[must_use]
pub fn sign(value: f32) -> f32 {
    if value >= 0.0 {
        1.0
    } else {
        -1.0
    }
}

/// Unsigned angle between two directions, in degrees
#[must_use]
pub fn angle_degrees(a: &Vector3<f32>, b: &Vector3<f32>) -> f32 {
    let denominator = a.norm() * b.norm();
    if denominator < EPSILON * EPSILON {
        return 0.0;
    }
    (a.dot(b) / denominator).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Rotation of `degrees` around `axis`; identity when the axis has no direction
#[must_use]
pub fn angle_axis(degrees: f32, axis: &Vector3<f32>) -> UnitQuaternion<f32> {
    match Unit::try_new(*axis, EPSILON) {
        Some(axis) => UnitQuaternion::from_axis_angle(&axis, degrees.to_radians()),
        None => UnitQuaternion::identity(),
    }
}

/// Rotation mapping local `+Z` onto `forward` and local `+Y` as close as possible to `up`.
///
/// Returns `None` when either vector is zero. Only directions matter, so short
/// bones keep their roll reference. When `up` is parallel to `forward` the
/// shortest rotation from `+Z` to `forward` is used instead.
#[must_use]
pub fn look_rotation(forward: &Vector3<f32>, up: &Vector3<f32>) -> Option<UnitQuaternion<f32>> {
    let forward = forward.try_normalize(EPSILON)?;
    let up = up.try_normalize(EPSILON)?;

    if is_zero(&up.cross(&forward)) {
        return Some(
            UnitQuaternion::rotation_between(&Vector3::z(), &forward)
                .unwrap_or_else(|| UnitQuaternion::from_axis_angle(&Vector3::y_axis(), std::f32::consts::PI)),
        );
    }

    Some(UnitQuaternion::face_towards(&forward, &up))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec_close(a: &Vector3<f32>, b: &Vector3<f32>) {
        assert!((a - b).norm() < 1e-5, "{a:?} != {b:?}");
    }

    #[test]
    fn test_percentage_ramp() {
        assert_eq!(percentage(0.2, 0.5, 1.0), 0.0);
        assert_eq!(percentage(1.5, 0.5, 1.0), 1.0);
        assert!((percentage(0.75, 0.5, 1.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_lerp_clamps() {
        let a = Vector3::zeros();
        let b = Vector3::new(1.0, 0.0, 0.0);
        assert_vec_close(&lerp(&a, &b, 2.0), &b);
        assert_vec_close(&lerp(&a, &b, -1.0), &a);
    }

    #[test]
    fn test_plane_normal_winding() {
        let n = plane_normal(&Vector3::zeros(), &Vector3::x(), &Vector3::y());
        assert_vec_close(&n, &Vector3::z());
        let flipped = plane_normal(&Vector3::zeros(), &Vector3::y(), &Vector3::x());
        assert_vec_close(&flipped, &-Vector3::z());
    }

    #[test]
    fn test_look_rotation_axes() {
        let forward = Vector3::new(1.0, 0.0, 0.0);
        let rotation = look_rotation(&forward, &Vector3::y()).unwrap();
        assert_vec_close(&(rotation * Vector3::z()), &forward);
        assert_vec_close(&(rotation * Vector3::y()), &Vector3::y());
        // right = up x forward
        assert_vec_close(&(rotation * Vector3::x()), &-Vector3::z());
    }

    #[test]
    fn test_look_rotation_degenerate() {
        assert!(look_rotation(&Vector3::zeros(), &Vector3::y()).is_none());
        assert!(look_rotation(&Vector3::z(), &Vector3::zeros()).is_none());

        let parallel = look_rotation(&Vector3::y(), &Vector3::y()).unwrap();
        assert_vec_close(&(parallel * Vector3::z()), &Vector3::y());
    }

    #[test]
    fn test_look_rotation_keeps_roll_on_short_vectors() {
        let up = Vector3::new(-1.0, 0.0, 0.0);
        let large = look_rotation(&Vector3::new(0.0, 0.0, 2.0), &up).unwrap();
        let small = look_rotation(&Vector3::new(0.0, 0.0, 0.002), &(up * 0.002)).unwrap();

        assert_vec_close(&(small * Vector3::y()), &up);
        assert_vec_close(&(small * Vector3::y()), &(large * Vector3::y()));
        assert_vec_close(&(small * Vector3::z()), &Vector3::z());
    }

    #[test]
    fn test_angle_helpers() {
        assert!((angle_degrees(&Vector3::x(), &Vector3::y()) - 90.0).abs() < 1e-4);
        assert_eq!(angle_degrees(&Vector3::zeros(), &Vector3::y()), 0.0);

        let quarter = angle_axis(90.0, &Vector3::y());
        assert_vec_close(&(quarter * Vector3::z()), &Vector3::x());
        assert_eq!(angle_axis(45.0, &Vector3::zeros()), UnitQuaternion::identity());
    }

    #[test]
    fn test_sign_of_zero_is_positive() {
        assert_eq!(sign(0.0), 1.0);
        assert_eq!(sign(-0.1), -1.0);
    }
}
