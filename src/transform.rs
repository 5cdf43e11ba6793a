//! Coordinate transform and viewpoint collaborators.
//!
//! Raw device samples live in the tracking device's own frame. A
//! [`CoordinateTransform`] maps them into the working reference frame where
//! reconstruction happens, and a [`Viewpoint`] describes the observer inside
//! that frame.

use crate::utils::geometry::normalize_or_zero;
use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// Maps raw device positions into the working reference frame
pub trait CoordinateTransform {
    /// Transform a raw position
    fn transform_point(&self, position: &Vector3<f32>) -> Vector3<f32>;
}

/// Device frame and working frame coincide
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTransform;

impl CoordinateTransform for IdentityTransform {
    fn transform_point(&self, position: &Vector3<f32>) -> Vector3<f32> {
        *position
    }
}

/// Rigid playspace offset: rotate, then translate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidTransform {
    isometry: Isometry3<f32>,
}

impl RigidTransform {
    /// Build from a translation and a yaw around the global up axis
    #[must_use]
    pub fn new(translation: Vector3<f32>, yaw_degrees: f32) -> Self {
        let rotation = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), yaw_degrees.to_radians());
        Self {
            isometry: Isometry3::from_parts(Translation3::from(translation), rotation),
        }
    }
}

impl CoordinateTransform for RigidTransform {
    fn transform_point(&self, position: &Vector3<f32>) -> Vector3<f32> {
        self.isometry.transform_point(&(*position).into()).coords
    }
}

/// Observer position and viewing direction, read once per reconstruction pass
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewpoint {
    /// Observer position in the working frame
    pub position: Vector3<f32>,
    /// Unit viewing direction
    pub forward: Vector3<f32>,
}

impl Viewpoint {
    /// Create a viewpoint; `forward` is normalized
    #[must_use]
    pub fn new(position: Vector3<f32>, forward: Vector3<f32>) -> Self {
        Self {
            position,
            forward: normalize_or_zero(&forward),
        }
    }

    /// Viewpoint looking along the local `+Z` axis of `rotation`
    #[must_use]
    pub fn from_pose(position: Vector3<f32>, rotation: &UnitQuaternion<f32>) -> Self {
        Self::new(position, rotation * Vector3::z())
    }
}

impl Default for Viewpoint {
    fn default() -> Self {
        Self::new(Vector3::zeros(), Vector3::z())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_transform() {
        let p = Vector3::new(1.0, 2.0, 3.0);
        assert_eq!(IdentityTransform.transform_point(&p), p);
    }

    #[test]
    fn test_rigid_transform_rotates_then_translates() {
        let transform = RigidTransform::new(Vector3::new(0.0, 1.0, 0.0), 90.0);
        let moved = transform.transform_point(&Vector3::new(0.0, 0.0, 1.0));
        assert!((moved - Vector3::new(1.0, 1.0, 0.0)).norm() < 1e-5, "{moved:?}");
    }

    #[test]
    fn test_viewpoint_normalizes_forward() {
        let viewpoint = Viewpoint::new(Vector3::zeros(), Vector3::new(0.0, 0.0, -4.0));
        assert!((viewpoint.forward - Vector3::new(0.0, 0.0, -1.0)).norm() < 1e-6);

        let rotated = Viewpoint::from_pose(Vector3::zeros(), &UnitQuaternion::identity());
        assert_eq!(rotated.forward, Vector3::z());
    }
}
