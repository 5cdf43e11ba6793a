//! Palm and wrist pose reconstruction.
//!
//! Hand trackers report finger keypoints and a wrist center but no palm
//! orientation. The palm pose is estimated from five joints (wrist, middle
//! knuckle, thumb proximal, index knuckle, ring knuckle) and the observer's
//! viewpoint through a fixed sequence of geometric corrections:
//!
//! 1. midpoint seed between wrist and middle knuckle
//! 2. palm radius from the wrist-to-thumb distance, attenuated at range
//! 3. palm facing sign relative to the viewpoint
//! 4. hand roll from thumb/palm/wrist alignment
//! 5. inward slide from a wrist-thumb anchor into the physical palm center
//! 6. forward from the blended center, position from the physical one
//! 7. initial up from the wrist/thumb/center plane
//! 8. forward steering when the back of the hand faces the viewpoint
//! 9. radius re-application along the final forward
//! 10. counter-clockwise knuckle roll fix
//! 11. tilt-away fix
//! 12. self-occlusion steering or palm-down roll offset
//!
//! Every plane normal and rotation sign is mirrored for the left hand. The
//! thresholds are tuned for visual plausibility and are kept as-is.

use crate::constants::{
    BACK_FACING_THRESHOLD, INWARD_ROTATION_DEGREES, KNUCKLE_ROLL_FULL, KNUCKLE_ROLL_START, PALM_DOWN_ROLL_DEGREES,
    PALM_ORIGIN_LERP, PALM_RADIUS_SCALE, PALM_SEED_LERP, SELF_OCCLUSION_THRESHOLD, TILT_AWAY_FAR, TILT_AWAY_NEAR,
    VIEW_DISTANCE_FALLOFF_START, VIEW_DISTANCE_MAX_ATTENUATION, VIEW_DISTANCE_REFERENCE,
};
use crate::joints::{CanonicalJoint, Handedness, JointPoseMap};
use crate::transform::Viewpoint;
use crate::utils::geometry::{
    angle_axis, angle_degrees, global_up, lerp, look_rotation, normalize_or_zero, percentage, plane_normal, sign,
};
use nalgebra::{UnitQuaternion, Vector3};

/// Joints that must all be present before any orientation is derived
pub const ROTATION_PREREQUISITES: [CanonicalJoint; 5] = [
    CanonicalJoint::Wrist,
    CanonicalJoint::MiddleKnuckle,
    CanonicalJoint::ThumbProximal,
    CanonicalJoint::IndexKnuckle,
    CanonicalJoint::RingKnuckle,
];

/// Positions of the joints the palm estimate is built from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PalmJoints {
    pub wrist: Vector3<f32>,
    pub middle_knuckle: Vector3<f32>,
    pub thumb_proximal: Vector3<f32>,
    pub index_knuckle: Vector3<f32>,
    pub ring_knuckle: Vector3<f32>,
}

impl PalmJoints {
    /// Collect the prerequisite joints, or `None` if any is missing
    #[must_use]
    pub fn from_poses(poses: &JointPoseMap) -> Option<Self> {
        Some(Self {
            wrist: poses.position(CanonicalJoint::Wrist)?,
            middle_knuckle: poses.position(CanonicalJoint::MiddleKnuckle)?,
            thumb_proximal: poses.position(CanonicalJoint::ThumbProximal)?,
            index_knuckle: poses.position(CanonicalJoint::IndexKnuckle)?,
            ring_knuckle: poses.position(CanonicalJoint::RingKnuckle)?,
        })
    }

    /// Mirror every position across the `x = 0` plane
    #[must_use]
    pub fn mirrored(&self) -> Self {
        let m = |v: &Vector3<f32>| Vector3::new(-v.x, v.y, v.z);
        Self {
            wrist: m(&self.wrist),
            middle_knuckle: m(&self.middle_knuckle),
            thumb_proximal: m(&self.thumb_proximal),
            index_knuckle: m(&self.index_knuckle),
            ring_knuckle: m(&self.ring_knuckle),
        }
    }
}

/// Working center/forward/up triple refined by the later stages
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PalmFrame {
    pub center: Vector3<f32>,
    pub forward: Vector3<f32>,
    pub up: Vector3<f32>,
}

/// Result of the inward slide stage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InwardSlide {
    /// Physically grounded palm center
    pub dead_center: Vector3<f32>,
    /// Dead center blended back toward the seed by the roll amount
    pub blended_center: Vector3<f32>,
}

/// Reconstructed palm pose
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PalmEstimate {
    pub position: Vector3<f32>,
    pub orientation: UnitQuaternion<f32>,
}

/// Stage 1: naive palm center halfway between wrist and middle knuckle
#[must_use]
pub fn midpoint_seed(joints: &PalmJoints) -> Vector3<f32> {
    lerp(&joints.wrist, &joints.middle_knuckle, PALM_SEED_LERP)
}

/// Stage 2: nominal wrist-to-palm distance.
///
/// Trackers overestimate the wrist-to-thumb distance as the hand moves away, so
/// the radius shrinks by up to 40% once the wrist is beyond 90% of the
/// reference distance.
#[must_use]
pub fn palm_radius(joints: &PalmJoints, viewpoint: &Viewpoint) -> f32 {
    let radius = (joints.thumb_proximal - joints.wrist).norm() * PALM_RADIUS_SCALE;
    let distance = ((viewpoint.position - joints.wrist).norm() / VIEW_DISTANCE_REFERENCE).clamp(0.0, 1.0);
    let compensation = 1.0 - percentage(distance, VIEW_DISTANCE_FALLOFF_START, 1.0) * VIEW_DISTANCE_MAX_ATTENUATION;
    radius * compensation
}

/// Stage 3: `1.0` when the palm faces along the view direction, `-1.0` otherwise
#[must_use]
pub fn palm_facing_sign(
    joints: &PalmJoints,
    center: &Vector3<f32>,
    viewpoint: &Viewpoint,
    handedness: Handedness,
) -> f32 {
    let project = |p: &Vector3<f32>| p + normalize_or_zero(&(p - viewpoint.position));
    let normal = handedness.orient_normal(plane_normal(
        &project(&joints.wrist),
        &project(center),
        &project(&joints.thumb_proximal),
    ));
    sign(normal.dot(&viewpoint.forward))
}

/// Stage 4: signed hand roll, growing as thumb and palm directions diverge
#[must_use]
pub fn roll_amount(joints: &PalmJoints, center: &Vector3<f32>, facing_sign: f32) -> f32 {
    let to_thumb = normalize_or_zero(&(joints.thumb_proximal - center));
    let to_palm = normalize_or_zero(&(center - joints.wrist));
    (1.0 - to_thumb.dot(&to_palm)) * facing_sign
}

/// Stage 5: slide from an anchor between wrist and thumb into the palm center
#[must_use]
pub fn inward_slide(
    joints: &PalmJoints,
    viewpoint: &Viewpoint,
    handedness: Handedness,
    roll: f32,
    radius: f32,
    seed: &Vector3<f32>,
) -> InwardSlide {
    let origin = lerp(&joints.wrist, &joints.thumb_proximal, PALM_ORIGIN_LERP);
    let to_viewpoint = normalize_or_zero(&(viewpoint.position - origin));
    let wrist_to_thumb = normalize_or_zero(&(joints.thumb_proximal - joints.wrist));

    let reference = look_rotation(&wrist_to_thumb, &to_viewpoint).unwrap_or_else(UnitQuaternion::identity);
    let inward_degrees = INWARD_ROTATION_DEGREES * handedness.sign();
    let rotated = angle_axis(roll * inward_degrees, &(reference * Vector3::z())) * reference;
    let inward = rotated * Vector3::y();

    let dead_center = origin - inward * radius;
    InwardSlide {
        dead_center,
        blended_center: lerp(&dead_center, seed, roll.abs()),
    }
}

/// Stage 7: initial up from the wrist/thumb/center plane
#[must_use]
pub fn up_seed(joints: &PalmJoints, center: &Vector3<f32>, handedness: Handedness) -> Vector3<f32> {
    handedness.orient_normal(plane_normal(&joints.wrist, &joints.thumb_proximal, center))
}

/// Stage 8: steer forward toward the middle knuckle when the back of the hand faces the viewpoint
#[must_use]
pub fn back_of_hand_correction(joints: &PalmJoints, frame: &PalmFrame, viewpoint: &Viewpoint) -> Vector3<f32> {
    let to_viewpoint = normalize_or_zero(&(viewpoint.position - joints.wrist));
    let facing = to_viewpoint.dot(&frame.up);
    if facing <= BACK_FACING_THRESHOLD {
        return frame.forward;
    }

    let amount = percentage(facing, BACK_FACING_THRESHOLD, 1.0);
    let to_middle = normalize_or_zero(&(joints.middle_knuckle - frame.center));
    lerp(&frame.forward, &to_middle, amount)
}

/// Stage 10: correct the counter-clockwise roll that shows when the knuckle line points up.
///
/// Returns the corrected orientation when the correction engaged.
pub fn knuckle_roll_correction(
    joints: &PalmJoints,
    seed: &Vector3<f32>,
    handedness: Handedness,
    frame: &mut PalmFrame,
) -> Option<UnitQuaternion<f32>> {
    let knuckles = normalize_or_zero(&(joints.middle_knuckle - joints.index_knuckle));
    let alignment = knuckles.dot(&global_up());
    if alignment <= KNUCKLE_ROLL_START {
        return None;
    }

    let amount = percentage(alignment, KNUCKLE_ROLL_START, KNUCKLE_ROLL_FULL);
    frame.center = lerp(&frame.center, seed, amount);
    frame.forward = lerp(
        &frame.forward,
        &normalize_or_zero(&(joints.middle_knuckle - seed)),
        amount,
    );
    let back_normal = handedness.orient_normal(plane_normal(seed, &joints.index_knuckle, &joints.middle_knuckle));
    frame.up = lerp(&frame.up, &back_normal, amount);
    look_rotation(&frame.forward, &frame.up)
}

/// Stage 11: pull the estimate toward the viewpoint axis as the wrist tilts away.
///
/// A short seed-to-wrist distance means the hand is seen edge-on; without this the
/// center drifts toward the thumb.
pub fn tilt_away_correction(
    joints: &PalmJoints,
    seed: &Vector3<f32>,
    viewpoint: &Viewpoint,
    radius: f32,
    handedness: Handedness,
    frame: &mut PalmFrame,
) -> Option<UnitQuaternion<f32>> {
    let amount = 1.0 - percentage((seed - joints.wrist).norm(), TILT_AWAY_NEAR, TILT_AWAY_FAR);
    let view_to_wrist = normalize_or_zero(&(joints.wrist - viewpoint.position));
    let correction_point = joints.wrist + view_to_wrist * radius;

    frame.center = lerp(&frame.center, &correction_point, amount);
    frame.forward = lerp(
        &frame.forward,
        &normalize_or_zero(&(correction_point - joints.wrist)),
        amount,
    );
    let wrist_normal = handedness.orient_normal(plane_normal(&joints.wrist, &joints.thumb_proximal, &frame.center));
    frame.up = lerp(&frame.up, &wrist_normal, amount);
    look_rotation(&frame.forward, &frame.up)
}

/// Stage 12: final roll about `forward`.
///
/// With the hand pointing up, thumb and index tend to occlude each other, so the
/// roll is taken from the ring-index knuckle axis. Otherwise a fixed offset is
/// applied in proportion to how much the palm already faces up.
#[must_use]
pub fn self_occlusion_steering(
    joints: &PalmJoints,
    forward: &Vector3<f32>,
    orientation: UnitQuaternion<f32>,
    handedness: Handedness,
) -> UnitQuaternion<f32> {
    let right = orientation * Vector3::x();

    if forward.dot(&global_up()) > SELF_OCCLUSION_THRESHOLD {
        let angle = match handedness {
            Handedness::Right => {
                -angle_degrees(&normalize_or_zero(&(joints.ring_knuckle - joints.index_knuckle)), &right)
            }
            Handedness::Left => {
                angle_degrees(&normalize_or_zero(&(joints.index_knuckle - joints.ring_knuckle)), &right)
            }
        };
        angle_axis(angle, forward) * orientation
    } else {
        let correction = (orientation * Vector3::y()).dot(&global_up()).clamp(0.0, 1.0);
        let degrees = -PALM_DOWN_ROLL_DEGREES * handedness.sign();
        angle_axis(degrees * correction, forward) * orientation
    }
}

/// Run every stage and produce the palm pose
#[must_use]
pub fn reconstruct_palm(joints: &PalmJoints, viewpoint: &Viewpoint, handedness: Handedness) -> PalmEstimate {
    let seed = midpoint_seed(joints);
    let radius = palm_radius(joints, viewpoint);
    let center = joints.wrist + normalize_or_zero(&(seed - joints.wrist)) * radius;

    let facing = palm_facing_sign(joints, &center, viewpoint, handedness);
    let roll = roll_amount(joints, &center, facing);
    let slide = inward_slide(joints, viewpoint, handedness, roll, radius, &seed);

    // forward follows the blended center, position stays on the physical one
    let mut frame = PalmFrame {
        center: slide.dead_center,
        forward: normalize_or_zero(&(slide.blended_center - joints.wrist)),
        up: Vector3::zeros(),
    };
    frame.up = up_seed(joints, &frame.center, handedness);
    frame.forward = back_of_hand_correction(joints, &frame, viewpoint);
    frame.center = joints.wrist + frame.forward * radius;

    let mut orientation = look_rotation(&frame.forward, &frame.up).unwrap_or_else(UnitQuaternion::identity);
    if let Some(corrected) = knuckle_roll_correction(joints, &seed, handedness, &mut frame) {
        orientation = corrected;
    }
    if let Some(corrected) = tilt_away_correction(joints, &seed, viewpoint, radius, handedness, &mut frame) {
        orientation = corrected;
    }
    orientation = self_occlusion_steering(joints, &frame.forward, orientation, handedness);

    PalmEstimate {
        position: frame.center,
        orientation,
    }
}
