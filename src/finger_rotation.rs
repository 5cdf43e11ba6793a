//! Finger bone orientations from adjacent joint positions.
//!
//! Joints are walked from the tip toward the palm and each one looks at its
//! more proximal neighbour. The roll reference is the palm's right axis: taken
//! as-is for the thumb, turned into a palm-relative normal for the other
//! fingers. The tip segment is too short to be reliable, so once the chain
//! completes the tip copies the distal joint.

use crate::joints::JointPoseMap;
use crate::skeleton::{Finger, ValidityMask};
use crate::utils::geometry::look_rotation;
use nalgebra::{UnitQuaternion, Vector3};

/// Derive orientations for one finger's joints.
///
/// Pairs are (tip, distal), (distal, middle), (middle, knuckle) for the four
/// fingers and (tip, distal), (distal, proximal) for the thumb; the knuckle and
/// metacarpal are never oriented here. The first pair with an untrusted or
/// missing endpoint stops the finger for this frame and skips the tip
/// inheritance, so earlier orientations persist. Returns the number of joints
/// whose orientation was written.
pub fn derive_finger_orientations(
    poses: &mut JointPoseMap,
    finger: Finger,
    mask: &ValidityMask,
    palm_orientation: &UnitQuaternion<f32>,
) -> usize {
    let bone_count = finger.layout().bone_count;
    let palm_right = palm_orientation * Vector3::x();
    let mut written = 0;
    let mut tip_written = false;

    for bone in 0..bone_count.saturating_sub(2) {
        if !mask.is_bone_valid(finger, bone) || !mask.is_bone_valid(finger, bone + 1) {
            return written;
        }
        let (Some(current), Some(next)) = (finger.joint(bone), finger.joint(bone + 1)) else {
            return written;
        };
        let (Some(current_position), Some(next_position)) = (poses.position(current), poses.position(next)) else {
            return written;
        };

        let forward = next_position - current_position;
        let up = match finger {
            Finger::Thumb => palm_right,
            _ => -forward.cross(&palm_right),
        };

        if let (Some(rotation), Some(pose)) = (look_rotation(&forward, &up), poses.get_mut(current)) {
            pose.orientation = rotation;
            pose.has_orientation = true;
            written += 1;
            tip_written |= bone == 0;
        }
    }

    let (Some(tip), Some(distal)) = (finger.joint(0), finger.joint(1)) else {
        return written;
    };
    let inherited = poses.get(distal).filter(|pose| pose.has_orientation).map(|pose| pose.orientation);
    if let (Some(orientation), Some(pose)) = (inherited, poses.get_mut(tip)) {
        pose.orientation = orientation;
        pose.has_orientation = true;
        if !tip_written {
            written += 1;
        }
    }

    written
}

/// Derive orientations for every finger that delivered bones this frame
pub fn derive_all_fingers(
    poses: &mut JointPoseMap,
    fingers: &[Finger],
    mask: &ValidityMask,
    palm_orientation: &UnitQuaternion<f32>,
) -> usize {
    fingers
        .iter()
        .map(|&finger| derive_finger_orientations(poses, finger, mask, palm_orientation))
        .sum()
}
