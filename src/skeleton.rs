//! Device skeleton layout and the mapping of raw finger bones onto canonical joints.
//!
//! The device reports five bone slots per finger, tip first. The thumb only
//! fills four of them; its fifth slot lines up with the gap in the canonical
//! finger layout. Each finger's bones are checked against the validity mask at
//! `raw_offset + bone` and written to the canonical slot at
//! `canonical_offset + bone`.

use crate::constants::{BONES_PER_FINGER, FINGER_COUNT, FINGER_LAYOUT_SLOTS, VALIDITY_MASK_LEN};
use crate::joints::{CanonicalJoint, JointPoseMap, Pose};
use crate::transform::CoordinateTransform;
use crate::{Error, Result};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Tracked fingers in device order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    /// Every finger in device order
    pub const ALL: [Self; FINGER_COUNT] = [Self::Thumb, Self::Index, Self::Middle, Self::Ring, Self::Pinky];

    /// Where this finger's bones live in the mask and canonical layout
    #[must_use]
    pub fn layout(self) -> &'static FingerLayout {
        &FINGER_LAYOUTS[self as usize]
    }

    /// Canonical joint for the finger's `bone`-th device slot, if it maps to one
    #[must_use]
    pub fn joint(self, bone: usize) -> Option<CanonicalJoint> {
        let layout = self.layout();
        if bone >= layout.bone_count {
            return None;
        }
        FINGER_JOINT_SLOTS.get(layout.canonical_offset + bone).copied().flatten()
    }
}

/// Offsets of one finger inside the validity mask and the canonical layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FingerLayout {
    /// First validity mask entry of the finger
    pub raw_offset: usize,
    /// First canonical slot of the finger
    pub canonical_offset: usize,
    /// Device slots that map to a canonical joint
    pub bone_count: usize,
}

/// Per-finger layout, indexed by [`Finger`]
pub const FINGER_LAYOUTS: [FingerLayout; FINGER_COUNT] = [
    FingerLayout { raw_offset: 0, canonical_offset: 0, bone_count: 4 },
    FingerLayout { raw_offset: 4, canonical_offset: 5, bone_count: 5 },
    FingerLayout { raw_offset: 8, canonical_offset: 10, bone_count: 5 },
    FingerLayout { raw_offset: 12, canonical_offset: 15, bone_count: 5 },
    FingerLayout { raw_offset: 16, canonical_offset: 20, bone_count: 5 },
];

/// Canonical finger slots, tip first per finger; `None` is the thumb gap
pub const FINGER_JOINT_SLOTS: [Option<CanonicalJoint>; FINGER_LAYOUT_SLOTS] = [
    Some(CanonicalJoint::ThumbTip),
    Some(CanonicalJoint::ThumbDistal),
    Some(CanonicalJoint::ThumbProximal),
    Some(CanonicalJoint::ThumbMetacarpal),
    None,
    Some(CanonicalJoint::IndexTip),
    Some(CanonicalJoint::IndexDistal),
    Some(CanonicalJoint::IndexMiddle),
    Some(CanonicalJoint::IndexKnuckle),
    Some(CanonicalJoint::IndexMetacarpal),
    Some(CanonicalJoint::MiddleTip),
    Some(CanonicalJoint::MiddleDistal),
    Some(CanonicalJoint::MiddleMiddle),
    Some(CanonicalJoint::MiddleKnuckle),
    Some(CanonicalJoint::MiddleMetacarpal),
    Some(CanonicalJoint::RingTip),
    Some(CanonicalJoint::RingDistal),
    Some(CanonicalJoint::RingMiddle),
    Some(CanonicalJoint::RingKnuckle),
    Some(CanonicalJoint::RingMetacarpal),
    Some(CanonicalJoint::PinkyTip),
    Some(CanonicalJoint::PinkyDistal),
    Some(CanonicalJoint::PinkyMiddle),
    Some(CanonicalJoint::PinkyKnuckle),
    Some(CanonicalJoint::PinkyMetacarpal),
];

/// Check the static layout tables against each other.
///
/// # Errors
///
/// Returns an error if a finger overruns the canonical layout or the validity
/// mask, maps a usable bone onto the gap, or two bones share a canonical joint.
pub fn validate_layout() -> Result<()> {
    let mut seen: Vec<CanonicalJoint> = Vec::with_capacity(FINGER_LAYOUT_SLOTS);

    for finger in Finger::ALL {
        let layout = finger.layout();
        if layout.bone_count > BONES_PER_FINGER {
            return Err(Error::LayoutError(format!(
                "{finger:?} uses {} bones, device reports {BONES_PER_FINGER}",
                layout.bone_count
            )));
        }
        if layout.canonical_offset + layout.bone_count > FINGER_LAYOUT_SLOTS {
            return Err(Error::LayoutError(format!("{finger:?} overruns the canonical layout")));
        }
        if layout.raw_offset + layout.bone_count > VALIDITY_MASK_LEN {
            return Err(Error::LayoutError(format!("{finger:?} overruns the validity mask")));
        }

        for bone in 0..layout.bone_count {
            let joint = finger.joint(bone).ok_or_else(|| {
                Error::LayoutError(format!("{finger:?} bone {bone} maps onto the layout gap"))
            })?;
            if seen.contains(&joint) {
                return Err(Error::LayoutError(format!("{joint} is mapped twice")));
            }
            seen.push(joint);
        }
    }

    Ok(())
}

/// Per-keypoint trust flags for one frame, aligned with the device bone layout
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidityMask(Vec<bool>);

impl ValidityMask {
    /// Wrap raw mask entries
    #[must_use]
    pub fn new(entries: Vec<bool>) -> Self {
        Self(entries)
    }

    /// A full-length mask with every keypoint trusted
    #[must_use]
    pub fn all_valid() -> Self {
        Self(vec![true; VALIDITY_MASK_LEN])
    }

    /// Whether raw keypoint `index` is trusted; entries past the end are not
    #[must_use]
    pub fn is_valid(&self, index: usize) -> bool {
        self.0.get(index).copied().unwrap_or(false)
    }

    /// Mark raw keypoint `index` as trusted or not, growing the mask if needed
    pub fn set(&mut self, index: usize, valid: bool) {
        if index >= self.0.len() {
            self.0.resize(index + 1, false);
        }
        self.0[index] = valid;
    }

    /// Whether the bone of `finger` at device slot `bone` is trusted
    #[must_use]
    pub fn is_bone_valid(&self, finger: Finger, bone: usize) -> bool {
        self.is_valid(finger.layout().raw_offset + bone)
    }

    /// Raw entries
    #[must_use]
    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }
}

/// One frame of raw hand data from the device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandSample {
    /// Sample time in seconds
    pub timestamp: f32,
    /// Tracking confidence; zero or below means the hand is lost
    pub confidence: f32,
    /// Bone positions per finger in device order, tip first; `None` when the
    /// device did not deliver bone data this frame
    pub finger_bones: Option<[Vec<Vector3<f32>>; FINGER_COUNT]>,
    /// Wrist center feature
    #[serde(default)]
    pub wrist_center: Option<Vector3<f32>>,
    /// Device (grip) position feature
    #[serde(default)]
    pub device_position: Option<Vector3<f32>>,
    /// Trust flags aligned with the bone layout
    #[serde(default)]
    pub validity_mask: ValidityMask,
}

impl HandSample {
    /// Whether the device considers the hand tracked this frame
    #[must_use]
    pub fn is_tracking(&self) -> bool {
        self.confidence > 0.0 && self.finger_bones.is_some()
    }

    /// Raw bones of `finger`, empty when bone data is missing
    #[must_use]
    pub fn bones(&self, finger: Finger) -> &[Vector3<f32>] {
        self.finger_bones
            .as_ref()
            .map_or(&[][..], |bones| bones[finger as usize].as_slice())
    }
}

/// Write the trusted bones of `finger` into `poses` as position-only poses.
///
/// Untrusted bones keep whatever pose they had. Returns the number of joints written.
pub fn map_finger<T: CoordinateTransform + ?Sized>(
    sample: &HandSample,
    finger: Finger,
    transform: &T,
    poses: &mut JointPoseMap,
) -> usize {
    let mut written = 0;
    for (bone, position) in sample.bones(finger).iter().enumerate() {
        let Some(joint) = finger.joint(bone) else {
            continue;
        };
        if !sample.validity_mask.is_bone_valid(finger, bone) {
            continue;
        }
        poses.upsert(joint, Pose::from_position(transform.transform_point(position)));
        written += 1;
    }
    written
}

/// Write the wrist position from the sample's wrist center feature
pub fn map_wrist<T: CoordinateTransform + ?Sized>(sample: &HandSample, transform: &T, poses: &mut JointPoseMap) {
    if let Some(wrist) = sample.wrist_center {
        poses.upsert(CanonicalJoint::Wrist, Pose::from_position(transform.transform_point(&wrist)));
    }
}

/// Seed the palm position from the sample's device position feature
pub fn map_palm_seed<T: CoordinateTransform + ?Sized>(
    sample: &HandSample,
    transform: &T,
    poses: &mut JointPoseMap,
) {
    if let Some(device) = sample.device_position {
        poses.upsert(CanonicalJoint::Palm, Pose::from_position(transform.transform_point(&device)));
    }
}

/// Map every finger, the wrist and the palm seed. Returns the number of finger joints written.
pub fn map_sample<T: CoordinateTransform + ?Sized>(sample: &HandSample, transform: &T, poses: &mut JointPoseMap) -> usize {
    let written: usize = Finger::ALL
        .iter()
        .map(|&finger| map_finger(sample, finger, transform, poses))
        .sum();
    map_wrist(sample, transform, poses);
    map_palm_seed(sample, transform, poses);
    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{IdentityTransform, RigidTransform};

    fn sample_with_bones() -> HandSample {
        let bones = std::array::from_fn(|f| {
            (0..BONES_PER_FINGER)
                .map(|b| Vector3::new(f as f32, b as f32, 0.0))
                .collect::<Vec<_>>()
        });
        HandSample {
            timestamp: 1.0,
            confidence: 1.0,
            finger_bones: Some(bones),
            wrist_center: Some(Vector3::new(0.0, -1.0, 0.0)),
            device_position: Some(Vector3::new(0.0, 0.5, 0.0)),
            validity_mask: ValidityMask::all_valid(),
        }
    }

    #[test]
    fn test_layout_is_valid() {
        validate_layout().unwrap();
    }

    #[test]
    fn test_finger_joint_lookup() {
        assert_eq!(Finger::Thumb.joint(0), Some(CanonicalJoint::ThumbTip));
        assert_eq!(Finger::Thumb.joint(2), Some(CanonicalJoint::ThumbProximal));
        assert_eq!(Finger::Thumb.joint(4), None);
        assert_eq!(Finger::Index.joint(3), Some(CanonicalJoint::IndexKnuckle));
        assert_eq!(Finger::Ring.joint(3), Some(CanonicalJoint::RingKnuckle));
        assert_eq!(Finger::Pinky.joint(4), Some(CanonicalJoint::PinkyMetacarpal));
        assert_eq!(Finger::Pinky.joint(5), None);
    }

    #[test]
    fn test_map_sample_writes_all_joints() {
        let sample = sample_with_bones();
        let mut poses = JointPoseMap::new();
        let written = map_sample(&sample, &IdentityTransform, &mut poses);

        assert_eq!(written, 24);
        // 24 finger joints + wrist + palm
        assert_eq!(poses.len(), 26);
        assert_eq!(poses.position(CanonicalJoint::IndexKnuckle), Some(Vector3::new(1.0, 3.0, 0.0)));
        assert_eq!(poses.position(CanonicalJoint::Wrist), Some(Vector3::new(0.0, -1.0, 0.0)));
        assert_eq!(poses.position(CanonicalJoint::Palm), Some(Vector3::new(0.0, 0.5, 0.0)));
        assert!(poses.iter().all(|(_, pose)| !pose.has_orientation));
    }

    #[test]
    fn test_untrusted_bones_keep_previous_pose() {
        let mut sample = sample_with_bones();
        let mut poses = JointPoseMap::new();
        map_sample(&sample, &IdentityTransform, &mut poses);
        let before = poses.position(CanonicalJoint::ThumbDistal);

        sample.validity_mask.set(1, false);
        if let Some(bones) = sample.finger_bones.as_mut() {
            bones[0][1] = Vector3::new(9.0, 9.0, 9.0);
            bones[0][0] = Vector3::new(8.0, 8.0, 8.0);
        }
        map_finger(&sample, Finger::Thumb, &IdentityTransform, &mut poses);

        assert_eq!(poses.position(CanonicalJoint::ThumbDistal), before);
        assert_eq!(poses.position(CanonicalJoint::ThumbTip), Some(Vector3::new(8.0, 8.0, 8.0)));
    }

    #[test]
    fn test_short_mask_counts_as_untrusted() {
        let mut sample = sample_with_bones();
        sample.validity_mask = ValidityMask::new(vec![true; 4]);
        let mut poses = JointPoseMap::new();
        let written = map_sample(&sample, &IdentityTransform, &mut poses);

        assert_eq!(written, 4);
        assert!(poses.contains(CanonicalJoint::ThumbMetacarpal));
        assert!(!poses.contains(CanonicalJoint::IndexTip));
    }

    #[test]
    fn test_mapping_applies_transform() {
        let sample = sample_with_bones();
        let transform = RigidTransform::new(Vector3::new(0.0, 0.0, 2.0), 0.0);
        let mut poses = JointPoseMap::new();
        map_sample(&sample, &transform, &mut poses);
        assert_eq!(poses.position(CanonicalJoint::Wrist), Some(Vector3::new(0.0, -1.0, 2.0)));
    }

    #[test]
    fn test_tracking_state() {
        let mut sample = sample_with_bones();
        assert!(sample.is_tracking());
        sample.confidence = 0.0;
        assert!(!sample.is_tracking());
        sample.confidence = 1.0;
        sample.finger_bones = None;
        assert!(!sample.is_tracking());
        assert!(sample.bones(Finger::Index).is_empty());
    }
}
