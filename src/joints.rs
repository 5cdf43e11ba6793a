//! Canonical hand joints, poses and the per-hand joint pose store.

use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Anatomically named joints of a tracked hand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalJoint {
    Wrist,
    Palm,
    ThumbMetacarpal,
    ThumbProximal,
    ThumbDistal,
    ThumbTip,
    IndexMetacarpal,
    IndexKnuckle,
    IndexMiddle,
    IndexDistal,
    IndexTip,
    MiddleMetacarpal,
    MiddleKnuckle,
    MiddleMiddle,
    MiddleDistal,
    MiddleTip,
    RingMetacarpal,
    RingKnuckle,
    RingMiddle,
    RingDistal,
    RingTip,
    PinkyMetacarpal,
    PinkyKnuckle,
    PinkyMiddle,
    PinkyDistal,
    PinkyTip,
}

impl CanonicalJoint {
    /// Every joint, wrist and palm first
    pub const ALL: [Self; 26] = [
        Self::Wrist,
        Self::Palm,
        Self::ThumbMetacarpal,
        Self::ThumbProximal,
        Self::ThumbDistal,
        Self::ThumbTip,
        Self::IndexMetacarpal,
        Self::IndexKnuckle,
        Self::IndexMiddle,
        Self::IndexDistal,
        Self::IndexTip,
        Self::MiddleMetacarpal,
        Self::MiddleKnuckle,
        Self::MiddleMiddle,
        Self::MiddleDistal,
        Self::MiddleTip,
        Self::RingMetacarpal,
        Self::RingKnuckle,
        Self::RingMiddle,
        Self::RingDistal,
        Self::RingTip,
        Self::PinkyMetacarpal,
        Self::PinkyKnuckle,
        Self::PinkyMiddle,
        Self::PinkyDistal,
        Self::PinkyTip,
    ];
}

impl fmt::Display for CanonicalJoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&format!("{self:?}"))
    }
}

/// Which hand a session tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handedness {
    Left,
    #[default]
    Right,
}

impl Handedness {
    /// `1.0` for the right hand, `-1.0` for the left
    #[must_use]
    pub fn sign(self) -> f32 {
        match self {
            Self::Right => 1.0,
            Self::Left => -1.0,
        }
    }

    /// Flip a plane normal for the left hand so both hands share one winding
    #[must_use]
    pub fn orient_normal(self, normal: Vector3<f32>) -> Vector3<f32> {
        normal * self.sign()
    }
}

impl FromStr for Handedness {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "left" | "l" => Ok(Self::Left),
            "right" | "r" => Ok(Self::Right),
            _ => Err(crate::Error::InvalidInput(format!("Unknown handedness: {s}"))),
        }
    }
}

/// Position and orientation of one joint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Position in the working reference frame
    pub position: Vector3<f32>,
    /// Orientation; meaningful only when `has_orientation` is set
    pub orientation: UnitQuaternion<f32>,
    /// Whether `orientation` was derived from supporting joints
    pub has_orientation: bool,
}

impl Pose {
    /// A pose with a known position and no orientation yet
    #[must_use]
    pub fn from_position(position: Vector3<f32>) -> Self {
        Self {
            position,
            orientation: UnitQuaternion::identity(),
            has_orientation: false,
        }
    }

    /// A fully specified pose
    #[must_use]
    pub fn new(position: Vector3<f32>, orientation: UnitQuaternion<f32>) -> Self {
        Self {
            position,
            orientation,
            has_orientation: true,
        }
    }

    /// Local forward (`+Z`) axis of the orientation
    #[must_use]
    pub fn forward(&self) -> Vector3<f32> {
        self.orientation * Vector3::z()
    }

    /// Local up (`+Y`) axis of the orientation
    #[must_use]
    pub fn up(&self) -> Vector3<f32> {
        self.orientation * Vector3::y()
    }

    /// Local right (`+X`) axis of the orientation
    #[must_use]
    pub fn right(&self) -> Vector3<f32> {
        self.orientation * Vector3::x()
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::from_position(Vector3::zeros())
    }
}

/// Owned mapping from joint to its latest pose.
///
/// A key is present iff the joint was observed at least once since the last
/// [`JointPoseMap::clear`]. One map belongs to exactly one tracked hand and is
/// only touched from the thread driving that hand's updates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JointPoseMap {
    poses: HashMap<CanonicalJoint, Pose>,
}

impl JointPoseMap {
    /// Create an empty map
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert the pose, overwriting any previous one
    pub fn upsert(&mut self, joint: CanonicalJoint, pose: Pose) {
        self.poses.insert(joint, pose);
    }

    /// Pose of `joint`, if it has been observed
    #[must_use]
    pub fn get(&self, joint: CanonicalJoint) -> Option<&Pose> {
        self.poses.get(&joint)
    }

    /// Mutable pose of `joint`, if it has been observed
    pub fn get_mut(&mut self, joint: CanonicalJoint) -> Option<&mut Pose> {
        self.poses.get_mut(&joint)
    }

    /// Position of `joint`, if it has been observed
    #[must_use]
    pub fn position(&self, joint: CanonicalJoint) -> Option<Vector3<f32>> {
        self.poses.get(&joint).map(|p| p.position)
    }

    /// Whether `joint` has been observed
    #[must_use]
    pub fn contains(&self, joint: CanonicalJoint) -> bool {
        self.poses.contains_key(&joint)
    }

    /// Whether every joint in `joints` has been observed
    #[must_use]
    pub fn contains_all(&self, joints: &[CanonicalJoint]) -> bool {
        joints.iter().all(|j| self.contains(*j))
    }

    /// Number of observed joints
    #[must_use]
    pub fn len(&self) -> usize {
        self.poses.len()
    }

    /// Whether no joint has been observed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    /// Forget every joint
    pub fn clear(&mut self) {
        self.poses.clear();
    }

    /// Iterate over observed joints in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&CanonicalJoint, &Pose)> {
        self.poses.iter()
    }

    /// Iterate mutably over observed joints in no particular order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&CanonicalJoint, &mut Pose)> {
        self.poses.iter_mut()
    }
}
