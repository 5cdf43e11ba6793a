//! Per-hand tracking session.
//!
//! A [`HandJointProvider`] owns the joint pose store, the availability flags and
//! the per-joint smoothing filters for exactly one hand. It is driven once per
//! frame from a single thread and never shared between hands.

use crate::config::SmoothingConfig;
use crate::finger_rotation::derive_all_fingers;
use crate::joint_smoother::{JointSmoother, SmoothingType};
use crate::joints::{CanonicalJoint, Handedness, JointPoseMap, Pose};
use crate::palm::{reconstruct_palm, PalmEstimate, PalmJoints, ROTATION_PREREQUISITES};
use crate::skeleton::{map_sample, validate_layout, Finger, HandSample};
use crate::transform::{CoordinateTransform, IdentityTransform, Viewpoint};
use crate::Result;

/// Joint poses and availability flags for one tracked hand
#[derive(Debug)]
pub struct HandJointProvider<T: CoordinateTransform = IdentityTransform> {
    handedness: Handedness,
    transform: T,
    poses: JointPoseMap,
    smoother: JointSmoother,
    position_available: bool,
    rotation_available: bool,
    tracking: bool,
}

impl HandJointProvider<IdentityTransform> {
    /// Provider whose device frame is the working frame
    ///
    /// # Errors
    ///
    /// Returns an error if the static finger layout is inconsistent.
    pub fn with_identity(handedness: Handedness, smoothing: SmoothingConfig) -> Result<Self> {
        Self::new(handedness, IdentityTransform, smoothing)
    }
}

impl<T: CoordinateTransform> HandJointProvider<T> {
    /// Create a provider for one hand
    ///
    /// # Errors
    ///
    /// Returns an error if the static finger layout is inconsistent.
    pub fn new(handedness: Handedness, transform: T, smoothing: SmoothingConfig) -> Result<Self> {
        validate_layout()?;
        log::info!("Hand joint provider created for the {handedness:?} hand");

        Ok(Self {
            handedness,
            transform,
            poses: JointPoseMap::new(),
            smoother: JointSmoother::new(smoothing),
            position_available: false,
            rotation_available: false,
            tracking: false,
        })
    }

    /// Process one frame.
    ///
    /// When the device lost the hand, both flags are cleared and the stored
    /// poses are left as they were. Otherwise trusted keypoints are mapped,
    /// every stored position is smoothed, and once the palm prerequisites are
    /// present the palm, wrist and finger orientations are derived.
    pub fn update_hand_joints(&mut self, sample: &HandSample, viewpoint: &Viewpoint, smoothing: SmoothingType) {
        if !sample.is_tracking() {
            if self.tracking {
                log::debug!("{:?} hand tracking lost", self.handedness);
            }
            self.tracking = false;
            self.position_available = false;
            self.rotation_available = false;
            return;
        }
        if !self.tracking {
            log::debug!("{:?} hand tracking acquired", self.handedness);
            self.tracking = true;
        }

        self.position_available = true;
        map_sample(sample, &self.transform, &mut self.poses);
        self.smoother.smooth_joints(sample.timestamp, &mut self.poses, smoothing);

        self.rotation_available = self.poses.contains_all(&ROTATION_PREREQUISITES);
        let Some(joints) = PalmJoints::from_poses(&self.poses) else {
            return;
        };

        let palm = reconstruct_palm(&joints, viewpoint, self.handedness);
        self.apply_palm(&palm);

        let fingers: Vec<Finger> = Finger::ALL
            .into_iter()
            .filter(|finger| !sample.bones(*finger).is_empty())
            .collect();
        derive_all_fingers(&mut self.poses, &fingers, &sample.validity_mask, &palm.orientation);
    }

    fn apply_palm(&mut self, palm: &PalmEstimate) {
        self.poses.upsert(CanonicalJoint::Palm, Pose::new(palm.position, palm.orientation));
        if let Some(wrist) = self.poses.get_mut(CanonicalJoint::Wrist) {
            wrist.orientation = palm.orientation;
            wrist.has_orientation = true;
        }
    }

    /// Forget every joint, clear both flags and drop all filter state
    pub fn reset(&mut self) {
        self.poses.clear();
        self.smoother.reset();
        self.position_available = false;
        self.rotation_available = false;
        self.tracking = false;
    }

    /// Latest joint poses
    #[must_use]
    pub fn joint_poses(&self) -> &JointPoseMap {
        &self.poses
    }

    /// Latest pose of `joint`
    #[must_use]
    pub fn joint_pose(&self, joint: CanonicalJoint) -> Option<&Pose> {
        self.poses.get(joint)
    }

    /// Whether positions were refreshed by the last frame
    #[must_use]
    pub fn is_position_available(&self) -> bool {
        self.position_available
    }

    /// Whether the palm prerequisites were present in the last frame
    #[must_use]
    pub fn is_rotation_available(&self) -> bool {
        self.rotation_available
    }

    /// Tracked hand
    #[must_use]
    pub fn handedness(&self) -> Handedness {
        self.handedness
    }
}
