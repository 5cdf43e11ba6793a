//! Frame-to-frame behavior of the hand joint provider


use hand_pose_estimation::config::{Config, SmoothingConfig};
use hand_pose_estimation::hand_provider::HandJointProvider;
use hand_pose_estimation::joint_smoother::SmoothingType;
use hand_pose_estimation::joints::{CanonicalJoint, Handedness};
use hand_pose_estimation::skeleton::Finger;
use hand_pose_estimation::transform::IdentityTransform;
use nalgebra::Vector3;
use test_helpers::*;

fn provider() -> HandJointProvider<IdentityTransform> {
    HandJointProvider::with_identity(Handedness::Right, SmoothingConfig::default()).unwrap()
}

#[test]
fn test_reset_clears_everything() {
    let mut provider = provider();
    provider.update_hand_joints(&right_hand_sample(1.0), &front_viewpoint(), SmoothingType::Robust);
    assert_eq!(provider.joint_poses().len(), CanonicalJoint::ALL.len());

    provider.reset();
    assert!(provider.joint_poses().is_empty());
    assert!(!provider.is_position_available());
    assert!(!provider.is_rotation_available());
}

#[test]
fn test_tracking_loss_keeps_stale_poses() {
    let mut provider = provider();
    provider.update_hand_joints(&right_hand_sample(1.0), &front_viewpoint(), SmoothingType::Robust);
    let before = provider.joint_poses().clone();

    let mut lost = translated(&right_hand_sample(1.0 + FRAME_TIME), Vector3::new(0.1, 0.0, 0.0));
    lost.confidence = 0.0;
    provider.update_hand_joints(&lost, &front_viewpoint(), SmoothingType::Robust);

    assert!(!provider.is_position_available());
    assert!(!provider.is_rotation_available());
    assert_eq!(provider.joint_poses(), &before);

    let mut no_bones = right_hand_sample(1.0 + 2.0 * FRAME_TIME);
    no_bones.finger_bones = None;
    provider.update_hand_joints(&no_bones, &front_viewpoint(), SmoothingType::Robust);
    assert!(!provider.is_position_available());
    assert_eq!(provider.joint_poses(), &before);

    provider.update_hand_joints(
        &right_hand_sample(1.0 + 3.0 * FRAME_TIME),
        &front_viewpoint(),
        SmoothingType::Robust,
    );
    assert!(provider.is_position_available());
    assert!(provider.is_rotation_available());
}

#[test]
fn test_rotation_gated_on_ring_knuckle() {
    let mut provider = provider();
    let mut sample = right_hand_sample(1.0);
    // ring knuckle is raw slot 12 + 3
    sample.validity_mask.set(15, false);
    provider.update_hand_joints(&sample, &front_viewpoint(), SmoothingType::None);

    assert!(provider.is_position_available());
    assert!(!provider.is_rotation_available());
    assert!(provider.joint_pose(CanonicalJoint::RingKnuckle).is_none());
    assert!(provider
        .joint_poses()
        .iter()
        .all(|(_, pose)| !pose.has_orientation));

    provider.update_hand_joints(&right_hand_sample(1.0 + FRAME_TIME), &front_viewpoint(), SmoothingType::None);
    assert!(provider.is_rotation_available());
}

#[test]
fn test_occluded_finger_keeps_exact_positions() {
    let mut provider = provider();
    let viewpoint = front_viewpoint();
    let step = Vector3::new(0.0, 0.002, 0.001);

    for frame in 0..3 {
        let sample = translated(&right_hand_sample(1.0 + frame as f32 * FRAME_TIME), step * frame as f32);
        provider.update_hand_joints(&sample, &viewpoint, SmoothingType::Robust);
    }

    let pinky_joints: Vec<CanonicalJoint> = (0..Finger::Pinky.layout().bone_count)
        .filter_map(|bone| Finger::Pinky.joint(bone))
        .collect();
    let frozen: Vec<_> = pinky_joints
        .iter()
        .map(|joint| provider.joint_pose(*joint).unwrap().position)
        .collect();

    let mut previous_index_tip = provider.joint_pose(CanonicalJoint::IndexTip).unwrap().position;
    for frame in 3..10 {
        let mut sample = translated(&right_hand_sample(1.0 + frame as f32 * FRAME_TIME), step * frame as f32);
        for raw in 16..=20 {
            sample.validity_mask.set(raw, false);
        }
        provider.update_hand_joints(&sample, &viewpoint, SmoothingType::Robust);

        for (joint, position) in pinky_joints.iter().zip(&frozen) {
            assert_eq!(&provider.joint_pose(*joint).unwrap().position, position, "{joint} moved");
        }

        let index_tip = provider.joint_pose(CanonicalJoint::IndexTip).unwrap().position;
        assert_ne!(index_tip, previous_index_tip, "Index tip should keep tracking");
        previous_index_tip = index_tip;
    }
}

#[test]
fn test_finger_orientations_follow_palm_reference() {
    let mut provider = provider();
    provider.update_hand_joints(&right_hand_sample(1.0), &front_viewpoint(), SmoothingType::None);
    let position = |joint| provider.joint_pose(joint).unwrap().position;

    for finger in [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky] {
        let tip = provider.joint_pose(finger.joint(0).unwrap()).unwrap();
        let distal_joint = finger.joint(1).unwrap();
        let distal = provider.joint_pose(distal_joint).unwrap();
        assert!(distal.has_orientation, "{finger:?}");
        assert_eq!(tip.orientation, distal.orientation, "{finger:?} tip should copy the distal joint");

        // each joint looks at its proximal neighbour
        let toward_middle = (position(finger.joint(2).unwrap()) - position(distal_joint)).normalize();
        assert_vec_close(&distal.forward(), &toward_middle, 1e-4);
        assert_vec_close(&distal.forward(), &-Vector3::z(), 1e-4);
        assert_rotation_valid(&distal.orientation);

        let knuckle = provider.joint_pose(finger.joint(3).unwrap()).unwrap();
        assert!(!knuckle.has_orientation, "{finger:?} knuckle");
    }

    let metacarpal = provider.joint_pose(CanonicalJoint::MiddleMetacarpal).unwrap();
    assert!(!metacarpal.has_orientation);
}

#[test]
fn test_thumb_rolls_with_palm_right_axis() {
    let mut provider = provider();
    provider.update_hand_joints(&right_hand_sample(1.0), &front_viewpoint(), SmoothingType::None);

    let palm_right = provider.joint_pose(CanonicalJoint::Palm).unwrap().orientation * Vector3::x();
    let distal = provider.joint_pose(CanonicalJoint::ThumbDistal).unwrap();
    let proximal = provider.joint_pose(CanonicalJoint::ThumbProximal).unwrap();

    let expected_forward = (proximal.position - distal.position).normalize();
    assert_vec_close(&distal.forward(), &expected_forward, 1e-4);
    // up is palm right made orthogonal to forward
    let up = distal.up();
    assert!(up.dot(&palm_right) > 0.75, "{up:?} vs {palm_right:?}");
    assert!(expected_forward.cross(&palm_right).dot(&up).abs() < 1e-4);
    assert!(!proximal.has_orientation);
}

#[test]
fn test_smoothing_reduces_jitter() {
    let mut raw = provider();
    let mut smoothed = provider();
    let viewpoint = front_viewpoint();

    let mut raw_travel = 0.0;
    let mut smoothed_travel = 0.0;
    let mut last_raw: Option<Vector3<f32>> = None;
    let mut last_smoothed: Option<Vector3<f32>> = None;

    for frame in 0..120 {
        let jitter = if frame % 2 == 0 { 0.003 } else { -0.003 };
        let sample = translated(
            &right_hand_sample(1.0 + frame as f32 * FRAME_TIME),
            Vector3::new(jitter, 0.0, 0.0),
        );
        raw.update_hand_joints(&sample, &viewpoint, SmoothingType::None);
        smoothed.update_hand_joints(&sample, &viewpoint, SmoothingType::Fixed);

        let r = raw.joint_pose(CanonicalJoint::IndexTip).unwrap().position;
        let s = smoothed.joint_pose(CanonicalJoint::IndexTip).unwrap().position;
        if let (Some(lr), Some(ls)) = (last_raw, last_smoothed) {
            raw_travel += (r - lr).norm();
            smoothed_travel += (s - ls).norm();
        }
        last_raw = Some(r);
        last_smoothed = Some(s);
    }

    assert!(
        smoothed_travel < raw_travel * 0.5,
        "smoothed travel {smoothed_travel} vs raw {raw_travel}"
    );
}

#[test]
fn test_playspace_transform_moves_joints() {
    let mut config = Config::default();
    config.playspace.translation = [0.0, 1.5, 0.0];

    let mut provider =
        HandJointProvider::new(Handedness::Right, config.create_transform(), config.smoothing.clone()).unwrap();
    provider.update_hand_joints(&right_hand_sample(1.0), &front_viewpoint(), SmoothingType::None);

    let wrist = provider.joint_pose(CanonicalJoint::Wrist).unwrap();
    assert_vec_close(&wrist.position, &Vector3::new(0.0, 1.5, 0.0), 1e-6);
    let middle = provider.joint_pose(CanonicalJoint::MiddleKnuckle).unwrap();
    assert_vec_close(&middle.position, &Vector3::new(0.0, 1.5, 0.08), 1e-6);
}
