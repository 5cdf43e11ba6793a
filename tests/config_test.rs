//! Tests for configuration and recording files


use hand_pose_estimation::config::{Config, EXAMPLE_CONFIG};
use hand_pose_estimation::joint_smoother::SmoothingType;
use hand_pose_estimation::joints::Handedness;
use hand_pose_estimation::recording::{RecordedFrame, Recording};
use hand_pose_estimation::transform::CoordinateTransform;
use hand_pose_estimation::Error;
use nalgebra::Vector3;
use std::path::PathBuf;
use test_helpers::*;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("hand_pose_{}_{name}", std::process::id()))
}

#[test]
fn test_config_file_round_trip() {
    let mut config = Config::default();
    config.hand.handedness = Handedness::Left;
    config.hand.smoothing = SmoothingType::Fixed;
    config.smoothing.robust.beta = 2.0;
    config.playspace.translation = [0.5, 1.0, -0.25];

    let path = temp_path("config.yaml");
    config.to_file(&path).unwrap();
    let loaded = Config::from_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded, config);
}

#[test]
fn test_example_config_is_valid() {
    let config: Config = serde_yaml::from_str(EXAMPLE_CONFIG).unwrap();
    config.validate().unwrap();
    assert_eq!(config.hand.handedness, Handedness::Right);
    assert_eq!(config.hand.smoothing, SmoothingType::Robust);
}

#[test]
fn test_config_errors() {
    assert!(matches!(
        Config::from_file(temp_path("does_not_exist.yaml")),
        Err(Error::Io(_))
    ));

    let path = temp_path("broken.yaml");
    std::fs::write(&path, "hand: [not, a, map").unwrap();
    let result = Config::from_file(&path);
    std::fs::remove_file(&path).ok();
    assert!(matches!(result, Err(Error::ConfigError(_))));

    let path = temp_path("unknown_hand.yaml");
    std::fs::write(&path, "hand:\n  handedness: both\n").unwrap();
    let result = Config::from_file(&path);
    std::fs::remove_file(&path).ok();
    assert!(matches!(result, Err(Error::ConfigError(_))));
}

#[test]
fn test_create_transform_applies_yaw_and_translation() {
    let mut config = Config::default();
    config.playspace.translation = [0.0, 1.0, 0.0];
    config.playspace.yaw_degrees = 90.0;

    let moved = config.create_transform().transform_point(&Vector3::new(0.0, 0.0, 1.0));
    assert_vec_close(&moved, &Vector3::new(1.0, 1.0, 0.0), 1e-5);
}

#[test]
fn test_recording_file_round_trip() {
    let mut occluded = right_hand_sample(1.0 + FRAME_TIME);
    occluded.validity_mask.set(17, false);
    let recording = Recording {
        frames: vec![
            RecordedFrame {
                sample: right_hand_sample(1.0),
                viewpoint: front_viewpoint(),
            },
            RecordedFrame {
                sample: occluded,
                viewpoint: front_viewpoint(),
            },
        ],
    };

    let path = temp_path("recording.yaml");
    recording.to_file(&path).unwrap();
    let loaded = Recording::from_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded.len(), 2);
    assert!(!loaded.frames[1].sample.validity_mask.is_valid(17));
    assert_eq!(loaded, recording);
}

#[test]
fn test_recording_without_viewpoint_uses_default() {
    let yaml = r"
frames:
  - sample:
      timestamp: 0.5
      confidence: 0.0
      finger_bones: null
";
    let path = temp_path("minimal.yaml");
    std::fs::write(&path, yaml).unwrap();
    let loaded = Recording::from_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded.len(), 1);
    assert!(!loaded.frames[0].sample.is_tracking());
    assert_eq!(loaded.frames[0].viewpoint, hand_pose_estimation::transform::Viewpoint::default());
}
