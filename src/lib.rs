//! Hand pose estimation library for sparse, occluded hand-tracking samples.
//!
//! Hand trackers report noisy finger keypoints with per-keypoint trust flags,
//! a wrist center and a grip position, but no palm pose and no bone
//! orientations. This library turns such a stream into a complete, smoothed
//! skeletal pose:
//!
//! 1. Trusted keypoints are mapped onto canonical joints
//! 2. Every stored joint position is smoothed with a one-euro filter
//! 3. The palm pose is reconstructed from five joints and the viewpoint
//! 4. The wrist inherits the palm orientation
//! 5. Finger bone orientations are derived from adjacent joints
//!
//! # Examples
//!
//! ## Tracking a hand
//!
//! ```no_run
//! use hand_pose_estimation::{
//!     config::SmoothingConfig,
//!     hand_provider::HandJointProvider,
//!     joint_smoother::SmoothingType,
//!     joints::{CanonicalJoint, Handedness},
//!     recording::Recording,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let recording = Recording::from_file("session.yaml")?;
//! let mut provider = HandJointProvider::with_identity(Handedness::Right, SmoothingConfig::default())?;
//!
//! for frame in &recording.frames {
//!     provider.update_hand_joints(&frame.sample, &frame.viewpoint, SmoothingType::Robust);
//!     if provider.is_rotation_available() {
//!         if let Some(palm) = provider.joint_pose(CanonicalJoint::Palm) {
//!             println!("Palm at {:?}", palm.position);
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Using Filters
//!
//! ```
//! use hand_pose_estimation::filters::{create_filter, FilterOutput};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut filter = create_filter("euro:1.0:0.5:1.0", 3)?;
//!
//! filter.filter(1.0, &[0.0, 1.0, 2.0]);
//! match filter.filter(1.0 + 1.0 / 60.0, &[0.1, 1.1, 2.1]) {
//!     FilterOutput::Smoothed(value) => println!("Smoothed: {value:?}"),
//!     FilterOutput::PassThrough(value) => println!("Bypassed: {value:?}"),
//! }
//!
//! filter.reset();
//! # Ok(())
//! # }
//! ```

/// Signal filtering algorithms for smoothing joint samples
pub mod filters;

/// Canonical joints, poses and the joint pose store
pub mod joints;

/// Device finger layout and raw-to-canonical joint mapping
pub mod skeleton;

/// Coordinate transforms and the observer viewpoint
pub mod transform;

/// Per-joint position smoothing
pub mod joint_smoother;

/// Palm and wrist pose reconstruction
pub mod palm;

/// Finger bone orientation derivation
pub mod finger_rotation;

/// Per-hand tracking session
pub mod hand_provider;

/// Recorded sessions for offline replay
pub mod recording;

/// Geometry helpers and numeric sample checks
pub mod utils;

/// Error types and result handling
pub mod error;

/// Constants used throughout the library
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
