//! Replays recorded hand-tracking sessions through the pose reconstruction pipeline.

use anyhow::{Context, Result};
use clap::Parser;
use hand_pose_estimation::{
    config::Config,
    hand_provider::HandJointProvider,
    joint_smoother::SmoothingType,
    joints::{CanonicalJoint, Handedness},
    recording::Recording,
};
use log::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Recorded session to replay (YAML format)
    #[arg(short, long)]
    input: String,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,

    /// Tracked hand (left, right); overrides the configuration
    #[arg(long)]
    handedness: Option<Handedness>,

    /// Joint smoothing (none, fixed, robust); overrides the configuration
    #[arg(short, long)]
    smoothing: Option<SmoothingType>,

    /// Print every stored joint, not just the palm
    #[arg(short, long)]
    joints: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    let config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path);
        match Config::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!("Failed to load config file: {}. Using defaults.", e);
                Config::default()
            }
        }
    } else {
        Config::default()
    };
    config.validate().context("Invalid configuration")?;

    let handedness = args.handedness.unwrap_or(config.hand.handedness);
    let smoothing = args.smoothing.unwrap_or(config.hand.smoothing);

    let recording =
        Recording::from_file(&args.input).with_context(|| format!("Failed to load recording {}", args.input))?;
    info!(
        "Replaying {} frames for the {handedness:?} hand with {smoothing} smoothing",
        recording.len()
    );

    let mut provider = HandJointProvider::new(handedness, config.create_transform(), config.smoothing.clone())?;

    for (index, frame) in recording.frames.iter().enumerate() {
        provider.update_hand_joints(&frame.sample, &frame.viewpoint, smoothing);

        let palm = provider
            .joint_pose(CanonicalJoint::Palm)
            .filter(|_| provider.is_rotation_available());
        match palm {
            Some(pose) => {
                let forward = pose.forward();
                println!(
                    "frame {index:>5} t={:.3} position={} rotation={} palm=({:.4}, {:.4}, {:.4}) forward=({:.3}, {:.3}, {:.3})",
                    frame.sample.timestamp,
                    provider.is_position_available(),
                    provider.is_rotation_available(),
                    pose.position.x,
                    pose.position.y,
                    pose.position.z,
                    forward.x,
                    forward.y,
                    forward.z,
                );
            }
            None => println!(
                "frame {index:>5} t={:.3} position={} rotation={}",
                frame.sample.timestamp,
                provider.is_position_available(),
                provider.is_rotation_available(),
            ),
        }

        if args.joints {
            for joint in CanonicalJoint::ALL {
                if let Some(pose) = provider.joint_pose(joint) {
                    println!(
                        "    {joint:<16} ({:.4}, {:.4}, {:.4}) oriented={}",
                        pose.position.x, pose.position.y, pose.position.z, pose.has_orientation
                    );
                }
            }
        }
    }

    Ok(())
}
