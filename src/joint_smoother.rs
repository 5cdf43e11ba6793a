//! Per-joint position smoothing.

use crate::config::SmoothingConfig;
use crate::constants::POSITION_CHANNELS;
use crate::filters::one_euro::EuroFilter;
use crate::filters::{FilterOutput, NoFilter, SampleFilter};
use crate::joints::{CanonicalJoint, JointPoseMap};
use crate::{Error, Result};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// How joint positions are smoothed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmoothingType {
    /// Raw positions
    None,
    /// Constant cutoff
    Fixed,
    /// Speed-adaptive cutoff
    #[default]
    Robust,
}

impl FromStr for SmoothingType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "none" | "off" => Ok(Self::None),
            "fixed" => Ok(Self::Fixed),
            "robust" | "adaptive" => Ok(Self::Robust),
            _ => Err(Error::InvalidInput(format!("Unknown smoothing type: {s}"))),
        }
    }
}

impl fmt::Display for SmoothingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Fixed => "fixed",
            Self::Robust => "robust",
        };
        f.write_str(name)
    }
}

/// Bank of 3-channel filters, one per stored joint, created on first use
pub struct JointSmoother {
    config: SmoothingConfig,
    active: Option<SmoothingType>,
    filters: HashMap<CanonicalJoint, Box<dyn SampleFilter>>,
}

impl JointSmoother {
    /// Create an empty smoother
    #[must_use]
    pub fn new(config: SmoothingConfig) -> Self {
        Self {
            config,
            active: None,
            filters: HashMap::new(),
        }
    }

    /// Smoothing type the current filters were built for
    #[must_use]
    pub fn active_type(&self) -> Option<SmoothingType> {
        self.active
    }

    /// Number of live joint filters
    #[must_use]
    pub fn filter_count(&self) -> usize {
        self.filters.len()
    }

    /// Drop every joint filter
    pub fn reset(&mut self) {
        self.filters.clear();
        self.active = None;
    }

    /// Smooth every stored joint position in place.
    ///
    /// Switching `smoothing` discards all existing filter state. A filter that
    /// rejects its input leaves the raw position untouched.
    pub fn smooth_joints(&mut self, timestamp: f32, poses: &mut JointPoseMap, smoothing: SmoothingType) {
        if self.active != Some(smoothing) {
            if let Some(previous) = self.active {
                log::debug!("Smoothing switched from {previous} to {smoothing}");
            }
            self.filters.clear();
            self.active = Some(smoothing);
        }

        let config = &self.config;
        for (joint, pose) in poses.iter_mut() {
            let filter = self
                .filters
                .entry(*joint)
                .or_insert_with(|| build_filter(smoothing, config));

            match filter.filter(timestamp, pose.position.as_slice()) {
                FilterOutput::Smoothed(v) if v.len() == POSITION_CHANNELS => {
                    pose.position = Vector3::new(v[0], v[1], v[2]);
                }
                FilterOutput::Smoothed(_) => {}
                FilterOutput::PassThrough(_) => {
                    log::trace!("{joint} filter bypassed");
                }
            }
        }
    }
}

impl fmt::Debug for JointSmoother {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JointSmoother")
            .field("active", &self.active)
            .field("filters", &self.filters.len())
            .finish_non_exhaustive()
    }
}

fn build_filter(smoothing: SmoothingType, config: &SmoothingConfig) -> Box<dyn SampleFilter> {
    match smoothing {
        SmoothingType::None => Box::new(NoFilter),
        SmoothingType::Fixed => Box::new(
            EuroFilter::new(
                POSITION_CHANNELS,
                config.fixed.min_cutoff,
                0.0,
                config.fixed.derivative_cutoff,
            )
            .with_reset_on_zero(config.reset_on_zero),
        ),
        SmoothingType::Robust => Box::new(
            EuroFilter::new(
                POSITION_CHANNELS,
                config.robust.min_cutoff,
                config.robust.beta,
                config.robust.derivative_cutoff,
            )
            .with_reset_on_zero(config.reset_on_zero),
        ),
    }
}
