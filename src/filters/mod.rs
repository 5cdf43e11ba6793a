//! Signal filtering algorithms for smoothing tracked joint samples.
//!
//! Filters operate on fixed-width numeric samples (positions, rotations or any
//! other vector of channels) and report whether a value was actually smoothed or
//! handed back unchanged after invalid input.

/// Adaptive one-euro low-pass filter
pub mod one_euro;

use crate::constants::{DEFAULT_DERIVATIVE_CUTOFF, DEFAULT_ROBUST_BETA, DEFAULT_ROBUST_MIN_CUTOFF};
use crate::{Error, Result};

/// Result of filtering one sample
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOutput {
    /// The filter was applied
    Smoothed(Vec<f32>),
    /// The filter was bypassed and the raw sample is returned
    PassThrough(Vec<f32>),
}

impl FilterOutput {
    /// The output values regardless of variant
    #[must_use]
    pub fn value(&self) -> &[f32] {
        match self {
            Self::Smoothed(v) | Self::PassThrough(v) => v,
        }
    }

    /// Consume the output, returning its values
    #[must_use]
    pub fn into_value(self) -> Vec<f32> {
        match self {
            Self::Smoothed(v) | Self::PassThrough(v) => v,
        }
    }

    /// Whether the filter was applied
    #[must_use]
    pub fn is_smoothed(&self) -> bool {
        matches!(self, Self::Smoothed(_))
    }
}

/// Trait for all sample filters
pub trait SampleFilter: Send + Sync {
    /// Filter one sample taken at `timestamp` seconds
    fn filter(&mut self, timestamp: f32, sample: &[f32]) -> FilterOutput;

    /// Reset filter state
    fn reset(&mut self);

    /// Get filter name
    fn name(&self) -> &str;
}

/// No-op filter that passes through values unchanged
pub struct NoFilter;

impl SampleFilter for NoFilter {
    fn filter(&mut self, _timestamp: f32, sample: &[f32]) -> FilterOutput {
        FilterOutput::PassThrough(sample.to_vec())
    }

    fn reset(&mut self) {}

    fn name(&self) -> &str {
        "NoFilter"
    }
}

/// Create a filter over `order` channels from a textual description.
///
/// Accepted forms are `none`, `euro` (default tunables) and
/// `euro:<min_cutoff>:<beta>:<derivative_cutoff>`.
///
/// # Errors
///
/// Returns an error for unknown filter names and malformed or invalid parameters.
pub fn create_filter(spec: &str, order: usize) -> Result<Box<dyn SampleFilter>> {
    let lowered = spec.to_lowercase();
    let mut parts = lowered.split(':');
    let name = parts.next().unwrap_or_default();
    let params = parts
        .map(|p| {
            p.parse::<f32>()
                .map_err(|_| Error::FilterError(format!("Invalid filter parameter '{p}' in '{spec}'")))
        })
        .collect::<Result<Vec<f32>>>()?;

    match (name, params.as_slice()) {
        ("none" | "nofilter", []) => Ok(Box::new(NoFilter)),
        ("euro" | "one_euro" | "oneeuro", []) => Ok(Box::new(one_euro::EuroFilter::new(
            order,
            DEFAULT_ROBUST_MIN_CUTOFF,
            DEFAULT_ROBUST_BETA,
            DEFAULT_DERIVATIVE_CUTOFF,
        ))),
        ("euro" | "one_euro" | "oneeuro", &[min_cutoff, beta, derivative_cutoff]) => {
            if min_cutoff <= 0.0 || derivative_cutoff <= 0.0 {
                return Err(Error::FilterError(format!(
                    "Cutoff frequencies must be positive in '{spec}'"
                )));
            }
            let filter = one_euro::EuroFilter::with_channels(
                vec![min_cutoff; order],
                vec![beta; order],
                vec![derivative_cutoff; order],
            )?;
            Ok(Box::new(filter))
        }
        ("euro" | "one_euro" | "oneeuro", _) => Err(Error::FilterError(format!(
            "Expected euro:<min_cutoff>:<beta>:<derivative_cutoff>, got '{spec}'"
        ))),
        _ => Err(Error::FilterError(format!("Unknown filter type: {spec}"))),
    }
}
