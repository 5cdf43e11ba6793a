//! One-euro filter: a low-pass filter whose cutoff rises with the signal's speed.
//!
//! Slow movement is smoothed hard to remove jitter, fast movement is followed
//! closely to keep lag down. Invalid input resets the state and passes through.

use super::{FilterOutput, SampleFilter};
use crate::utils::{all_finite, all_zero};
use crate::{Error, Result};
use nalgebra::{Quaternion, UnitQuaternion, Vector3};

/// alpha = 1 / (1 + tau/Te), tau = 1/(2*pi*fc)
fn smoothing_factor(delta_time: f32, cutoff: f32) -> f32 {
    let r = 2.0 * std::f32::consts::PI * cutoff * delta_time;
    r / (r + 1.0)
}

fn exponential_smoothing(alpha: f32, value: f32, previous: f32) -> f32 {
    alpha.mul_add(value - previous, previous)
}

/// Adaptive low-pass ("one euro") filter over an N-channel sample.
///
/// Fast motion raises the cutoff so the output lags less; slow motion lowers it
/// towards `min_cutoff` to suppress jitter. Invalid input never produces an
/// error: the filter resets and hands the raw sample back as
/// [`FilterOutput::PassThrough`].
#[derive(Debug, Clone)]
pub struct EuroFilter {
    order: usize,
    min_cutoff: Vec<f32>,
    beta: Vec<f32>,
    derivative_cutoff: Vec<f32>,
    reset_on_zero: bool,

    delta_time: f32,
    previous_value: Vec<f32>,
    previous_derivative: Vec<f32>,
    previous_timestamp: f32,
    initialized: bool,
}

impl EuroFilter {
    /// Create a filter broadcasting the same tunables to every channel.
    ///
    /// Reset-on-zero is enabled; use [`EuroFilter::with_reset_on_zero`] to change it.
    #[must_use]
    pub fn new(order: usize, min_cutoff: f32, beta: f32, derivative_cutoff: f32) -> Self {
        Self {
            order,
            min_cutoff: vec![min_cutoff; order],
            beta: vec![beta; order],
            derivative_cutoff: vec![derivative_cutoff; order],
            reset_on_zero: true,
            delta_time: 0.0,
            previous_value: vec![0.0; order],
            previous_derivative: vec![0.0; order],
            previous_timestamp: 0.0,
            initialized: false,
        }
    }

    /// Create a filter with per-channel tunables.
    ///
    /// # Errors
    ///
    /// Returns an error if the three arrays differ in length or contain
    /// non-finite or negative values.
    pub fn with_channels(min_cutoff: Vec<f32>, beta: Vec<f32>, derivative_cutoff: Vec<f32>) -> Result<Self> {
        let order = min_cutoff.len();
        validate_tunables(order, &min_cutoff, &beta, &derivative_cutoff)?;
        let mut filter = Self::new(order, 0.0, 0.0, 0.0);
        filter.min_cutoff = min_cutoff;
        filter.beta = beta;
        filter.derivative_cutoff = derivative_cutoff;
        Ok(filter)
    }

    /// Enable or disable resetting on an all-zero sample
    #[must_use]
    pub fn with_reset_on_zero(mut self, enabled: bool) -> Self {
        self.reset_on_zero = enabled;
        self
    }

    /// Replace the tunables.
    ///
    /// Filter state is kept unless `order` changes the channel count, in which case
    /// the state buffers are reallocated and the filter starts over.
    ///
    /// # Errors
    ///
    /// Returns an error if any array length differs from `order` or a value is
    /// non-finite or negative.
    pub fn update_configuration(
        &mut self,
        order: usize,
        min_cutoff: &[f32],
        beta: &[f32],
        derivative_cutoff: &[f32],
    ) -> Result<()> {
        validate_tunables(order, min_cutoff, beta, derivative_cutoff)?;

        if order != self.order {
            self.order = order;
            self.reset();
        }

        self.min_cutoff = min_cutoff.to_vec();
        self.beta = beta.to_vec();
        self.derivative_cutoff = derivative_cutoff.to_vec();
        Ok(())
    }

    /// Replace the tunables, broadcasting scalars to `order` channels.
    ///
    /// # Errors
    ///
    /// Returns an error if a value is non-finite or negative.
    pub fn update_uniform(&mut self, order: usize, min_cutoff: f32, beta: f32, derivative_cutoff: f32) -> Result<()> {
        self.update_configuration(
            order,
            &vec![min_cutoff; order],
            &vec![beta; order],
            &vec![derivative_cutoff; order],
        )
    }

    /// Number of channels
    #[must_use]
    pub fn order(&self) -> usize {
        self.order
    }

    /// Whether a valid sample has seeded the state since the last reset
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Clear all per-channel state; tunables are kept
    pub fn reset(&mut self) {
        self.initialized = false;
        self.previous_value = vec![0.0; self.order];
        self.previous_derivative = vec![0.0; self.order];
        self.previous_timestamp = 0.0;
    }

    /// Smooth one sample taken at `timestamp` (seconds).
    pub fn filter(&mut self, timestamp: f32, sample: &[f32]) -> FilterOutput {
        if sample.len() != self.order || (self.reset_on_zero && all_zero(sample)) || !all_finite(sample) {
            self.reset();
            return FilterOutput::PassThrough(sample.to_vec());
        }

        if self.previous_timestamp != 0.0 && timestamp != 0.0 {
            self.delta_time = timestamp - self.previous_timestamp;
        }

        if !self.initialized {
            // alpha * x + (1 - alpha) * x: the seed call returns the sample itself
            self.previous_value.copy_from_slice(sample);
            self.previous_derivative.iter_mut().for_each(|d| *d = 0.0);
            self.previous_timestamp = timestamp;
            self.initialized = true;
            return FilterOutput::Smoothed(sample.to_vec());
        }

        let mut result = vec![0.0; self.order];
        let mut derivative = vec![0.0; self.order];
        for i in 0..self.order {
            let delta = (sample[i] - self.previous_value[i]) / self.delta_time;
            let dx_hat = exponential_smoothing(
                smoothing_factor(self.delta_time, self.derivative_cutoff[i]),
                delta,
                self.previous_derivative[i],
            );

            let cutoff = self.beta[i].mul_add(dx_hat.abs(), self.min_cutoff[i]);
            result[i] = exponential_smoothing(
                smoothing_factor(self.delta_time, cutoff),
                sample[i],
                self.previous_value[i],
            );
            derivative[i] = dx_hat;
        }

        if !all_finite(&result) {
            self.reset();
            return FilterOutput::PassThrough(sample.to_vec());
        }

        self.previous_value = result.clone();
        self.previous_derivative = derivative;
        self.previous_timestamp = timestamp;
        FilterOutput::Smoothed(result)
    }

    /// Smooth a 3-D vector; the filter must have an order of 3
    pub fn filter_vector(&mut self, timestamp: f32, vector: &Vector3<f32>) -> Vector3<f32> {
        match self.filter(timestamp, vector.as_slice()) {
            FilterOutput::Smoothed(v) if v.len() == 3 => Vector3::new(v[0], v[1], v[2]),
            _ => *vector,
        }
    }

    /// Smooth a rotation component-wise and re-normalize; the filter must have an order of 4
    pub fn filter_rotation(&mut self, timestamp: f32, rotation: &UnitQuaternion<f32>) -> UnitQuaternion<f32> {
        let coords = rotation.coords;
        match self.filter(timestamp, coords.as_slice()) {
            FilterOutput::Smoothed(v) if v.len() == 4 => {
                let smoothed = Quaternion::new(v[3], v[0], v[1], v[2]);
                UnitQuaternion::try_new(smoothed, crate::constants::EPSILON).unwrap_or(*rotation)
            }
            _ => *rotation,
        }
    }
}

impl SampleFilter for EuroFilter {
    fn filter(&mut self, timestamp: f32, sample: &[f32]) -> FilterOutput {
        Self::filter(self, timestamp, sample)
    }

    fn reset(&mut self) {
        Self::reset(self);
    }

    fn name(&self) -> &str {
        "EuroFilter"
    }
}

fn validate_tunables(order: usize, min_cutoff: &[f32], beta: &[f32], derivative_cutoff: &[f32]) -> Result<()> {
    if min_cutoff.len() != order || beta.len() != order || derivative_cutoff.len() != order {
        return Err(Error::FilterError(format!(
            "Expected {order} values per tunable, got {}/{}/{}",
            min_cutoff.len(),
            beta.len(),
            derivative_cutoff.len()
        )));
    }

    let valid = |v: &f32| v.is_finite() && *v >= 0.0;
    if !min_cutoff.iter().all(valid) || !beta.iter().all(valid) || !derivative_cutoff.iter().all(valid) {
        return Err(Error::FilterError(
            "Cutoffs and beta must be finite and non-negative".to_string(),
        ));
    }

    Ok(())
}
