//! Utility functions for geometry and numeric sample checks.

pub mod geometry;

/// True when every value is neither NaN nor infinite
#[must_use]
pub fn all_finite(values: &[f32]) -> bool {
    values.iter().all(|v| v.is_finite())
}

/// True when every value is exactly zero
#[must_use]
pub fn all_zero(values: &[f32]) -> bool {
    values.iter().all(|&v| v == 0.0)
}
