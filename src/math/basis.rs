//! Orthogonalization helpers for building local frames in any dimension.

use nalgebra::SVector;

use super::TOLERANCE;

/// Removes from `v` its components along each of the orthonormal `axes`.
#[must_use]
pub fn reject<const N: usize>(v: &SVector<f64, N>, axes: &[SVector<f64, N>]) -> SVector<f64, N> {
    axes.iter().fold(*v, |acc, axis| acc - axis * axis.dot(&acc))
}

/// Returns a unit vector orthogonal to every one of the orthonormal `axes`.
///
/// Each standard basis direction is orthogonalized against `axes` and the
/// one with the largest remainder wins, so the result never comes from a
/// direction nearly parallel to the span. Returns `None` when `axes`
/// already spans the whole space.
#[must_use]
pub fn orthogonal_complement_axis<const N: usize>(
    axes: &[SVector<f64, N>],
) -> Option<SVector<f64, N>> {
    (0..N)
        .map(|i| {
            let mut direction = SVector::<f64, N>::zeros();
            direction[i] = 1.0;
            reject(&direction, axes)
        })
        .max_by(|a, b| a.norm_squared().total_cmp(&b.norm_squared()))
        .and_then(|v| v.try_normalize(TOLERANCE))
}
