use nalgebra::{Point, SVector};

use crate::math::basis::{orthogonal_complement_axis, reject};
use crate::math::TOLERANCE;

/// An orthonormal frame of `D` axes embedded in `N`-dimensional space,
/// oriented so that a target point lies in the span of its first two axes.
///
/// Axis layout matches the local frame of
/// [`CatenaryToPoint`](crate::solver::CatenaryToPoint):
///
/// * axis 0 is horizontal and points from the origin towards the target,
/// * axis 1 is the up axis (opposite to gravity),
/// * axes 2.. complete the frame orthogonally.
///
/// The target's horizontal offset is projected onto the plane orthogonal
/// to the up axis and normalized, so no iteration is involved. When the
/// target lies on the up axis any horizontal direction is used.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneEmbedding<const N: usize, const D: usize> {
    origin: Point<f64, N>,
    axes: [SVector<f64, N>; D],
}

impl<const N: usize, const D: usize> PlaneEmbedding<N, D> {
    const FITS: () = assert!(
        2 <= D && D <= N,
        "frame needs at least two axes and no more than the ambient dimension"
    );

    /// Builds the frame at `origin` with the unit vector `up` as axis 1,
    /// rotated about `up` until `target` lies in the plane of axes 0 and 1.
    #[must_use]
    pub fn new(origin: Point<f64, N>, up: &SVector<f64, N>, target: &Point<f64, N>) -> Self {
        let () = Self::FITS;
        let mut axes = [SVector::<f64, N>::zeros(); D];
        axes[1] = *up;
        axes[0] = reject(&(target - origin), &[*up])
            .try_normalize(TOLERANCE)
            .or_else(|| orthogonal_complement_axis(&[*up]))
            .unwrap_or_else(SVector::zeros);
        for k in 2..D {
            if let Some(axis) = orthogonal_complement_axis(&axes[..k]) {
                axes[k] = axis;
            }
        }
        Self { origin, axes }
    }

    /// Returns the frame origin.
    #[must_use]
    pub fn origin(&self) -> &Point<f64, N> {
        &self.origin
    }

    /// Returns the frame axes.
    #[must_use]
    pub fn axes(&self) -> &[SVector<f64, N>; D] {
        &self.axes
    }

    /// Returns the horizontal axis pointing towards the target.
    #[must_use]
    pub fn in_plane_axis(&self) -> &SVector<f64, N> {
        &self.axes[0]
    }

    /// Returns the up axis.
    #[must_use]
    pub fn up_axis(&self) -> &SVector<f64, N> {
        &self.axes[1]
    }

    /// Coordinates of a world point in this frame.
    #[must_use]
    pub fn to_local_point(&self, p: &Point<f64, N>) -> SVector<f64, D> {
        self.to_local_vector(&(p - self.origin))
    }

    /// Components of a world vector along the frame axes.
    #[must_use]
    pub fn to_local_vector(&self, v: &SVector<f64, N>) -> SVector<f64, D> {
        SVector::from_fn(|i, _| self.axes[i].dot(v))
    }

    /// World point at the given frame coordinates.
    #[must_use]
    pub fn to_world_point(&self, local: &SVector<f64, D>) -> Point<f64, N> {
        self.origin + self.to_world_vector(local)
    }

    /// World vector with the given components along the frame axes.
    #[must_use]
    pub fn to_world_vector(&self, local: &SVector<f64, D>) -> SVector<f64, N> {
        self.axes
            .iter()
            .zip(local.iter())
            .fold(SVector::zeros(), |acc, (axis, &c)| acc + axis * c)
    }
}
