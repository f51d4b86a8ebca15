mod tessellate_curve;

pub use tessellate_curve::TessellateCatenary;

use nalgebra::Point;

use crate::error::{Result, TessellationError};

/// Parameters controlling tessellation quality.
#[derive(Debug, Clone, Copy)]
pub struct TessellationParams {
    /// Maximum allowed deviation from the true geometry.
    pub tolerance: f64,
    /// Minimum number of segments for curves.
    pub min_segments: usize,
    /// Maximum number of segments for curves.
    pub max_segments: usize,
}

impl TessellationParams {
    /// Checks that the parameters describe a usable sampling.
    ///
    /// # Errors
    ///
    /// Returns an error if the tolerance is not positive, `min_segments` is
    /// zero, or `min_segments` exceeds `max_segments`.
    pub fn validate(&self) -> Result<()> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(TessellationError::InvalidParameters(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            ))
            .into());
        }
        if self.min_segments == 0 {
            return Err(TessellationError::InvalidParameters(
                "min_segments must be at least 1".to_owned(),
            )
            .into());
        }
        if self.min_segments > self.max_segments {
            return Err(TessellationError::InvalidParameters(format!(
                "min_segments ({}) exceeds max_segments ({})",
                self.min_segments, self.max_segments
            ))
            .into());
        }
        Ok(())
    }
}

impl Default for TessellationParams {
    fn default() -> Self {
        Self {
            tolerance: 0.01,
            min_segments: 4,
            max_segments: 256,
        }
    }
}

/// A polyline approximation of a curve.
#[derive(Debug, Clone, Default)]
pub struct Polyline<const N: usize> {
    /// The ordered vertices of the polyline.
    pub points: Vec<Point<f64, N>>,
}

impl<const N: usize> Polyline<N> {
    /// Number of segments between consecutive vertices.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// Sum of the segment lengths.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).norm())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Point2;

    #[test]
    fn default_params_are_valid() {
        assert!(TessellationParams::default().validate().is_ok());
    }

    #[test]
    fn rejects_bad_params() {
        let base = TessellationParams::default();
        for params in [
            TessellationParams { tolerance: 0.0, ..base },
            TessellationParams { tolerance: f64::NAN, ..base },
            TessellationParams { min_segments: 0, ..base },
            TessellationParams { min_segments: 10, max_segments: 5, ..base },
        ] {
            assert!(params.validate().is_err());
        }
    }

    #[test]
    fn polyline_length_sums_segments() {
        let line = Polyline {
            points: vec![Point2::new(0.0, 0.0), Point2::new(3.0, 4.0), Point2::new(3.0, 5.0)],
        };
        assert_eq!(line.segment_count(), 2);
        assert!((line.length() - 6.0).abs() < 1e-12);
        assert_eq!(Polyline::<2>::default().segment_count(), 0);
    }
}
