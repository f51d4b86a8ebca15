use crate::error::Result;
use crate::geometry::CatenaryCurve;
use crate::solver::SolveState;

use super::{Polyline, TessellationParams};

/// Points probed along the curve when estimating its maximum curvature.
const CURVATURE_PROBES: usize = 32;

/// Samples a catenary curve into a polyline at uniform arc-length steps.
///
/// The step is chosen from the largest curvature `κ` found along the curve
/// so that the sagitta `κ·h²/8` of every segment stays within the
/// tolerance. The lowest point of a vertically hanging chain is always
/// included as a vertex.
pub struct TessellateCatenary<'a, const N: usize, const D: usize> {
    curve: &'a CatenaryCurve<N, D>,
    params: TessellationParams,
}

impl<'a, const N: usize, const D: usize> TessellateCatenary<'a, N, D> {
    /// Creates a new `TessellateCatenary` operation.
    #[must_use]
    pub fn new(curve: &'a CatenaryCurve<N, D>, params: TessellationParams) -> Self {
        Self { curve, params }
    }

    /// Executes the tessellation, returning a polyline from the start point
    /// to the end point.
    ///
    /// # Errors
    ///
    /// Returns an error if the tessellation parameters are invalid.
    pub fn execute(&self) -> Result<Polyline<N>> {
        self.params.validate()?;
        let length = self.curve.arc_length();
        let segments = self.segment_count(length);

        #[allow(clippy::cast_precision_loss)]
        let mut stations: Vec<f64> = (0..=segments)
            .map(|i| length * i as f64 / segments as f64)
            .collect();
        if let Some(turn) = self.curve.turning_arc_length() {
            if turn > 0.0 && turn < length {
                let at = stations.partition_point(|&s| s < turn);
                if (stations[at] - turn).abs() > f64::EPSILON * length {
                    stations.insert(at, turn);
                }
            }
        }

        Ok(Polyline {
            points: stations.iter().map(|&s| self.curve.position(s)).collect(),
        })
    }

    fn segment_count(&self, length: f64) -> usize {
        let curvature = self.max_curvature(length);
        if curvature <= 0.0 {
            return self.params.min_segments;
        }
        let step = (8.0 * self.params.tolerance / curvature).sqrt();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let wanted = (length / step).ceil() as usize;
        wanted.clamp(self.params.min_segments, self.params.max_segments)
    }

    fn max_curvature(&self, length: f64) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let probes = (0..=CURVATURE_PROBES).map(|i| length * i as f64 / CURVATURE_PROBES as f64);
        // The apex of a catenary carries its largest curvature.
        let apex = match self.curve.solve_state() {
            SolveState::Catenary(params) => Some(-params.arc_length_offset),
            _ => None,
        }
        .filter(|s| (0.0..=length).contains(s));

        probes
            .chain(apex)
            .map(|s| self.curve.derivative(s, 2).norm())
            .filter(|k| k.is_finite())
            .fold(0.0, f64::max)
    }
}
