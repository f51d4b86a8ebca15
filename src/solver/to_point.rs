use std::cell::Cell;

use nalgebra::SVector;
use tracing::debug;

use crate::error::Result;
use crate::math::catenary::{self, ScalarCatenaryParams};
use crate::math::{ensure_arc_length, ensure_finite_vector, TOLERANCE};

use super::root::{bisect, bracket_decreasing};
use super::{CatenaryParams, Classification, SolveState, SolverSettings};

/// Index of the vertical ("up") component in the local frame.
const VERTICAL: usize = 1;

/// Solves for the catenary of a given arc length hanging from the local
/// origin to a target point `P`.
///
/// Component `y` of the local frame points up, against gravity; every other
/// component is horizontal. The curve is evaluated by arc length measured
/// from the origin, so `evaluate(0, 0)` is the origin and
/// `evaluate(arc_length, 0)` is `P`.
///
/// Solving is lazy and memoized: the first evaluation classifies the
/// configuration and caches the result until the target or arc length
/// changes. The cache uses a [`Cell`], so a solver cannot be shared
/// between threads.
#[derive(Debug, Clone)]
pub struct CatenaryToPoint<const D: usize> {
    target: SVector<f64, D>,
    arc_length: f64,
    settings: SolverSettings,
    state: Cell<SolveState>,
}

/// Solver for targets in a 2D local frame.
pub type CatenaryToPoint2 = CatenaryToPoint<2>;

/// Solver for targets in a 3D local frame.
pub type CatenaryToPoint3 = CatenaryToPoint<3>;

impl<const D: usize> CatenaryToPoint<D> {
    const HAS_VERTICAL_AXIS: () =
        assert!(D >= 2, "local frame needs a horizontal and a vertical axis");

    /// Creates a solver for `target` (relative to the local origin) and a
    /// total `arc_length`, with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if `target` has non-finite components or
    /// `arc_length` is not a positive finite number. An arc length shorter
    /// than `|target|` is accepted and solved as a line segment.
    pub fn new(target: SVector<f64, D>, arc_length: f64) -> Result<Self> {
        let () = Self::HAS_VERTICAL_AXIS;
        ensure_finite_vector("target", &target)?;
        let arc_length = ensure_arc_length(arc_length)?;
        Ok(Self {
            target,
            arc_length,
            settings: SolverSettings::default(),
            state: Cell::new(SolveState::Unknown),
        })
    }

    /// Replaces the solver settings.
    #[must_use]
    pub fn with_settings(mut self, settings: SolverSettings) -> Self {
        self.set_settings(settings);
        self
    }

    /// Returns the target point relative to the local origin.
    #[must_use]
    pub fn target(&self) -> &SVector<f64, D> {
        &self.target
    }

    /// Returns the total arc length.
    #[must_use]
    pub fn arc_length(&self) -> f64 {
        self.arc_length
    }

    /// Returns the solver settings.
    #[must_use]
    pub fn settings(&self) -> &SolverSettings {
        &self.settings
    }

    /// Moves the target. Invalidates the cached solution if it changed.
    ///
    /// # Errors
    ///
    /// Returns an error if `target` has non-finite components.
    pub fn set_target(&mut self, target: SVector<f64, D>) -> Result<()> {
        ensure_finite_vector("target", &target)?;
        self.retarget(target);
        Ok(())
    }

    /// Changes the arc length. Invalidates the cached solution if it changed.
    ///
    /// # Errors
    ///
    /// Returns an error if `arc_length` is not a positive finite number.
    #[allow(clippy::float_cmp)]
    pub fn set_arc_length(&mut self, arc_length: f64) -> Result<()> {
        let arc_length = ensure_arc_length(arc_length)?;
        if arc_length != self.arc_length {
            self.arc_length = arc_length;
            self.invalidate();
        }
        Ok(())
    }

    /// Replaces the settings. Invalidates the cached solution if they changed.
    pub fn set_settings(&mut self, settings: SolverSettings) {
        if settings != self.settings {
            self.settings = settings;
            self.invalidate();
        }
    }

    /// Returns the cached state without solving.
    #[must_use]
    pub fn state(&self) -> SolveState {
        self.state.get()
    }

    /// Classifies the configuration and caches the result. Does nothing if
    /// already solved.
    pub fn solve(&self) -> SolveState {
        if let SolveState::Unknown = self.state.get() {
            self.state.set(self.classify());
        }
        self.state.get()
    }

    /// Solves if needed and reports which shape the curve takes.
    #[must_use]
    pub fn classification(&self) -> Classification {
        match self.solve() {
            SolveState::Unknown => unreachable!("solve() always classifies the configuration"),
            SolveState::Catenary(_) => Classification::Catenary,
            SolveState::LineSegment => Classification::LineSegment,
            SolveState::LinearVertical => Classification::LinearVertical,
        }
    }

    /// Arc length at which a vertically hanging chain turns from descending
    /// to ascending. `None` unless the curve is classified as linear vertical.
    #[must_use]
    pub fn turning_arc_length(&self) -> Option<f64> {
        match self.solve() {
            SolveState::LinearVertical => Some(self.vertical_drop()),
            _ => None,
        }
    }

    /// Evaluates the `order`-th derivative of position with respect to arc
    /// length at `s`, measured from the local origin. Order 0 is the
    /// position itself.
    #[must_use]
    pub fn evaluate(&self, s: f64, order: u32) -> SVector<f64, D> {
        match self.solve() {
            SolveState::Unknown => unreachable!("solve() always classifies the configuration"),
            SolveState::LineSegment => self.eval_line_segment(s, order),
            SolveState::LinearVertical => self.eval_linear_vertical(s, order),
            SolveState::Catenary(params) => self.eval_catenary(&params, s, order),
        }
    }

    pub(crate) fn retarget(&mut self, target: SVector<f64, D>) {
        if target != self.target {
            self.target = target;
            self.invalidate();
        }
    }

    fn invalidate(&mut self) {
        self.state = Cell::new(SolveState::Unknown);
    }

    /// Target with its vertical component removed.
    fn horizontal(&self) -> SVector<f64, D> {
        let mut h = self.target;
        h[VERTICAL] = 0.0;
        h
    }

    fn classify(&self) -> SolveState {
        let s = self.arc_length;
        let chord = self.target.norm();
        if s <= chord * self.settings.line_segment_ratio {
            debug!(chord, arc_length = s, "catenary classified as line_segment");
            return SolveState::LineSegment;
        }

        let reach = self.horizontal().norm();
        if reach < self.settings.vertical_tolerance {
            debug!(reach, arc_length = s, "catenary classified as linear_vertical");
            return SolveState::LinearVertical;
        }

        match self.solve_catenary(reach) {
            Some(params) => {
                debug!(
                    shape = params.curve.a,
                    reach,
                    arc_length = s,
                    "catenary classified as catenary"
                );
                SolveState::Catenary(params)
            }
            None => SolveState::LineSegment,
        }
    }

    /// Finds the shape parameter `a` for a catenary spanning `reach`
    /// horizontally. Solves `2a·sinh(reach / 2a) = sqrt(s² − rise²)`.
    fn solve_catenary(&self, reach: f64) -> Option<CatenaryParams> {
        let s = self.arc_length;
        let rise = self.target[VERTICAL];
        let span = (s * s - rise * rise).sqrt();
        let residual = |a: f64| 2.0 * a * (reach / (2.0 * a)).sinh() - span;

        let guess = reach * reach / (2.0 * s);
        let Some(bracket) = bracket_decreasing(
            residual,
            guess,
            self.settings.bracket_steps,
            self.settings.root_tolerance,
        ) else {
            debug!(
                initial_guess = guess,
                steps = self.settings.bracket_steps,
                "shape parameter not bracketed, falling back to line_segment"
            );
            return None;
        };
        let a = bisect(residual, bracket, self.settings.bisection_steps);

        let curve = ScalarCatenaryParams::through_origin_and(a, reach, rise);
        let arc_length_offset = catenary::arc_length(-curve.delta_x, a);
        if !(curve.is_finite() && arc_length_offset.is_finite()) {
            debug!(shape = a, "non-finite catenary parameters, falling back to line_segment");
            return None;
        }
        Some(CatenaryParams {
            curve,
            arc_length_offset,
        })
    }

    fn eval_line_segment(&self, s: f64, order: u32) -> SVector<f64, D> {
        match order {
            0 => self.target * (s / self.arc_length),
            1 => self
                .target
                .try_normalize(TOLERANCE)
                .unwrap_or_else(SVector::zeros),
            _ => SVector::zeros(),
        }
    }

    /// Length of the descending run of a vertically hanging chain.
    fn vertical_drop(&self) -> f64 {
        0.5 * (self.arc_length - self.target[VERTICAL])
    }

    /// Straight down, then straight up to the target. The residual horizontal
    /// offset is spread evenly along the length so both endpoints match.
    fn eval_linear_vertical(&self, s: f64, order: u32) -> SVector<f64, D> {
        let descent = self.vertical_drop();
        let drift = self.horizontal() / self.arc_length;
        let descending = s < descent;
        match order {
            0 => {
                let mut p = drift * s;
                p[VERTICAL] = if descending { -s } else { s - 2.0 * descent };
                p
            }
            1 => {
                let mut d = drift;
                d[VERTICAL] = if descending { -1.0 } else { 1.0 };
                d
            }
            _ => SVector::zeros(),
        }
    }

    fn eval_catenary(&self, params: &CatenaryParams, s: f64, order: u32) -> SVector<f64, D> {
        let horizontal = self.horizontal();
        let direction = horizontal / horizontal.norm();
        let apex_s = s + params.arc_length_offset;
        let local = if order == 0 {
            params.curve.point_at_apex_arc_length(apex_s)
        } else {
            catenary::derivative_by_arc_length(apex_s, params.curve.a, order)
        };
        let mut out = direction * local.x;
        out[VERTICAL] = local.y;
        out
    }
}
