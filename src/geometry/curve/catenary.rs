use std::cell::{Cell, RefCell};

use nalgebra::{Point, SVector};
use tracing::trace;

use crate::error::{GeometryError, Result};
use crate::geometry::embedding::PlaneEmbedding;
use crate::math::{ensure_finite_vector, Point3, Vector3, TOLERANCE};
use crate::solver::{CatenaryToPoint, Classification, SolveState, SolverSettings};

use super::{Curve, CurveDomain};

/// A chain of fixed length hanging between two points in `N`-dimensional
/// space, parameterized by arc length from `start`.
///
/// The curve embeds itself into a `D`-dimensional frame at `start` whose up
/// axis opposes the slack direction, then hands the endpoint's local
/// coordinates to a [`CatenaryToPoint`] solver. Both the frame and the
/// solution are built lazily and cached:
///
/// * moving an endpoint or changing the slack direction drops the frame,
/// * changing only the arc length keeps the frame and resets the solver.
///
/// Evaluation takes `&self` and fills the caches through interior
/// mutability, so a curve is `!Sync`.
#[derive(Debug, Clone)]
pub struct CatenaryCurve<const N: usize, const D: usize> {
    start: Point<f64, N>,
    end: Point<f64, N>,
    slack: SVector<f64, N>,
    frame: Cell<Option<PlaneEmbedding<N, D>>>,
    solver: RefCell<CatenaryToPoint<D>>,
}

/// Catenary in the plane.
pub type CatenaryCurve2 = CatenaryCurve<2, 2>;

/// Catenary in 3D space, solved in its vertical plane.
pub type CatenaryCurve3 = CatenaryCurve<3, 2>;

/// Catenary in 4D space, solved in a 3D frame.
pub type CatenaryCurve4 = CatenaryCurve<4, 3>;

impl<const N: usize, const D: usize> CatenaryCurve<N, D> {
    /// Creates a curve of total length `arc_length` from `start` to `end`
    /// sagging along `slack_direction`.
    ///
    /// # Arguments
    ///
    /// * `start` - Endpoint at arc length 0
    /// * `end` - Endpoint at arc length `arc_length`
    /// * `arc_length` - Total length of the chain (must be positive)
    /// * `slack_direction` - Direction gravity pulls in (normalized here)
    ///
    /// # Errors
    ///
    /// Returns an error if any coordinate is non-finite, the slack direction
    /// is zero-length, or the arc length is not positive. An arc length
    /// shorter than the chord is accepted and evaluates as a straight line.
    pub fn new(
        start: Point<f64, N>,
        end: Point<f64, N>,
        arc_length: f64,
        slack_direction: SVector<f64, N>,
    ) -> Result<Self> {
        ensure_finite_vector("start", &start.coords)?;
        ensure_finite_vector("end", &end.coords)?;
        let slack = normalize_slack(&slack_direction)?;
        let solver = CatenaryToPoint::new(SVector::zeros(), arc_length)?;
        Ok(Self {
            start,
            end,
            slack,
            frame: Cell::new(None),
            solver: RefCell::new(solver),
        })
    }

    /// Replaces the solver settings.
    #[must_use]
    pub fn with_settings(mut self, settings: SolverSettings) -> Self {
        self.set_settings(settings);
        self
    }

    /// Returns the endpoint at arc length 0.
    #[must_use]
    pub fn start(&self) -> &Point<f64, N> {
        &self.start
    }

    /// Returns the endpoint at the full arc length.
    #[must_use]
    pub fn end(&self) -> &Point<f64, N> {
        &self.end
    }

    /// Returns the unit slack direction.
    #[must_use]
    pub fn slack_direction(&self) -> &SVector<f64, N> {
        &self.slack
    }

    /// Returns the total arc length.
    #[must_use]
    pub fn arc_length(&self) -> f64 {
        self.solver.borrow().arc_length()
    }

    /// Returns the straight-line distance between the endpoints.
    #[must_use]
    pub fn chord_length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// Returns the solver settings.
    #[must_use]
    pub fn settings(&self) -> SolverSettings {
        *self.solver.borrow().settings()
    }

    /// Moves the start point.
    ///
    /// # Errors
    ///
    /// Returns an error if `start` has non-finite coordinates.
    pub fn set_start(&mut self, start: Point<f64, N>) -> Result<()> {
        ensure_finite_vector("start", &start.coords)?;
        if start != self.start {
            self.start = start;
            self.frame.set(None);
        }
        Ok(())
    }

    /// Moves the end point.
    ///
    /// # Errors
    ///
    /// Returns an error if `end` has non-finite coordinates.
    pub fn set_end(&mut self, end: Point<f64, N>) -> Result<()> {
        ensure_finite_vector("end", &end.coords)?;
        if end != self.end {
            self.end = end;
            self.frame.set(None);
        }
        Ok(())
    }

    /// Changes the slack direction.
    ///
    /// # Errors
    ///
    /// Returns an error if the direction is zero-length or non-finite.
    pub fn set_slack_direction(&mut self, slack_direction: SVector<f64, N>) -> Result<()> {
        let slack = normalize_slack(&slack_direction)?;
        if slack != self.slack {
            self.slack = slack;
            self.frame.set(None);
        }
        Ok(())
    }

    /// Changes the arc length. The embedding frame is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if `arc_length` is not a positive finite number.
    pub fn set_arc_length(&mut self, arc_length: f64) -> Result<()> {
        self.solver.get_mut().set_arc_length(arc_length)
    }

    /// Replaces the solver settings. The embedding frame is kept.
    pub fn set_settings(&mut self, settings: SolverSettings) {
        self.solver.get_mut().set_settings(settings);
    }

    /// Returns `true` when the embedding frame is built and current.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.frame.get().is_some()
    }

    /// Returns the embedding frame, building it if needed.
    #[must_use]
    pub fn frame(&self) -> PlaneEmbedding<N, D> {
        self.ensure_ready()
    }

    /// Returns the solver state, solving if needed.
    #[must_use]
    pub fn solve_state(&self) -> SolveState {
        self.ensure_ready();
        self.solver.borrow().solve()
    }

    /// Reports which shape the curve takes, solving if needed.
    #[must_use]
    pub fn classification(&self) -> Classification {
        self.ensure_ready();
        self.solver.borrow().classification()
    }

    /// Arc length of the lowest point when the chain hangs straight down.
    #[must_use]
    pub fn turning_arc_length(&self) -> Option<f64> {
        self.ensure_ready();
        self.solver.borrow().turning_arc_length()
    }

    /// Point at arc length `s` from the start.
    #[must_use]
    pub fn position(&self, s: f64) -> Point<f64, N> {
        let frame = self.ensure_ready();
        frame.to_world_point(&self.solver.borrow().evaluate(s, 0))
    }

    /// The `order`-th derivative of position with respect to arc length at
    /// `s`. Order 0 returns the position as a vector from the world origin.
    #[must_use]
    pub fn derivative(&self, s: f64, order: u32) -> SVector<f64, N> {
        if order == 0 {
            return self.position(s).coords;
        }
        let frame = self.ensure_ready();
        frame.to_world_vector(&self.solver.borrow().evaluate(s, order))
    }

    fn ensure_ready(&self) -> PlaneEmbedding<N, D> {
        if let Some(frame) = self.frame.get() {
            return frame;
        }
        let frame = PlaneEmbedding::<N, D>::new(self.start, &(-self.slack), &self.end);
        let local_end = frame.to_local_point(&self.end);
        trace!(dimension = N, local_end = ?local_end.as_slice(), "catenary frame built");
        self.solver.borrow_mut().retarget(local_end);
        self.frame.set(Some(frame));
        frame
    }
}

fn normalize_slack<const N: usize>(slack_direction: &SVector<f64, N>) -> Result<SVector<f64, N>> {
    ensure_finite_vector("slack_direction", slack_direction)?;
    slack_direction
        .try_normalize(TOLERANCE)
        .ok_or_else(|| GeometryError::ZeroVector.into())
}

impl Curve for CatenaryCurve3 {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        Ok(self.position(t))
    }

    fn tangent(&self, t: f64) -> Result<Vector3> {
        self.derivative(t, 1)
            .try_normalize(TOLERANCE)
            .ok_or_else(|| GeometryError::ZeroVector.into())
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(0.0, self.arc_length())
    }

    fn is_closed(&self) -> bool {
        self.chord_length() < TOLERANCE
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    use super::*;
    use crate::math::{Point2, Point4, Vector2, Vector4};

    fn hanging_2d(end: Point2, s: f64) -> CatenaryCurve2 {
        CatenaryCurve2::new(Point2::origin(), end, s, Vector2::new(0.0, -1.0)).unwrap()
    }

    #[test]
    fn sags_between_level_points() {
        let c = hanging_2d(Point2::new(4.0, 0.0), 5.0);
        assert_eq!(c.classification(), Classification::Catenary);
        assert_abs_diff_eq!(c.position(0.0), Point2::origin(), epsilon = 1e-4);
        assert_abs_diff_eq!(c.position(5.0), Point2::new(4.0, 0.0), epsilon = 1e-4);
        assert!(c.position(2.5).y < 0.0);
    }

    #[test]
    fn level_chain_is_symmetric() {
        let s = 5.0;
        let c = hanging_2d(Point2::new(4.0, 0.0), s);
        let bottom = c.position(0.5 * s);
        for &t in &[0.3, 1.0, 2.0, 2.5] {
            let left = c.position(0.5 * s - t);
            let right = c.position(0.5 * s + t);
            assert_abs_diff_eq!(left.y, right.y, epsilon = 1e-3);
            assert!(left.y > bottom.y && right.y > bottom.y);
        }
        assert_abs_diff_eq!(bottom.x, 2.0, epsilon = 1e-3);
    }

    #[test]
    fn sideways_slack_sags_sideways() {
        let c = CatenaryCurve2::new(
            Point2::origin(),
            Point2::new(0.0, 4.0),
            5.0,
            Vector2::new(1.0, 0.0),
        )
        .unwrap();
        assert_eq!(c.classification(), Classification::Catenary);
        assert!(c.position(2.5).x > 0.5);
        assert_abs_diff_eq!(c.position(5.0), Point2::new(0.0, 4.0), epsilon = 1e-4);
    }

    #[test]
    fn three_dimensional_matches_planar() {
        let planar = hanging_2d(Point2::new(4.0, -1.0), 6.0);
        let spatial = CatenaryCurve3::new(
            Point3::origin(),
            Point3::new(4.0, 0.0, -1.0),
            6.0,
            -Vector3::z(),
        )
        .unwrap();
        for &s in &[0.0, 1.5, 3.0, 4.5, 6.0] {
            let p = planar.position(s);
            let q = spatial.position(s);
            assert_abs_diff_eq!(q, Point3::new(p.x, 0.0, p.y), epsilon = 1e-12);
        }
    }

    #[test]
    fn tilted_slack_direction() {
        let slack = Vector3::new(1.0, 1.0, -1.0);
        let start = Point3::new(1.0, -2.0, 0.5);
        let end = Point3::new(4.0, 2.0, 1.0);
        let c = CatenaryCurve3::new(start, end, 8.0, slack).unwrap();

        assert_abs_diff_eq!(c.position(0.0), start, epsilon = 1e-9);
        assert_abs_diff_eq!(c.position(8.0), end, epsilon = 1e-3);
        let middle = nalgebra::center(&start, &end);
        assert!((c.position(4.0) - middle).dot(c.slack_direction()) > 0.5);
        assert_relative_eq!(c.derivative(3.0, 1).norm(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn straight_drop_in_3d_is_linear_vertical() {
        let c = CatenaryCurve3::new(
            Point3::new(2.0, 2.0, 10.0),
            Point3::new(2.0, 2.0, 5.0),
            7.0,
            -Vector3::z(),
        )
        .unwrap();
        assert_eq!(c.classification(), Classification::LinearVertical);
        assert_relative_eq!(c.turning_arc_length().unwrap(), 6.0);
        assert_abs_diff_eq!(c.position(6.0), Point3::new(2.0, 2.0, 4.0), epsilon = 1e-12);
        assert_abs_diff_eq!(c.position(7.0), Point3::new(2.0, 2.0, 5.0), epsilon = 1e-12);
    }

    #[test]
    fn four_dimensional_reduces_to_planar() {
        let planar = hanging_2d(Point2::new(3.0, 0.0), 5.0);
        let c = CatenaryCurve4::new(
            Point4::origin(),
            Point4::new(1.0, 2.0, 2.0, 0.0),
            5.0,
            Vector4::new(0.0, 0.0, 0.0, -1.0),
        )
        .unwrap();
        assert_eq!(c.classification(), Classification::Catenary);
        let direction = Vector4::new(1.0, 2.0, 2.0, 0.0) / 3.0;
        for &s in &[0.0, 2.5, 5.0] {
            let p = planar.position(s);
            let expected = Point4::from(direction * p.x + Vector4::new(0.0, 0.0, 0.0, p.y));
            assert_abs_diff_eq!(c.position(s), expected, epsilon = 1e-12);
        }
        assert_abs_diff_eq!(
            c.derivative(1.0, 2),
            direction * planar.derivative(1.0, 2).x + Vector4::w() * planar.derivative(1.0, 2).y,
            epsilon = 1e-12
        );
    }

    #[test]
    fn arc_length_change_keeps_frame() {
        let mut c = hanging_2d(Point2::new(4.0, 0.0), 5.0);
        assert!(!c.is_ready());
        let before = c.position(2.5);
        assert!(c.is_ready());

        c.set_arc_length(6.0).unwrap();
        assert!(c.is_ready());
        assert_eq!(c.solver.borrow().state(), SolveState::Unknown);
        assert!(c.position(3.0).y < before.y);
    }

    #[test]
    fn endpoint_and_slack_changes_drop_frame() {
        let mut c = hanging_2d(Point2::new(4.0, 0.0), 5.0);
        let _ = c.frame();
        c.set_end(Point2::new(4.0, 0.0)).unwrap();
        assert!(c.is_ready());
        c.set_end(Point2::new(3.0, 1.0)).unwrap();
        assert!(!c.is_ready());
        assert_abs_diff_eq!(c.position(5.0), Point2::new(3.0, 1.0), epsilon = 1e-3);

        c.set_slack_direction(Vector2::new(0.0, -2.0)).unwrap();
        assert!(c.is_ready());
        c.set_slack_direction(Vector2::new(1.0, -1.0)).unwrap();
        assert!(!c.is_ready());

        c.set_start(Point2::new(-1.0, 0.0)).unwrap();
        assert!(!c.is_ready());
        assert_abs_diff_eq!(*c.frame().origin(), Point2::new(-1.0, 0.0));
    }

    #[test]
    fn frame_up_axis_opposes_slack() {
        let c = CatenaryCurve3::new(
            Point3::origin(),
            Point3::new(1.0, 1.0, 0.0),
            2.0,
            Vector3::new(0.0, -3.0, 0.0),
        )
        .unwrap();
        assert_abs_diff_eq!(*c.frame().up_axis(), Vector3::y());
        assert_abs_diff_eq!(
            c.frame().to_local_point(c.end()),
            *c.solver.borrow().target(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn invalid_construction_rejected() {
        let zero_slack =
            CatenaryCurve2::new(Point2::origin(), Point2::new(1.0, 0.0), 2.0, Vector2::zeros());
        assert!(zero_slack.is_err());
        let bad_length =
            CatenaryCurve2::new(Point2::origin(), Point2::new(1.0, 0.0), -2.0, Vector2::y());
        assert!(bad_length.is_err());
        let bad_point = CatenaryCurve2::new(
            Point2::new(f64::INFINITY, 0.0),
            Point2::new(1.0, 0.0),
            2.0,
            Vector2::y(),
        );
        assert!(bad_point.is_err());
    }

    #[test]
    fn curve_trait_on_3d_catenary() {
        let c = CatenaryCurve3::new(
            Point3::origin(),
            Point3::new(4.0, 0.0, 0.0),
            5.0,
            -Vector3::z(),
        )
        .unwrap();
        let domain = c.domain();
        assert_relative_eq!(domain.span(), 5.0);
        assert!(!c.is_closed());
        let p = Curve::evaluate(&c, 2.5).unwrap();
        assert!(p.z < 0.0);
        let t = c.tangent(2.5).unwrap();
        assert_abs_diff_eq!(t, Vector3::x(), epsilon = 1e-3);
    }

    #[test]
    fn coincident_endpoints_form_closed_loop() {
        let c =
            CatenaryCurve3::new(Point3::origin(), Point3::origin(), 4.0, -Vector3::z()).unwrap();
        assert!(c.is_closed());
        assert_eq!(c.classification(), Classification::LinearVertical);
        assert_abs_diff_eq!(c.position(2.0), Point3::new(0.0, 0.0, -2.0), epsilon = 1e-12);
        assert_abs_diff_eq!(c.position(4.0), Point3::origin(), epsilon = 1e-12);
    }
}
